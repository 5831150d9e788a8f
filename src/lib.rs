#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Page effects for the marketing site, compiled to WebAssembly.
//!
//! Each effect unit mounts onto its own anchor element and runs its own
//! frame loop; units never talk to each other. The platform-agnostic modules
//! below hold the per-frame math and state machines so they can be tested on
//! the host; the browser wiring lives in `wasm`.

pub mod config;
pub mod cube;
pub mod distortion;
pub mod error;
pub mod feedback;
pub mod fit;
pub mod flowmap;
pub mod fluid;
pub mod hover;
pub mod model;
pub mod pointer;
pub mod scroll;
pub mod task;
pub mod tunnel;
pub mod tween;
pub mod viewer;

pub use error::FxError;

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{mount_all, stop_effects, EffectHandle, Unit};
