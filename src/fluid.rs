//! Pointer forwarding for the background fluid simulation.
//!
//! The solver itself is an external script; this side decides which pointer
//! samples reach it and which trigger mode it runs in.

use serde::{Deserialize, Serialize};

/// Solver settings handed to the external simulation as its config object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FluidParams {
    pub sim_resolution: u32,
    pub dye_resolution: u32,
    pub density_dissipation: f32,
    pub velocity_dissipation: f32,
    pub pressure: f32,
    pub curl: f32,
    pub splat_radius: f32,
    pub splat_force: f32,
    pub transparent: bool,
    pub trigger: TriggerMode,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            sim_resolution: 128,
            dye_resolution: 1024,
            density_dissipation: 2.5,
            velocity_dissipation: 1.5,
            pressure: 0.1,
            curl: 5.0,
            splat_radius: 0.2,
            splat_force: 4000.0,
            transparent: true,
            trigger: TriggerMode::Click,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Pointer movement splats.
    Hover,
    /// Only presses splat.
    Click,
}

impl TriggerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerMode::Hover => "hover",
            TriggerMode::Click => "click",
        }
    }

    /// Mode after the pointer enters (`true`) or leaves the section.
    pub fn for_section(inside: bool) -> Self {
        if inside {
            TriggerMode::Hover
        } else {
            TriggerMode::Click
        }
    }
}

/// Viewport-space box, as reported by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }
}

/// Client position to replay on the full-viewport simulation canvas, or
/// `None` when the pointer is outside the section.
pub fn forward(section: &SectionBounds, x: f64, y: f64) -> Option<(f64, f64)> {
    section.contains(x, y).then_some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_inside_samples_forward() {
        let section = SectionBounds { left: 0.0, top: 100.0, width: 800.0, height: 400.0 };
        assert_eq!(forward(&section, 10.0, 50.0), None);
        assert_eq!(forward(&section, 10.0, 150.0), Some((10.0, 150.0)));
        assert_eq!(forward(&section, 10.0, 500.0), None);
    }

    #[test]
    fn config_uses_solver_keys() {
        let json = serde_json::to_value(FluidParams::default()).unwrap();
        assert_eq!(json["TRIGGER"], "click");
        assert_eq!(json["SIM_RESOLUTION"], 128);
        assert_eq!(TriggerMode::for_section(true).as_str(), "hover");
    }
}
