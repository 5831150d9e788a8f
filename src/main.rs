//! Host-side helper: `cargo run` builds the wasm package into `static/pkg`
//! and serves `static/` locally so the demo page can be opened in a browser.

use std::io;
use std::process::{Command, ExitCode, Stdio};
use std::{env, thread, time::Duration};

const DEFAULT_PORT: &str = "8000";

fn build_pkg() -> io::Result<bool> {
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) => Ok(st.success()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            eprintln!("wasm-pack not found in PATH. Skipping wasm build; the site may serve stale artifacts.");
            Ok(true)
        }
        Err(err) => Err(err),
    }
}

fn main() -> io::Result<ExitCode> {
    if !build_pkg()? {
        eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
        return Ok(ExitCode::FAILURE);
    }

    let port = env::var("FX_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_owned());
    println!("Launching local server at http://127.0.0.1:{port} …");
    let mut server = Command::new("python3")
        .args(["-m", "http.server", &port, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // Keep process alive while the server runs.
    loop {
        if let Some(status) = server.try_wait()? {
            eprintln!("http server exited: {status}");
            return Ok(ExitCode::FAILURE);
        }
        thread::sleep(Duration::from_secs(1));
    }
}
