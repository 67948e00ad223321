use std::process::ExitCode;

use particle_field::{Settings, Viewer};

fn main() -> ExitCode {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load settings from {}: {}; using defaults", path, e);
            Settings::default()
        }),
        None => Settings::default(),
    };

    match Viewer::new(settings).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
