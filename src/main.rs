//! `iris-world [OPTIONS.toml]`: open the eye rig in a window.
//!
//! Verbosity follows `RUST_LOG` (e.g. `RUST_LOG=iris_world=debug`).

use std::path::Path;
use std::process::ExitCode;

use iris_world::options::Options;
use iris_world::viewer::Viewer;

fn main() -> ExitCode {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => {
                log::info!("options loaded from {path}");
                options
            }
            Err(e) => {
                log::error!("{path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Options::default(),
    };

    match Viewer::builder().with_options(options).build().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
