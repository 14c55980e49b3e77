/// Logging setup.
///
/// The terminal is in raw mode on the alternate screen while the game runs,
/// so log output goes to a file instead of stderr. Filter comes from
/// `RUST_LOG` (default `info`).

use std::fs::File;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

pub fn init(path: &Path) {
    let file = match File::create(path) {
        Ok(f) => f,
        Err(_) => {
            // Nowhere to write: stay silent rather than corrupt the screen.
            log::set_max_level(LevelFilter::Off);
            return;
        }
    };

    // Already initialised: keep the existing logger.
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
}
