//! Native logger setup

use env_logger::Builder;
use log::LevelFilter;

/// Level used without `--verbose`
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Route `log` records to stderr at `Info`, or `Debug` when `verbose`.
/// `RUST_LOG` in the environment takes precedence over both.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        DEFAULT_LEVEL
    };

    let result = Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
    if let Err(err) = result {
        log::debug!("Logger already installed: {}", err);
    }
}
