//! Logger setup: `fern` dispatch with colored level tags on stderr.

use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Map a textual level (`error|warn|info|debug|trace|off`) to a filter.
/// Unknown values fall back to `info`.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger(level: LevelFilter, color: bool) -> Result<(), fern::InitError> {
    let colors = ColoredLevelConfig::new()
        .info(Color::BrightGreen)
        .error(Color::BrightRed)
        .warn(Color::BrightYellow)
        .debug(Color::BrightBlack);
    fern::Dispatch::new()
        .format(move |out, message, record| {
            if color {
                out.finish(format_args!("[{}] {}", colors.color(record.level()), message))
            } else {
                out.finish(format_args!("[{}] {}", record.level(), message))
            }
        })
        .level(level)
        // reqwest/hyper internals are noisy at debug
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warning"), LevelFilter::Warn);
        assert_eq!(parse_level("bogus"), LevelFilter::Info);
        assert_eq!(parse_level("off"), LevelFilter::Off);
    }
}
