//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup. Output goes to stderr so it never mixes
//! with paths printed on stdout.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor `--log-level` says otherwise
pub const DEFAULT_LEVEL: &str = "warn";

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set and valid; `level` is the fallback.
pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set subscriber: {e}"))?;

    Ok(())
}

/// Parse a log level string, rejecting unknown names
pub fn parse_level(level: &str) -> anyhow::Result<LevelFilter> {
    if level.is_empty() {
        anyhow::bail!("log level must not be empty");
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| anyhow::anyhow!("unrecognised log level: '{level}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_levels_parse() {
        for l in ["error", "warn", "info", "debug", "trace", "off"] {
            assert!(parse_level(l).is_ok(), "expected '{l}' to be valid");
        }
    }

    #[test]
    fn test_invalid_level_errors() {
        assert!(parse_level("verbose").is_err());
        assert!(parse_level("").is_err());
    }

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        let _ = init(LevelFilter::INFO);
        assert!(init(LevelFilter::INFO).is_err());
    }
}
