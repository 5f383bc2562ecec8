//! Diagnostic logging to stderr.
//!
//! User-facing progress goes through `CmdMessage`s; this is the `log`
//! facade backend for `--verbose` runs. `RUST_LOG` overrides the level.

use flexi_logger::{Logger, LoggerHandle};
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

pub fn level_for(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Starts the stderr logger once per process. Later calls are no-ops.
pub fn init_logging(verbose: bool) -> Result<(), String> {
    let level = level_for(verbose);
    LOGGER.get_or_try_init(|| -> Result<LoggerHandle, String> {
        Logger::try_with_env_or_str(level)
            .map_err(|err| format!("invalid log level `{level}`: {err}"))?
            .log_to_stderr()
            .format(flexi_logger::default_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))
    })?;
    log::debug!("logging at {}", level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(true), "debug");
        assert_eq!(level_for(false), "warn");
    }

    #[test]
    fn test_init_is_idempotent() {
        assert!(init_logging(false).is_ok());
        assert!(init_logging(true).is_ok());
    }
}
