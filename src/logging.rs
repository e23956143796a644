use std::path::Path;

use flexi_logger::{
    colored_default_format, opt_format, Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError,
    Logger, LoggerHandle, Naming,
};

/// Starts the global logger.
///
/// `RUST_LOG` overrides `default_spec`. Without a directory, logs go to stderr
/// in color; with one, they go to size-rotated files there and warnings are
/// duplicated to stderr. Keep the returned handle alive for the whole run.
pub fn setup_logging(
    log_dir: Option<&Path>,
    default_spec: &str,
) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str(default_spec)?;

    match log_dir {
        None => logger.format(colored_default_format).start(),
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir).basename("mcts-agent"))
            .format(opt_format)
            .duplicate_to_stderr(Duplicate::Warn)
            .rotate(
                Criterion::Size(10 * 1024 * 1024),
                Naming::Numbers,
                Cleanup::KeepLogFiles(1),
            )
            .start(),
    }
}
