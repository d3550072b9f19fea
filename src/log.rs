//! Initialisation of the program logger.
//!
//! Messages go to the terminal (coloured when it supports it) and, for forecast runs, to
//! `capfore_info.log` and `capfore_error.log` in the output folder.
use anyhow::{Context, Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// A flag indicating whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The default log level for the program.
///
/// Used as a fallback if the user hasn't specified something else with the
/// [`LOG_LEVEL_ENV_VAR`] environment variable or the settings.toml file.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The environment variable which overrides the log level from the settings file
pub const LOG_LEVEL_ENV_VAR: &str = "CAPFORE_LOG_LEVEL";

/// Log file for messages about ordinary operation
const LOG_INFO_FILE_NAME: &str = "capfore_info.log";

/// Log file for warnings and errors
const LOG_ERROR_FILE_NAME: &str = "capfore_error.log";

/// Prefix stripped from log targets, so messages show e.g. `runner` rather than the full path
const TARGET_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Initialise the program logger.
///
/// The level comes from `CAPFORE_LOG_LEVEL` if set and non-empty, then from `settings.toml`,
/// then [`DEFAULT_LOG_LEVEL`]. Accepted values are `off`, `error`, `warn`, `info`, `debug` and
/// `trace` (case-insensitive).
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `log_file_path`: Folder in which to create log files, if any
pub fn init(log_level_from_settings: Option<&str>, log_file_path: Option<&Path>) -> Result<()> {
    let log_level = resolve_log_level(env::var(LOG_LEVEL_ENV_VAR).ok(), log_level_from_settings)?;

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    // Info and below on stdout, warnings and errors on stderr
    let mut dispatch = Dispatch::new()
        .chain(
            terminal_dispatch(std::io::stdout().is_terminal(), colours)
                .filter(|metadata| metadata.level() > LevelFilter::Warn)
                .level(log_level)
                .chain(std::io::stdout()),
        )
        .chain(
            terminal_dispatch(std::io::stderr().is_terminal(), colours)
                .level(log_level.min(LevelFilter::Warn))
                .chain(std::io::stderr()),
        );

    if let Some(log_file_path) = log_file_path {
        let (info_log_file, err_log_file) = create_log_files(log_file_path)?;

        // The info log always records at least the per-scenario progress messages
        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .filter(|metadata| metadata.level() > LevelFilter::Warn)
                    .format(write_log_plain)
                    .level(log_level.max(LevelFilter::Info))
                    .chain(info_log_file),
            )
            .chain(
                Dispatch::new()
                    .format(write_log_plain)
                    .level(LevelFilter::Warn)
                    .chain(err_log_file),
            );
    }

    dispatch.apply().context("Logger already initialised")?;
    let _ = LOGGER_INIT.set(());

    Ok(())
}

/// Pick the log level from the environment variable's value, falling back to settings
fn resolve_log_level(
    from_env: Option<String>,
    from_settings: Option<&str>,
) -> Result<LevelFilter> {
    let log_level = from_env
        .filter(|level| !level.trim().is_empty())
        .unwrap_or_else(|| from_settings.unwrap_or(DEFAULT_LOG_LEVEL).to_string());

    parse_log_level(log_level.trim())
}

/// Convert a log level string (case-insensitive) to a [`LevelFilter`]
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

/// Create (or truncate) the info and error log files in `dir`
fn create_log_files(dir: &Path) -> Result<(File, File)> {
    let new_log_file = |file_name: &str| {
        let path = dir.join(file_name);
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))
    };

    Ok((
        new_log_file(LOG_INFO_FILE_NAME)?,
        new_log_file(LOG_ERROR_FILE_NAME)?,
    ))
}

/// A dispatch for terminal output, coloured if `use_colour` is set
fn terminal_dispatch(use_colour: bool, colours: ColoredLevelConfig) -> Dispatch {
    Dispatch::new().format(move |out, message, record| {
        if use_colour {
            write_log(out, colours.color(record.level()), record.target(), message);
        } else {
            write_log_plain(out, message, record);
        }
    })
}

/// Module path of a log target, relative to this crate
fn short_target(target: &str) -> &str {
    target.strip_prefix(TARGET_PREFIX).unwrap_or(target)
}

/// Write a log message as `[HH:MM:SS LEVEL target] message`
fn write_log<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");
    let target = short_target(target);

    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}

/// Write to the log with no colours
fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_log(out, record.level(), record.target(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::tempdir;

    #[rstest]
    #[case("off", LevelFilter::Off)]
    #[case("error", LevelFilter::Error)]
    #[case("WARN", LevelFilter::Warn)]
    #[case("Info", LevelFilter::Info)]
    #[case("debug", LevelFilter::Debug)]
    #[case("trace", LevelFilter::Trace)]
    fn test_parse_log_level(#[case] input: &str, #[case] expected: LevelFilter) {
        assert_eq!(parse_log_level(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_log_level_unknown() {
        let err = parse_log_level("verbose").unwrap_err();
        assert_eq!(err.to_string(), "Unknown log level: verbose");
    }

    #[rstest]
    #[case(None, None, LevelFilter::Info)]
    #[case(None, Some("warn"), LevelFilter::Warn)]
    #[case(Some("debug"), Some("warn"), LevelFilter::Debug)]
    #[case(Some(" off "), None, LevelFilter::Off)]
    #[case(Some(""), Some("error"), LevelFilter::Error)]
    fn test_resolve_log_level(
        #[case] from_env: Option<&str>,
        #[case] from_settings: Option<&str>,
        #[case] expected: LevelFilter,
    ) {
        assert_eq!(
            resolve_log_level(from_env.map(String::from), from_settings).unwrap(),
            expected
        );
    }

    #[test]
    fn test_create_log_files() {
        let dir = tempdir().unwrap();
        let info_path = dir.path().join(LOG_INFO_FILE_NAME);
        fs::write(&info_path, "previous run").unwrap();

        create_log_files(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(&info_path).unwrap(), "");
        assert!(dir.path().join(LOG_ERROR_FILE_NAME).is_file());

        assert!(create_log_files(&dir.path().join("missing")).is_err());
    }

    #[rstest]
    #[case("capacity_forecast::runner", "runner")]
    #[case("capacity_forecast::model::parameters", "model::parameters")]
    #[case("other_crate::module", "other_crate::module")]
    fn test_short_target(#[case] target: &str, #[case] expected: &str) {
        assert_eq!(short_target(target), expected);
    }
}
