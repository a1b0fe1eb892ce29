//! Logging utilities.

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use systemd_journal_logger::{JournalLog, connected_to_journal};

/// Logging setup error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Journal initialization error.
    #[error("Journal initialization error: {0}")]
    Journal(std::io::Error),

    /// Logger initialization error.
    #[error("Logger initialization error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// The sink that log records are written to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogTarget {
    /// The systemd journal.
    Journal,

    /// The terminal, always on stderr.
    Terminal,
}

impl LogTarget {
    /// Returns [`LogTarget::Journal`] if stderr is connected to the systemd journal and
    /// [`LogTarget::Terminal`] otherwise.
    pub fn detect() -> Self {
        if connected_to_journal() {
            Self::Journal
        } else {
            Self::Terminal
        }
    }
}

/// Sets up logging for the executable `identifier` on the detected [`LogTarget`].
///
/// Records sent to the journal carry `identifier` as syslog identifier and the crate version
/// in the `VERSION` field. If the journal is detected but can not be opened, logging falls back
/// to the terminal.
///
/// # Errors
///
/// An error is returned if a logger has already been set.
pub fn setup_logging(identifier: &str, max_level: impl Into<LevelFilter>) -> Result<(), Error> {
    let journal = match LogTarget::detect() {
        LogTarget::Journal => Some(JournalLog::new()),
        LogTarget::Terminal => None,
    };
    setup_logging_with(journal, identifier, max_level.into())
}

/// Sets up logging for the executable `identifier` on an explicit `target`.
///
/// # Errors
///
/// An error is returned if
/// - `target` is [`LogTarget::Journal`] and the journal can not be opened,
/// - or a logger has already been set.
pub fn setup_logging_for(
    target: LogTarget,
    identifier: &str,
    max_level: impl Into<LevelFilter>,
) -> Result<(), Error> {
    let max_level = max_level.into();
    match target {
        LogTarget::Journal => {
            let journal = JournalLog::new().map_err(Error::Journal)?;
            install_journal(journal, identifier, max_level)
        }
        LogTarget::Terminal => install_terminal(identifier, max_level),
    }
}

/// Installs the opened `journal`, or the terminal logger if there is none or it failed to open.
fn setup_logging_with(
    journal: Option<std::io::Result<JournalLog>>,
    identifier: &str,
    max_level: LevelFilter,
) -> Result<(), Error> {
    match journal {
        Some(Ok(journal)) => install_journal(journal, identifier, max_level),
        Some(Err(error)) => {
            install_terminal(identifier, max_level)?;
            log::warn!("Unable to open the journal, logging to stderr instead: {error}");
            Ok(())
        }
        None => install_terminal(identifier, max_level),
    }
}

fn install_journal(
    journal: JournalLog,
    identifier: &str,
    max_level: LevelFilter,
) -> Result<(), Error> {
    journal
        .with_syslog_identifier(identifier.to_string())
        .with_extra_fields(vec![("VERSION", env!("CARGO_PKG_VERSION"))])
        .install()?;
    log::set_max_level(max_level);
    log::debug!("Logging to the journal for {identifier}");
    Ok(())
}

fn install_terminal(identifier: &str, max_level: LevelFilter) -> Result<(), Error> {
    // no timestamps or module targets on the terminal
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    TermLogger::init(max_level, config, TerminalMode::Stderr, ColorChoice::Auto)?;
    log::debug!("Logging to the terminal for {identifier}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // A single test, as the logger is global to the test process.
    #[test]
    fn broken_journal_falls_back_to_terminal_once() {
        let broken = Some(Err(std::io::Error::other("journal socket unavailable")));
        assert!(setup_logging_with(broken, "pkpass-sign", LevelFilter::Debug).is_ok());

        assert!(matches!(
            setup_logging_for(LogTarget::Terminal, "pkpass-sign", LevelFilter::Debug),
            Err(Error::Logger(_))
        ));
    }
}
