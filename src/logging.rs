use std::{io, path};

use clap::ValueEnum;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Verbosity {
    #[serde(alias = "off")]
    Quiet,
    #[serde(alias = "warn")]
    Normal,
    #[serde(alias = "info")]
    Verbose,
    #[serde(alias = "debug")]
    VeryVerbose,
}

impl From<Verbosity> for LevelFilter {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Quiet => Self::Off,
            Verbosity::Normal => Self::Warn,
            Verbosity::Verbose => Self::Info,
            Verbosity::VeryVerbose => Self::Debug,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InitLoggerError {
    #[error("failed to open log file: {0}")]
    OpenLogFile(#[from] io::Error),
    #[error("failed to set logger (another logger has already been registered): {0}")]
    SetLog(#[from] log::SetLoggerError),
}

pub fn init_logger(verbosity: Verbosity, log_file: &path::Path) -> Result<(), InitLoggerError> {
    let level_filter: LevelFilter = verbosity.into();

    // reqwest and its connection stack are chatty at debug level
    let config = simplelog::ConfigBuilder::new()
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("rustls")
        .build();

    simplelog::CombinedLogger::init(vec![
        simplelog::TermLogger::new(
            level_filter,
            config.clone(),
            simplelog::TerminalMode::Stderr,
            simplelog::ColorChoice::Auto,
        ),
        simplelog::WriteLogger::new(
            level_filter,
            config,
            std::fs::File::options()
                .append(true)
                .create(true)
                .open(log_file)?,
        ),
    ])?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_level_filter() {
        assert_eq!(LevelFilter::from(Verbosity::Quiet), LevelFilter::Off);
        assert_eq!(LevelFilter::from(Verbosity::Normal), LevelFilter::Warn);
        assert_eq!(LevelFilter::from(Verbosity::Verbose), LevelFilter::Info);
        assert_eq!(LevelFilter::from(Verbosity::VeryVerbose), LevelFilter::Debug);
    }

    #[test]
    fn verbosity_accepts_level_aliases() {
        let v: Verbosity = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(v, Verbosity::VeryVerbose);

        let v: Verbosity = serde_json::from_str("\"very-verbose\"").unwrap();
        assert_eq!(v, Verbosity::VeryVerbose);

        let v: Verbosity = serde_json::from_str("\"off\"").unwrap();
        assert_eq!(v, Verbosity::Quiet);
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened for appending
        let err = init_logger(Verbosity::Quiet, dir.path()).unwrap_err();
        assert!(matches!(err, InitLoggerError::OpenLogFile(..)));
    }
}
