use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
///
/// - 0: success
/// - 1: general failure
/// - 2: usage error (reported by the argument parser)
/// - 3: an input file is missing or unreadable
/// - 4: configuration error
/// - 5: the report could not be written
pub struct ExitCode;

impl ExitCode {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INPUT: i32 = 3;
    pub const CONFIG: i32 = 4;
    pub const OUTPUT: i32 = 5;
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Content store error: {0}")]
    Store(#[from] StoreError),

    #[error("Cannot read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write report {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::Toml(_) => ExitCode::CONFIG,
            Error::Input { .. } | Error::Store(StoreError::Io { .. }) => ExitCode::INPUT,
            Error::Output { .. } => ExitCode::OUTPUT,
            _ => ExitCode::GENERAL,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
