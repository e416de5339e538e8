//! Error types for Raksha

use thiserror::Error;

/// Raksha error type.
///
/// Only startup and I/O paths return errors. Per-tick processing reports
/// recoverable conditions as [`Fault`]s instead.
#[derive(Error, Debug)]
pub enum RakshaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for RakshaError {
    fn from(e: serde_json::Error) -> Self {
        RakshaError::Protocol(e.to_string())
    }
}

impl From<toml::de::Error> for RakshaError {
    fn from(e: toml::de::Error) -> Self {
        RakshaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RakshaError>;

/// Recoverable runtime condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// An expected data stream stopped arriving in time
    #[error("no {what} data received until timeout")]
    DataTimeout { what: String },
}

impl Fault {
    /// Short subject of the fault, used on the wire.
    pub fn what(&self) -> &str {
        match self {
            Fault::DataTimeout { what } => what,
        }
    }
}

/// Fault transition, reported exactly once per change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultEvent {
    Occurred(Fault),
    Recovered(Fault),
}
