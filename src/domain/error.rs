//! Domain error types.

use crate::domain::indicator::IndicatorType;

/// Failures raised by the indicator library.
///
/// The pipeline never repairs these; they reach the caller unchanged inside
/// [`CandlelabError::LibraryComputation`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("{indicator}: invalid length {length}, must be at least 1")]
    InvalidLength {
        indicator: IndicatorType,
        length: i64,
    },

    #[error("{indicator}: length {length} exceeds the {available} available bars")]
    InsufficientData {
        indicator: IndicatorType,
        length: i64,
        available: usize,
    },
}

/// Top-level error type for candlelab.
#[derive(Debug, thiserror::Error)]
pub enum CandlelabError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error(transparent)]
    LibraryComputation(#[from] IndicatorError),

    #[error("unknown column {column}")]
    UnknownColumn { column: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CandlelabError {
    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            CandlelabError::Io(_) => 1,
            CandlelabError::ConfigParse { .. }
            | CandlelabError::ConfigMissing { .. }
            | CandlelabError::ConfigInvalid { .. } => 2,
            CandlelabError::Data { .. } => 3,
            CandlelabError::MalformedInput { .. } | CandlelabError::UnknownColumn { .. } => 4,
            CandlelabError::InvalidParameter { .. } => 5,
            CandlelabError::LibraryComputation(_) => 6,
        }
    }
}

impl From<&CandlelabError> for std::process::ExitCode {
    fn from(err: &CandlelabError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
