//! Error taxonomy shared by the simulation and audio pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthError {
    /// Qubit index is negative or past the end of the register
    #[error("Invalid qubit index {index} (register has {n_qubits} qubits)")]
    InvalidQubitIndex { index: i64, n_qubits: usize },

    /// Gate arguments are individually valid but not as a combination
    #[error("Invalid gate arguments: {reason}")]
    InvalidGateArguments { reason: String },

    #[error("Invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Internal invariant violated while rendering. Indicates a bug, not bad input.
    #[error("Render failure: {reason}")]
    RenderFailure { reason: String },

    #[error("Unknown demo '{0}'")]
    UnknownDemo(String),

    #[error("Unsupported qubit count {requested} (supported: 1..={max})")]
    UnsupportedQubitCount { requested: usize, max: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SynthError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn render(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        log::error!("Render failure: {}", reason);
        Self::RenderFailure { reason }
    }

    /// True for errors caused by caller input rather than an internal fault
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidQubitIndex { .. }
                | Self::InvalidGateArguments { .. }
                | Self::InvalidConfig { .. }
                | Self::UnknownDemo(_)
                | Self::UnsupportedQubitCount { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;
