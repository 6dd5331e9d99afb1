use thiserror::Error;

/// Failures raised by the analysis itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("regime '{regime}': need at least 2 samples at distinct thicknesses (samples={samples}, distinct={distinct})")]
    InsufficientData {
        regime: String,
        samples: usize,
        distinct: usize,
    },

    #[error("regime '{regime}': degenerate slope {slope:e} (WVTR must decrease with thickness)")]
    DegenerateSlope { regime: String, slope: f64 },

    #[error("failed to write plot '{path}': {message}")]
    PlotWrite { path: String, message: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid physical constants: {0}")]
    InvalidConstants(String),

    #[error("unknown regime '{0}'")]
    UnknownRegime(String),

    #[error("non-finite result: {0}")]
    NonFinite(String),
}

impl AnalysisError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            AnalysisError::InsufficientData { .. } | AnalysisError::DegenerateSlope { .. } => 3,
            AnalysisError::NonFinite(_) => 4,
            AnalysisError::PlotWrite { .. }
            | AnalysisError::InvalidParameter(_)
            | AnalysisError::InvalidConstants(_)
            | AnalysisError::UnknownRegime(_) => 2,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_failures_map_to_exit_code_3() {
        let err: AppError = AnalysisError::DegenerateSlope {
            regime: "1x".to_string(),
            slope: 0.0,
        }
        .into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("1x"));
    }
}
