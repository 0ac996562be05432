use std::io;

/// Failure while reading a `.grp` graph description.
#[derive(Debug, thiserror::Error)]
pub enum GrpError {
    #[error("line {line}: malformed node declaration `{text}`")]
    MalformedNode { line: usize, text: String },
    #[error("line {line}: malformed arc declaration `{text}`")]
    MalformedArc { line: usize, text: String },
    #[error("line {line}: coordinate `{text}` is not a finite number")]
    BadCoordinate { line: usize, text: String },
    #[error("line {line}: node reference n{reference} was never declared")]
    UnknownNodeRef { line: usize, reference: u32 },
    #[error("graph exceeds the {limit} {what} limit")]
    TooLarge { what: &'static str, limit: usize },
    #[error("failed to read graph: {0}")]
    Io(#[from] io::Error),
}

impl GrpError {
    /// 1-based line the error refers to, when it refers to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            GrpError::MalformedNode { line, .. }
            | GrpError::MalformedArc { line, .. }
            | GrpError::BadCoordinate { line, .. }
            | GrpError::UnknownNodeRef { line, .. } => Some(*line),
            GrpError::TooLarge { .. } | GrpError::Io(_) => None,
        }
    }
}

/// Rejected generator configuration.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("arc capacity must be at least 1")]
    ZeroCapacity,
    #[error("max_steps_per_path must be at least 1 when set")]
    ZeroStepGuard,
    #[error("invalid options document: {0}")]
    Json(#[from] serde_json::Error),
}
