use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaglineError {
    #[error("Invalid start point: {0}")]
    InvalidStartPoint(String),

    #[error("Invalid tracing parameters: {0}")]
    InvalidTraceParams(String),

    #[error("Model has no coefficient set")]
    EmptyModel,

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid coefficients: {0}")]
    InvalidCoefficients(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Mismatched sequence lengths: {points} points for {vectors} vectors")]
    LengthMismatch { points: usize, vectors: usize },

    #[error("Degenerate field evaluation: {0}")]
    DegenerateEvaluation(String),
}
