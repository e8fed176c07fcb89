use thiserror::Error;

/// Errors raised by the stroke-capture state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// Attempted to transition between incompatible states
    #[error("Cannot transition from {from} to {to}")]
    InvalidStateTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Failed to encode canvas: {0}")]
    Encode(String),
}

/// Errors surfaced by the image pipeline (upload, generation, export).
///
/// Every variant is recoverable: callers report it to the user and the
/// session carries on.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Please select a valid image file (got {mime:?})")]
    InvalidFileType { mime: String },

    #[error("No image to generate from")]
    NoInputImage,

    #[error("API error: {status_text}")]
    ApiError { status: u16, status_text: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response from inference service: {0}")]
    InvalidResponse(String),

    #[error("Failed to read file: {0}")]
    FileRead(String),

    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Failed to export image: {0}")]
    Export(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
