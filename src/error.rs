use thiserror::Error;

/// Main error type for the evaluation pipeline
#[derive(Error, Debug)]
pub enum ModelError {
    // Input adaptation errors
    #[error("type mismatch for input '{name}': {reason}")]
    TypeMismatch { name: String, reason: String },

    #[error("inconsistent input shapes: '{name}' has batch length {got}, expected {expected}")]
    InconsistentShape {
        name: String,
        got: usize,
        expected: usize,
    },

    #[error("unknown feature '{name}': not part of the configured feature order")]
    UnknownFeature { name: String },

    #[error("shape mismatch on the feature axis: received {received}, expected {expected}")]
    ShapeMismatch { received: usize, expected: usize },

    // Output rendering errors
    #[error("unresolved reference: image output '{image}' binds {field} to '{target}', which is absent or not scalar-resolved")]
    UnresolvedReference {
        image: String,
        field: String,
        target: String,
    },

    // Construction errors
    #[error("configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for ModelError
pub type Result<T> = std::result::Result<T, ModelError>;
