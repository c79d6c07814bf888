//! Error types for laminate analysis and optimization

use thiserror::Error;

/// Main error type for CLT operations
#[derive(Error, Debug)]
pub enum CltError {
    #[error("Laminate has no layers")]
    EmptyLaminate,

    /// `index` is the stored layer index, not the physical ply of a mirrored stack
    #[error("Layer {index} has non-positive thickness {thickness}")]
    InvalidThickness { index: usize, thickness: f64 },

    #[error("Layer index {index} out of range (laminate has {len} layers)")]
    LayerIndexOutOfRange { index: usize, len: usize },

    #[error("Singular stiffness matrix - laminate is degenerate or the prescribed values leave no solvable subsystem")]
    SingularMatrix,

    #[error("Negative square root argument {value} in {context} - material/load combination outside the model's valid domain")]
    NegativeSqrt { context: &'static str, value: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid optimization configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CltError {
    /// Whether the error stems from the numerical domain of the model
    /// (singular system or a negative square-root argument)
    pub fn is_numeric_domain(&self) -> bool {
        matches!(self, Self::SingularMatrix | Self::NegativeSqrt { .. })
    }
}

/// Result type for CLT operations
pub type CltResult<T> = Result<T, CltError>;
