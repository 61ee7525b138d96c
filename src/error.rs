//! Error types for valuation and record loading

use thiserror::Error;

/// Errors raised by the valuation and comparison engines
///
/// Imprecise or missing optional data never produces one of these; it is
/// replaced by a default and recorded as a [`crate::valuation::FallbackNote`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    /// A required structural input is entirely absent
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Comparison needs at least two valued products
    #[error("at least {required} products are required for comparison, got {actual}")]
    InsufficientInput { required: usize, actual: usize },

    /// Break-even analysis needs a yearly breakdown on both sides
    #[error("product '{label}' has no yearly breakdown")]
    MissingBreakdown { label: String },
}

/// Errors raised while loading preferences or product records
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A row parsed but carried a value that cannot be interpreted
    #[error("invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
}
