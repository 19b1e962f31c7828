//! Unified error hierarchy.
//!
//! Mutating operations validate eagerly and fail fast with a typed error the
//! UI layer surfaces to the user. Read-only aggregate queries degrade to
//! documented defaults on insufficient data instead of erroring; the one
//! exception is unit conversion, which must never paper over a cross-family
//! request with a nonsensical number.

use thiserror::Error;

use crate::benchmark::BenchmarkError;
use crate::config::ConfigError;
use crate::export::ExportError;
use crate::storage::StorageError;
use crate::units::UnitError;

/// Top-level error type for all engine operations
#[derive(Debug, Error)]
pub enum CarnetError {
    /// Unit comparison/conversion errors
    #[error("unit error: {0}")]
    Unit(#[from] UnitError),

    /// Benchmark validation and lookup errors
    #[error("benchmark error: {0}")]
    Benchmark(#[from] BenchmarkError),

    /// Persistence collaborator errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Export errors
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, CarnetError>;

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation but the application can continue
    Error,
    /// Warning the user can act on directly
    Warning,
}

impl CarnetError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CarnetError::Unit(_) | CarnetError::Benchmark(_) => ErrorSeverity::Warning,
            CarnetError::Storage(_)
            | CarnetError::Config(_)
            | CarnetError::Export(_)
            | CarnetError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CarnetError::Benchmark(BenchmarkError::Validation(reason)) => reason.clone(),
            CarnetError::Benchmark(BenchmarkError::UnknownBenchmark { .. }) => {
                "That benchmark no longer exists. It may have been deleted.".to_string()
            }
            CarnetError::Unit(UnitError::Incompatible { from, to }) => {
                format!("Values in {} cannot be converted to {}.", from, to)
            }
            CarnetError::Storage(_) => {
                "Could not read or write tracker data. Check the data directory.".to_string()
            }
            _ => self.to_string(),
        }
    }
}
