//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

pub use launchpad_provider::{ErrorKind, ProviderError};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Domain not found
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Deployment attempt not found
    #[error("Deployment not found: {0}")]
    DeploymentNotFound(String),

    /// Landing page not found
    #[error("Landing page not found: {0}")]
    LandingPageNotFound(String),

    /// Missing or malformed input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Batch with no items
    #[error("Batch is empty")]
    EmptyBatch,

    /// Batch exceeds the configured cap
    #[error("Batch of {size} items exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    /// Deletion blocked by records that still depend on the target
    #[error("{0}")]
    DependencyConflict(String),

    /// A deployment did not reach a terminal state in time
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// DNS provider or hosting platform error
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::DomainNotFound(_)
            | Self::DeploymentNotFound(_)
            | Self::LandingPageNotFound(_)
            | Self::ValidationError(_)
            | Self::EmptyBatch
            | Self::BatchTooLarge { .. }
            | Self::DependencyConflict(_) => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Provider failure class, when this wraps a provider error.
    #[must_use]
    pub fn provider_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Provider(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
