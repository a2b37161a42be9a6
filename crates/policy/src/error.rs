//! Policy specific errors for the Hearth content bridge.

#[derive(thiserror::Error, Debug, Clone)]
pub enum PolicyError {
    #[error("Disallowed URL scheme: {scheme}")]
    DisallowedScheme { scheme: String },
}

/// Result type for policy operations
pub type PolicyResult<T> = Result<T, PolicyError>;
