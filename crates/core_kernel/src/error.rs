//! Errors raised while parsing kernel types

use thiserror::Error;

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    /// Currency code outside the supported ISO 4217 set
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Invalid identifier {input}: {source}")]
    InvalidIdentifier {
        input: String,
        #[source]
        source: uuid::Error,
    },
}

impl CoreError {
    pub fn invalid_identifier(input: &str, source: uuid::Error) -> Self {
        CoreError::InvalidIdentifier {
            input: input.to_string(),
            source,
        }
    }
}
