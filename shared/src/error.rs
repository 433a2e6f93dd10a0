//! Error types for Dining Concierge Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Dining Concierge Lambda functions.
#[derive(Error, Debug)]
pub enum Error {
    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The front-end routed an intent this bot does not handle
    #[error("Intent with name {0} not supported")]
    UnsupportedIntent(String),

    /// A slot required at fulfillment time was empty
    #[error("Missing slot: {0}")]
    MissingSlot(String),

    /// A queue message lacked a reservation attribute
    #[error("Missing message attribute: {0}")]
    MissingAttribute(String),

    /// A slot, attribute or record field held an unusable value
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    /// Fewer unique restaurants than the sample size
    #[error("Insufficient candidates: required {required}, available {available}")]
    InsufficientCandidates { required: usize, available: usize },

    /// Search index returned an error response
    #[error("Search error: {0}")]
    Search(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
