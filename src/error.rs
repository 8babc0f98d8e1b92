//! Error types.
//!
//! Missing locators and missing content targets are not errors; the affected
//! candidate is simply left alone.

/// Error returned while parsing or validating a [`crate::config::LoaderConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document could not be deserialized.
    #[error("invalid loader config: {0}")]
    Json(#[from] serde_json::Error),
    /// The root margin shorthand has no values or more than four.
    #[error("root margin must have 1 to 4 values, got {0}")]
    MarginArity(usize),
    /// A root margin component is not a `px` or `%` length.
    #[error("invalid root margin length: {0:?}")]
    MarginLength(String),
    /// The intersection threshold is outside `[0, 1]` or not finite.
    #[error("threshold must be within [0, 1], got {0}")]
    Threshold(f64),
    /// A marker class or attribute name is empty.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),
}

/// Error returned by a [`crate::fetch::Fetch`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The resource could not be retrieved for display.
    #[error("failed to load {locator}")]
    Failed { locator: String },
    /// The host refused to start the fetch.
    #[error("host error: {0}")]
    Host(String),
}
