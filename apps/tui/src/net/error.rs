use thiserror::Error;

/// Failures talking to an external geocoding or directions provider. All of
/// these are non-fatal: callers degrade to the next provider in the chain or
/// to an empty result.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("no route in provider response")]
    NoRoute,

    #[error("invalid provider url")]
    InvalidUrl,
}
