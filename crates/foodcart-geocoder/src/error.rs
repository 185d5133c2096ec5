use thiserror::Error;

/// Errors returned by the geocoding provider client.
#[derive(Debug, Error)]
pub enum GeocoderError {
    /// Network failure, timeout, or non-2xx status from the provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected envelope.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The top match carried a position that is not a `"<lon> <lat>"` pair.
    #[error("malformed position '{pos}' for address '{address}'")]
    MalformedPosition { address: String, pos: String },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Failure reported by a [`GeocodeStore`](crate::GeocodeStore) backend.
#[derive(Debug, Error)]
#[error("geocode store error: {0}")]
pub struct StoreError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}
