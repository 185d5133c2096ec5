//! HTTP client for the Yandex geocoder JSON API.
//!
//! Issues one `GET /1.x?geocode=…&apikey=…&format=json` per address and
//! keeps only the most relevant match.

use std::time::Duration;

use foodcart_core::Coordinate;
use reqwest::{Client, Url};

use crate::error::GeocoderError;
use crate::provider::GeocodeProvider;
use crate::response::GeocodeEnvelope;

const DEFAULT_BASE_URL: &str = "https://geocode-maps.yandex.ru/";
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Client for the Yandex geocoder.
///
/// Use [`YandexGeocoder::new`] for production or
/// [`YandexGeocoder::with_base_url`] to point at a mock server in tests.
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct YandexGeocoder {
    client: Client,
    base_url: Url,
}

impl YandexGeocoder {
    /// Creates a client pointed at the production geocoder.
    ///
    /// # Errors
    ///
    /// Returns [`GeocoderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, GeocoderError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocoderError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeocoderError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, GeocoderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
            .user_agent("foodcart/0.1 (order-routing)")
            .build()?;

        // Trailing slash so that joining "1.x" appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocoderError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    fn build_url(&self, address: &str, api_key: &str) -> Url {
        let mut url = self
            .base_url
            .join("1.x")
            .unwrap_or_else(|_| self.base_url.clone());
        url.query_pairs_mut()
            .append_pair("geocode", address)
            .append_pair("apikey", api_key)
            .append_pair("format", "json");
        url
    }

    /// Geocodes one address, returning the top match's coordinate.
    ///
    /// # Errors
    ///
    /// - [`GeocoderError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`GeocoderError::Deserialize`] if the body is not the expected envelope.
    /// - [`GeocoderError::MalformedPosition`] if the top match has an unreadable position.
    pub async fn fetch_coordinates(
        &self,
        address: &str,
        api_key: &str,
    ) -> Result<Option<Coordinate>, GeocoderError> {
        let url = self.build_url(address, api_key);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;

        let envelope: GeocodeEnvelope =
            serde_json::from_str(&body).map_err(|e| GeocoderError::Deserialize {
                context: format!("geocode(address={address})"),
                source: e,
            })?;

        let Some(pos) = envelope.top_position() else {
            return Ok(None);
        };

        Coordinate::parse_lon_lat(pos)
            .map(Some)
            .ok_or_else(|| GeocoderError::MalformedPosition {
                address: address.to_string(),
                pos: pos.to_string(),
            })
    }
}

impl GeocodeProvider for YandexGeocoder {
    async fn geocode(
        &self,
        address: &str,
        api_key: &str,
    ) -> Result<Option<Coordinate>, GeocoderError> {
        self.fetch_coordinates(address, api_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> YandexGeocoder {
        YandexGeocoder::with_base_url(10, base_url).expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_endpoint_and_query() {
        let client = test_client("https://geocode-maps.yandex.ru");
        let url = client.build_url("Moscow", "test-key");
        assert_eq!(
            url.as_str(),
            "https://geocode-maps.yandex.ru/1.x?geocode=Moscow&apikey=test-key&format=json"
        );
    }

    #[test]
    fn build_url_keeps_base_path_prefix() {
        let client = test_client("http://127.0.0.1:8080/proxy/");
        let url = client.build_url("Moscow", "k");
        assert!(url.as_str().starts_with("http://127.0.0.1:8080/proxy/1.x?"));
    }

    #[test]
    fn build_url_encodes_address() {
        let client = test_client("https://geocode-maps.yandex.ru");
        let url = client.build_url("Москва, Тверская 1", "k");
        assert!(
            !url.as_str().contains(' ') && url.as_str().contains("geocode=%D0%9C"),
            "address should be percent-encoded: {url}"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = YandexGeocoder::with_base_url(10, "not a url");
        assert!(matches!(result, Err(GeocoderError::InvalidBaseUrl { .. })));
    }
}
