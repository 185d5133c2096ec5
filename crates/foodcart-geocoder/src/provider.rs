use std::future::Future;

use foodcart_core::Coordinate;

use crate::error::GeocoderError;

/// A geocoding service returning the single best match for an address.
///
/// `Ok(None)` means the provider answered but found nothing. Implementations
/// must bound each request with a timeout.
pub trait GeocodeProvider: Sync {
    fn geocode(
        &self,
        address: &str,
        api_key: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, GeocoderError>> + Send;
}
