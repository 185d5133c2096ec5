//! Coordinates and great-circle distance.
//!
//! Coordinates follow the geocoder's `lon lat` order. Distances use the
//! haversine formula on a sphere of mean Earth radius.

use serde::{Deserialize, Serialize};

/// IUGG mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6_371.008_8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Parse a `"<lon> <lat>"` pair as returned in a geocoder `Point.pos`.
    ///
    /// Returns `None` unless the text holds exactly two finite numbers.
    #[must_use]
    pub fn parse_lon_lat(pos: &str) -> Option<Self> {
        let mut parts = pos.split_whitespace();
        let lon = parts.next()?.parse::<f64>().ok()?;
        let lat = parts.next()?.parse::<f64>().ok()?;
        if parts.next().is_some() || !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        Some(Self { lon, lat })
    }
}

/// Great-circle distance between two optional coordinates in kilometers.
///
/// `None` when either side is absent.
#[must_use]
pub fn distance_km(from: Option<Coordinate>, to: Option<Coordinate>) -> Option<f64> {
    let (from, to) = (from?, to?);

    let lat_from = from.lat.to_radians();
    let lat_to = to.lat.to_radians();
    let half_dlat = (to.lat - from.lat).to_radians() / 2.0;
    let half_dlon = (to.lon - from.lon).to_radians() / 2.0;

    let h = half_dlat.sin().powi(2) + lat_from.cos() * lat_to.cos() * half_dlon.sin().powi(2);
    // Rounding can push h a hair past 1.0 for antipodal points.
    let central_angle = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    Some(EARTH_RADIUS_KM * central_angle)
}
