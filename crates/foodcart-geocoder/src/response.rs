//! Wire types for the geocoder JSON response.
//!
//! Only the path down to `featureMember[].GeoObject.Point.pos` is modelled;
//! everything else in the payload is ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeEnvelope {
    pub response: GeocodeResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    #[serde(rename = "GeoObjectCollection")]
    pub collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeoObjectCollection {
    /// Matches ordered by relevance.
    #[serde(rename = "featureMember", default)]
    pub feature_members: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureMember {
    #[serde(rename = "GeoObject")]
    pub geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeoObject {
    #[serde(rename = "Point")]
    pub point: Point,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Point {
    /// `"<lon> <lat>"`.
    pub pos: String,
}

impl GeocodeEnvelope {
    /// Position string of the most relevant match, if any.
    pub fn top_position(&self) -> Option<&str> {
        self.response
            .collection
            .feature_members
            .first()
            .map(|m| m.geo_object.point.pos.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_position_takes_first_member() {
        let body = serde_json::json!({
            "response": {
                "GeoObjectCollection": {
                    "metaDataProperty": {},
                    "featureMember": [
                        { "GeoObject": { "name": "a", "Point": { "pos": "37.1 55.1" } } },
                        { "GeoObject": { "name": "b", "Point": { "pos": "30.2 59.9" } } }
                    ]
                }
            }
        });
        let envelope: GeocodeEnvelope = serde_json::from_value(body).expect("deserialize");
        assert_eq!(envelope.top_position(), Some("37.1 55.1"));
    }

    #[test]
    fn missing_feature_member_means_no_match() {
        let body = serde_json::json!({
            "response": { "GeoObjectCollection": {} }
        });
        let envelope: GeocodeEnvelope = serde_json::from_value(body).expect("deserialize");
        assert_eq!(envelope.top_position(), None);
    }
}
