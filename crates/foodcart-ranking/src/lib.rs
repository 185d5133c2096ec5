//! Restaurant matching and distance ranking for pending orders.
//!
//! [`enrich`] is the entry point: it finds the restaurants able to cook
//! every item of each order, geocodes the batch's addresses once through a
//! [`GeocodeCache`](foodcart_geocoder::GeocodeCache), and orders each
//! order's candidates by distance to the delivery address.

pub mod availability;
pub mod matcher;
pub mod pipeline;
pub mod types;

pub use availability::{availability_matrix, ProductAvailability};
pub use matcher::{match_restaurants, MenuIndex};
pub use pipeline::{compare_distance, enrich, rank_restaurants};
pub use types::{CandidateRestaurant, RankedOrder};
