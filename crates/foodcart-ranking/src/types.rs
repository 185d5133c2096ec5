use foodcart_core::{Order, OrderStatus, PaymentMethod, Restaurant, RestaurantId};
use rust_decimal::Decimal;
use serde::Serialize;

/// A restaurant able to fulfil an order, with its distance to the delivery address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRestaurant {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
    /// `None` when either address could not be geocoded.
    pub distance_km: Option<f64>,
}

impl CandidateRestaurant {
    #[must_use]
    pub fn from_restaurant(restaurant: &Restaurant) -> Self {
        Self {
            restaurant_id: restaurant.id,
            name: restaurant.name.clone(),
            address: restaurant.address.clone(),
            contact_phone: restaurant.contact_phone.clone(),
            distance_km: None,
        }
    }
}

/// An order with its candidate restaurants, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOrder {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub comment: String,
    pub total_cost: Decimal,
    pub restaurants: Vec<CandidateRestaurant>,
}

impl RankedOrder {
    pub(crate) fn new(order: &Order, restaurants: Vec<CandidateRestaurant>) -> Self {
        Self {
            id: order.id,
            firstname: order.firstname.clone(),
            lastname: order.lastname.clone(),
            phonenumber: order.phonenumber.clone(),
            address: order.address.clone(),
            status: order.status,
            payment_method: order.payment_method,
            comment: order.comment.clone(),
            total_cost: order.total_cost(),
            restaurants,
        }
    }
}
