//! Plain records supplied by the catalog/order store.
//!
//! Nothing here touches the database; `foodcart-db` maps rows into these
//! types and the ranking pipeline consumes them read-only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type RestaurantId = i64;
pub type ProductId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    /// Free-text address; may be empty when the restaurant never provided one.
    pub address: String,
    pub contact_phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
}

/// Whether a restaurant currently offers a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuAvailability {
    pub restaurant_id: RestaurantId,
    pub product_id: ProductId,
    pub availability: bool,
}

/// Snapshot of the restaurant catalog.
///
/// `restaurants` is kept in insertion order (ascending id); ranking ties fall
/// back to that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub restaurants: Vec<Restaurant>,
    pub products: Vec<Product>,
    pub menu: Vec<MenuAvailability>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    NotProcessed,
    Processed,
    Done,
}

impl OrderStatus {
    /// Parse the stored status code. Unknown codes yield `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "not_processed" => Some(Self::NotProcessed),
            "processed" => Some(Self::Processed),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::NotProcessed => "not_processed",
            Self::Processed => "processed",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CardOnline,
}

impl PaymentMethod {
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "cash" => Some(Self::Cash),
            "card_online" => Some(Self::CardOnline),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::CardOnline => "card_online",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price captured when the order was placed.
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub comment: String,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status != OrderStatus::Done
    }
}
