//! Validation of incoming order forms.
//!
//! The form arrives as loosely typed JSON; [`OrderForm::validate`] turns it
//! into a [`NewOrder`] or reports the first problem found.

use serde::Deserialize;
use serde_json::Value;

use crate::models::ProductId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("products field value is null or skipped")]
    ProductsMissing,

    #[error("products field value is not a list")]
    ProductsNotList,

    #[error("products list is empty")]
    ProductsEmpty,

    #[error("products[{index}]: {reason}")]
    InvalidLine { index: usize, reason: String },

    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error("phonenumber '{0}' is not a valid Russian phone number")]
    InvalidPhone(String),
}

/// Order form as posted by the storefront.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub phonenumber: String,
    #[serde(default)]
    pub address: String,
    /// Kept untyped so that a missing, null, or non-list value each get
    /// their own error.
    #[serde(default)]
    pub products: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct LineForm {
    product: ProductId,
    quantity: u32,
}

/// One requested product. The price is looked up at insert time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A validated order ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub firstname: String,
    pub lastname: String,
    /// E.164, e.g. `+79001234567`.
    pub phonenumber: String,
    pub address: String,
    pub lines: Vec<NewOrderLine>,
}

impl OrderForm {
    /// Checks the product list first, then the contact fields.
    ///
    /// # Errors
    ///
    /// Returns the first [`IntakeError`] found.
    pub fn validate(self) -> Result<NewOrder, IntakeError> {
        let lines = validate_products(self.products)?;

        let firstname = required("firstname", self.firstname)?;
        let lastname = required("lastname", self.lastname)?;
        let address = required("address", self.address)?;
        let raw_phone = required("phonenumber", self.phonenumber)?;
        let phonenumber =
            normalize_ru_phone(&raw_phone).ok_or(IntakeError::InvalidPhone(raw_phone))?;

        Ok(NewOrder {
            firstname,
            lastname,
            phonenumber,
            address,
            lines,
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, IntakeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IntakeError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

fn validate_products(products: Option<Value>) -> Result<Vec<NewOrderLine>, IntakeError> {
    let items = match products {
        None | Some(Value::Null) => return Err(IntakeError::ProductsMissing),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(IntakeError::ProductsNotList),
    };
    if items.is_empty() {
        return Err(IntakeError::ProductsEmpty);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let line: LineForm =
                serde_json::from_value(item).map_err(|e| IntakeError::InvalidLine {
                    index,
                    reason: e.to_string(),
                })?;
            if line.quantity == 0 {
                return Err(IntakeError::InvalidLine {
                    index,
                    reason: "quantity must be at least 1".to_string(),
                });
            }
            Ok(NewOrderLine {
                product_id: line.product,
                quantity: line.quantity,
            })
        })
        .collect()
}

/// Normalizes a Russian phone number to E.164.
///
/// Accepts `+7`, `7`, or trunk-prefix `8` followed by ten digits, with
/// spaces, dashes, and parentheses ignored.
#[must_use]
pub fn normalize_ru_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let has_plus = trimmed.starts_with('+');
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'))
    {
        return None;
    }
    let digits: String = body.chars().filter(char::is_ascii_digit).collect();

    let national = match (digits.len(), digits.as_bytes().first()) {
        (11, Some(b'7')) => &digits[1..],
        (11, Some(b'8')) if !has_plus => &digits[1..],
        _ => return None,
    };
    Some(format!("+7{national}"))
}
