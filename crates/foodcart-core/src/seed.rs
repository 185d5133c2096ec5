//! Seed files for the initial restaurant/product catalog.
//!
//! Both files are JSON arrays in the format exported by the storefront:
//! restaurants carry `title`, `address`, `contact_phone`; products carry
//! `title`, `type`, `price`, `description` and `img`.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantSeed {
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSeed {
    pub title: String,
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    pub img: Option<String>,
}

/// Load and validate restaurant seeds.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_restaurants_seed(path: &Path) -> Result<Vec<RestaurantSeed>, ConfigError> {
    let seeds: Vec<RestaurantSeed> = read_json(path)?;
    ensure_unique_titles(seeds.iter().map(|s| s.title.as_str()), "restaurant")?;
    Ok(seeds)
}

/// Load and validate product seeds.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_products_seed(path: &Path) -> Result<Vec<ProductSeed>, ConfigError> {
    let seeds: Vec<ProductSeed> = read_json(path)?;
    ensure_unique_titles(seeds.iter().map(|s| s.title.as_str()), "product")?;
    if let Some(bad) = seeds.iter().find(|s| s.price.is_sign_negative()) {
        return Err(ConfigError::Validation(format!(
            "product '{}' has negative price {}",
            bad.title, bad.price
        )));
    }
    Ok(seeds)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_json(&content, path)
}

fn parse_json<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::SeedFileParse {
        path: path.display().to_string(),
        source: e,
    })
}

fn ensure_unique_titles<'a>(
    titles: impl Iterator<Item = &'a str>,
    kind: &str,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for title in titles {
        if title.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{kind} title is empty")));
        }
        if !seen.insert(title) {
            return Err(ConfigError::Validation(format!(
                "duplicate {kind} title: {title}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_restaurant_seed_with_missing_optional_fields() {
        let seeds: Vec<RestaurantSeed> = parse_json(
            r#"[{"title": "Star Burger Arbat", "address": "Moscow, Arbat 1"}]"#,
            Path::new("restaurants.json"),
        )
        .expect("parse");
        assert_eq!(seeds[0].title, "Star Burger Arbat");
        assert_eq!(seeds[0].contact_phone, "");
    }

    #[test]
    fn parses_product_seed_with_numeric_price() {
        let seeds: Vec<ProductSeed> = parse_json(
            r#"[{"title": "Cheeseburger", "type": "Burgers", "price": 350, "img": "cheese.jpg"}]"#,
            Path::new("products.json"),
        )
        .expect("parse");
        assert_eq!(seeds[0].category.as_deref(), Some("Burgers"));
        assert_eq!(seeds[0].price, Decimal::from(350));
        assert_eq!(seeds[0].description, "");
    }

    #[test]
    fn duplicate_titles_are_rejected() {
        let result = ensure_unique_titles(["A", "B", "A"].into_iter(), "restaurant");
        assert!(matches!(result, Err(ConfigError::Validation(ref m)) if m.contains("duplicate")));
    }

    #[test]
    fn blank_titles_are_rejected() {
        let result = ensure_unique_titles(["  "].into_iter(), "product");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn malformed_json_reports_path() {
        let result: Result<Vec<RestaurantSeed>, _> =
            parse_json("{not json", Path::new("seed/restaurants.json"));
        assert!(
            matches!(result, Err(ConfigError::SeedFileParse { ref path, .. }) if path == "seed/restaurants.json")
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_restaurants_seed(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ConfigError::SeedFileIo { .. })));
    }

    #[test]
    fn bundled_seed_files_are_valid() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
        let restaurants = load_restaurants_seed(&data.join("restaurants.json")).expect("restaurants");
        let products = load_products_seed(&data.join("products.json")).expect("products");
        assert!(!restaurants.is_empty());
        assert!(products.iter().any(|p| p.price == Decimal::new(25_950, 2)));
    }
}
