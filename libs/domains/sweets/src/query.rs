//! Search filters for sweets.
//!
//! A [`SweetQuery`] renders either as a MongoDB filter document
//! ([`SweetQuery::to_filter`]) or as an in-process predicate
//! ([`SweetQuery::matches`]). Both apply the same rules:
//!
//! - `name`: case-insensitive substring, matched literally
//! - `category`: exact match
//! - `minPrice` / `maxPrice`: inclusive bounds
//!
//! Empty `name` or `category` values impose no constraint.

use mongodb::bson::{Document, doc};
use serde::{Deserialize, Deserializer, de};
use utoipa::IntoParams;

use crate::models::Sweet;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SweetQuery {
    /// Case-insensitive substring of the sweet name
    pub name: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Inclusive lower price bound
    #[serde(default, deserialize_with = "optional_price")]
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    #[serde(default, deserialize_with = "optional_price")]
    pub max_price: Option<f64>,
}

impl SweetQuery {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|s| !s.is_empty())
    }

    /// True when no filter is set
    pub fn is_empty(&self) -> bool {
        self.name().is_none()
            && self.category().is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    pub fn to_filter(&self) -> Document {
        let mut filter = doc! {};

        if let Some(name) = self.name() {
            filter.insert(
                "name",
                doc! { "$regex": regex::escape(name), "$options": "i" },
            );
        }

        if let Some(category) = self.category() {
            filter.insert("category", category);
        }

        if self.min_price.is_some() || self.max_price.is_some() {
            let mut price = doc! {};
            if let Some(min) = self.min_price {
                price.insert("$gte", min);
            }
            if let Some(max) = self.max_price {
                price.insert("$lte", max);
            }
            filter.insert("price", price);
        }

        filter
    }

    pub fn matches(&self, sweet: &Sweet) -> bool {
        if let Some(name) = self.name() {
            if !sweet.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }

        if let Some(category) = self.category() {
            if sweet.category != category {
                return false;
            }
        }

        if self.min_price.is_some_and(|min| sweet.price < min) {
            return false;
        }

        !self.max_price.is_some_and(|max| sweet.price > max)
    }
}

/// `""` means absent; anything else must parse as a finite number.
fn optional_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;

    let Some(raw) = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(de::Error::custom(format!("invalid price: {}", raw))),
    }
}
