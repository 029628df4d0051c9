use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{SweetError, SweetResult};

/// Sweet as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sweet {
    /// 24-character hex ObjectId
    #[serde(rename = "_id", alias = "id", with = "hex_object_id")]
    #[schema(value_type = String, example = "665f1c2e8b3e4a0012345678")]
    pub id: ObjectId,
    #[schema(example = "Gulab Jamun")]
    pub name: String,
    #[schema(example = "Indian")]
    pub category: String,
    #[schema(example = 50.0)]
    pub price: f64,
    #[schema(example = 20)]
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// BSON shape of a sweet in the `sweets` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweetDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl SweetDocument {
    pub fn new(input: NewSweet) -> Self {
        let now = bson::DateTime::now();
        Self {
            id: ObjectId::new(),
            name: input.name,
            category: input.category,
            price: input.price,
            quantity: input.quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<SweetDocument> for Sweet {
    fn from(doc: SweetDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            category: doc.category,
            price: doc.price,
            quantity: doc.quantity,
            created_at: to_chrono(doc.created_at),
            updated_at: to_chrono(doc.updated_at),
        }
    }
}

impl From<&Sweet> for SweetDocument {
    fn from(sweet: &Sweet) -> Self {
        Self {
            id: sweet.id,
            name: sweet.name.clone(),
            category: sweet.category.clone(),
            price: sweet.price,
            quantity: sweet.quantity,
            created_at: bson::DateTime::from_millis(sweet.created_at.timestamp_millis()),
            updated_at: bson::DateTime::from_millis(sweet.updated_at.timestamp_millis()),
        }
    }
}

fn to_chrono(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

/// DTO for creating a sweet. Every field is required.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateSweet {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    #[schema(example = "Gulab Jamun")]
    pub name: Option<String>,

    #[validate(
        required(message = "category is required"),
        length(min = 1, message = "category must not be empty")
    )]
    #[schema(example = "Indian")]
    pub category: Option<String>,

    #[validate(
        required(message = "price is required"),
        range(min = 0.0, message = "price must not be negative")
    )]
    #[schema(example = 50.0, minimum = 0)]
    pub price: Option<f64>,

    #[validate(
        required(message = "quantity is required"),
        range(min = 0, message = "quantity must not be negative")
    )]
    #[schema(example = 20, minimum = 0)]
    pub quantity: Option<i64>,
}

impl CreateSweet {
    /// Validate and unwrap into a [`NewSweet`].
    pub fn into_new_sweet(self) -> SweetResult<NewSweet> {
        self.validate()
            .map_err(|e| SweetError::Validation(e.to_string()))?;

        match (self.name, self.category, self.price, self.quantity) {
            (Some(name), Some(category), Some(price), Some(quantity)) => Ok(NewSweet {
                name,
                category,
                price,
                quantity,
            }),
            _ => Err(SweetError::Validation(
                "name, category, price and quantity are required".to_string(),
            )),
        }
    }
}

/// A validated sweet ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

/// Body of purchase and restock requests.
///
/// `quantity` is kept as raw JSON so that `2.5`, `"5"` or `null` are reported
/// as an invalid quantity instead of a body parse failure.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct StockRequest {
    #[schema(value_type = Option<i64>, example = 5)]
    pub quantity: Option<Value>,
}

impl StockRequest {
    pub fn new(quantity: i64) -> Self {
        Self {
            quantity: Some(Value::from(quantity)),
        }
    }

    /// The requested amount if it is a whole number greater than zero.
    pub fn positive_quantity(&self) -> SweetResult<i64> {
        self.quantity
            .as_ref()
            .and_then(whole_number)
            .filter(|q| *q > 0)
            .ok_or(SweetError::InvalidQuantity)
    }
}

/// `5` and `5.0` are whole numbers; `5.5`, strings and null are not.
fn whole_number(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };

    if let Some(n) = number.as_i64() {
        return Some(n);
    }

    let f = number.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetails {
    pub purchased_quantity: i64,
    /// `price * purchasedQuantity`
    pub total_cost: f64,
    pub remaining_stock: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestockDetails {
    pub restocked_quantity: i64,
    pub previous_stock: i64,
    pub new_stock: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteSweetResponse {
    #[schema(example = "Sweet deleted successfully")]
    pub message: String,
    pub sweet: Sweet,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    #[schema(example = "Purchase successful")]
    pub message: String,
    pub sweet: Sweet,
    pub purchase_details: PurchaseDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestockResponse {
    #[schema(example = "Restock successful")]
    pub message: String,
    pub sweet: Sweet,
    pub restock_details: RestockDetails,
}

/// Serialize an ObjectId as its hex string instead of extended JSON.
mod hex_object_id {
    use mongodb::bson::oid::ObjectId;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let hex = String::deserialize(deserializer)?;
        ObjectId::parse_str(&hex).map_err(de::Error::custom)
    }
}
