//! Product records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::store::{ObjectId, ID_FIELD};

/// A catalog product as stored and returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned once at creation; `None` means not yet persisted
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(rename = "product_name")]
    pub name: String,

    pub price: i64,

    pub currency: String,

    #[serde(default)]
    pub discount: i64,

    pub vendor: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessories: Vec<String>,

    #[serde(default)]
    pub is_essential: String,
}

impl Product {
    /// Identifier of this product, minting one if it has none yet.
    ///
    /// An identifier that is already set is never replaced.
    pub fn assign_id(&mut self) -> ObjectId {
        *self.id.get_or_insert_with(ObjectId::new)
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Inbound product body, for both creation and update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(required, length(max = 10, code = "max_length"))]
    pub product_name: Option<String>,

    #[validate(required, range(max = 2000, code = "max"))]
    pub price: Option<i64>,

    #[validate(required, length(equal = 3, code = "length"))]
    pub currency: Option<String>,

    pub discount: Option<i64>,

    #[validate(required)]
    pub vendor: Option<String>,

    pub accessories: Option<Vec<String>>,

    pub is_essential: Option<String>,
}

impl ProductPayload {
    /// Overlay an update body on a stored product's fields.
    ///
    /// Keys present in `patch` replace the stored ones; `_id` in the patch
    /// is ignored since identifiers are immutable.
    pub fn merged(
        stored: &Map<String, Value>,
        patch: Map<String, Value>,
    ) -> Result<Self, serde_json::Error> {
        let mut fields = stored.clone();
        for (key, value) in patch {
            if key != ID_FIELD {
                fields.insert(key, value);
            }
        }
        fields.remove(ID_FIELD);
        serde_json::from_value(Value::Object(fields))
    }

    /// Build the record. Call only after the payload has been validated.
    pub fn into_product(self, id: Option<ObjectId>) -> Product {
        Product {
            id,
            name: self.product_name.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            currency: self.currency.unwrap_or_default(),
            discount: self.discount.unwrap_or_default(),
            vendor: self.vendor.unwrap_or_default(),
            accessories: self.accessories.unwrap_or_default(),
            is_essential: self.is_essential.unwrap_or_default(),
        }
    }
}
