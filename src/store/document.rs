//! # Documents
//!
//! A stored record: the internal identifier plus a JSON field map.
//! Records cross into and out of the store through serde.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};
use super::filter::ID_FIELD;
use super::object_id::ObjectId;

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: ObjectId,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: ObjectId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Encode a record under the given identifier.
    ///
    /// Any `_id` the record serializes is dropped; the identifier lives
    /// only in [`Document::id`].
    pub fn from_record<T: Serialize>(id: ObjectId, record: &T) -> StoreResult<Self> {
        match serde_json::to_value(record).map_err(|e| StoreError::Encode(e.to_string()))? {
            Value::Object(mut fields) => {
                fields.remove(ID_FIELD);
                Ok(Self { id, fields })
            }
            other => Err(StoreError::Encode(format!(
                "expected an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// External JSON form with `_id` rendered as hex
    pub fn to_json(&self) -> Value {
        let mut fields = self.fields.clone();
        fields.insert(ID_FIELD.to_string(), Value::String(self.id.to_hex()));
        Value::Object(fields)
    }

    /// Decode into a record type
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        serde_json::from_value(self.to_json()).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Item {
        #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
        id: Option<ObjectId>,
        name: String,
    }

    #[test]
    fn test_record_round_trip_keeps_id_out_of_fields() {
        let id = ObjectId::new();
        let item = Item {
            id: Some(id),
            name: "phone".to_string(),
        };

        let doc = Document::from_record(id, &item).unwrap();
        assert!(!doc.fields.contains_key("_id"));
        assert_eq!(doc.fields.get("name"), Some(&json!("phone")));

        let back: Item = doc.decode().unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_non_object_rejected() {
        let result = Document::from_record(ObjectId::new(), &vec![1, 2, 3]);
        assert!(matches!(result, Err(StoreError::Encode(_))));
    }
}
