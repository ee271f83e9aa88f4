//! # Equality Filters
//!
//! A filter is a set of `field == value` terms combined with AND logic.
//! [`Filter::from_query`] builds one from inbound query parameters.

use std::collections::BTreeMap;

use serde_json::Value;

use super::document::Document;
use super::errors::IdError;
use super::object_id::ObjectId;

/// Name of the identifier field in documents and query strings
pub const ID_FIELD: &str = "_id";

/// Right-hand side of an equality term
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Decoded identifier, only valid for [`ID_FIELD`]
    Id(ObjectId),

    /// Any other field value, compared without coercion
    Json(Value),
}

impl FilterValue {
    /// Check a document field against this value
    fn matches(&self, field: &str, doc: &Document) -> bool {
        match self {
            FilterValue::Id(id) => field == ID_FIELD && doc.id == *id,
            FilterValue::Json(expected) => {
                if field == ID_FIELD {
                    return false;
                }
                doc.fields.get(field) == Some(expected)
            }
        }
    }
}

/// A set of equality terms combined with AND logic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    terms: BTreeMap<String, FilterValue>,
}

impl Filter {
    /// Filter matching every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter selecting a single identifier
    pub fn by_id(id: ObjectId) -> Self {
        let mut filter = Self::new();
        filter.terms.insert(ID_FIELD.to_string(), FilterValue::Id(id));
        filter
    }

    /// Add an equality term on a non-identifier field
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms
            .insert(field.into(), FilterValue::Json(value.into()));
        self
    }

    /// Build a filter from query parameters.
    ///
    /// Every parameter becomes an exact-equality term on a field of the same
    /// name with its string value taken verbatim. Only the first value of a
    /// repeated key participates. The identifier field is decoded through the
    /// identifier codec; a decode failure fails the whole build.
    pub fn from_query<I, K, V>(params: I) -> Result<Self, IdError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut filter = Self::new();

        for (key, value) in params {
            let key = key.into();
            if filter.terms.contains_key(&key) {
                continue;
            }

            let term = if key == ID_FIELD {
                FilterValue::Id(ObjectId::parse_str(value.as_ref())?)
            } else {
                FilterValue::Json(Value::String(value.as_ref().to_string()))
            };
            filter.terms.insert(key, term);
        }

        Ok(filter)
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.terms.get(field)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check if a document satisfies every term
    pub fn matches(&self, doc: &Document) -> bool {
        self.terms
            .iter()
            .all(|(field, value)| value.matches(field, doc))
    }
}
