//! # Validation Engine
//!
//! Payload types declare their per-field rules with `validator` derive
//! attributes. This module runs those rules and turns the result into a
//! [`ValidationFailure`] that names every offending field and the rule it
//! broke.
//!
//! Rule codes used across the crate:
//!
//! | Code             | Meaning                                |
//! |------------------|----------------------------------------|
//! | `required`       | field must be present                  |
//! | `max`            | number must not exceed a bound         |
//! | `length`         | string must have an exact length       |
//! | `max_length`     | string must not exceed a length        |
//! | `email`          | string must be a valid email address   |
//! | `min_max_length` | string length must fall in a range     |
//!
//! Validation never mutates the payload and always reports every
//! violation, not just the first.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

pub const RULE_REQUIRED: &str = "required";
pub const RULE_MAX: &str = "max";
pub const RULE_LENGTH: &str = "length";
pub const RULE_MAX_LENGTH: &str = "max_length";
pub const RULE_EMAIL: &str = "email";
pub const RULE_MIN_MAX_LENGTH: &str = "min_max_length";

/// A single broken rule
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Violation {
    /// Position in a batch, absent for single-entity validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub field: String,
    pub rule: String,
}

/// Every rule a payload (or batch of payloads) broke
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new(mut violations: Vec<Violation>) -> Self {
        violations.sort();
        Self { violations }
    }

    /// Failure carrying a single violation
    pub fn single(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::new(vec![Violation {
            index: None,
            field: field.into(),
            rule: rule.into(),
        }])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether `field` broke `rule` (in any batch position)
    pub fn has(&self, field: &str, rule: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.rule == rule)
    }

    fn from_errors(errors: &ValidationErrors, index: Option<usize>) -> Vec<Violation> {
        errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |err| Violation {
                    index,
                    field: field.clone(),
                    rule: err.code.to_string(),
                })
            })
            .collect()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed:")?;
        for (i, v) in self.violations.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            match v.index {
                Some(index) => write!(f, "{}[{}].{} ({})", sep, index, v.field, v.rule)?,
                None => write!(f, "{}{} ({})", sep, v.field, v.rule)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Validate a single payload, reporting every violated rule
pub fn check<T: Validate>(payload: &T) -> Result<(), ValidationFailure> {
    payload
        .validate()
        .map_err(|errors| ValidationFailure::new(ValidationFailure::from_errors(&errors, None)))
}

/// Validate every payload of a batch before any of them is used.
///
/// Violations carry the batch position of the payload they belong to.
pub fn check_all<T: Validate>(payloads: &[T]) -> Result<(), ValidationFailure> {
    let violations: Vec<Violation> = payloads
        .iter()
        .enumerate()
        .filter_map(|(index, payload)| {
            payload
                .validate()
                .err()
                .map(|errors| ValidationFailure::from_errors(&errors, Some(index)))
        })
        .flatten()
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure::new(violations))
    }
}
