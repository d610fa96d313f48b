//! Product payload validation.
//!
//! Payloads are checked as raw JSON before they are turned into typed
//! [`ProductFields`], so that every violation can be reported at once instead
//! of stopping at the first serde error.
//!
//! # Rules
//!
//! | Field         | Rule                       |
//! |---------------|----------------------------|
//! | `name`        | non-empty string           |
//! | `description` | non-empty string           |
//! | `price`       | finite number              |
//! | `category`    | non-empty string           |
//! | `inStock`     | boolean                    |
//!
//! Strings consisting only of whitespace count as empty.

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::models::ProductFields;

/// Separator between violations in a validation error message.
pub const VIOLATION_SEPARATOR: &str = "; ";

/// Which fields must be present for a payload to be valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Every field must be present (create, full replace).
    RequireAll,
    /// Absent fields are skipped; present fields must still be well-typed.
    PresentOnly,
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    NonEmptyString,
    FiniteNumber,
    Boolean,
}

impl Rule {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Rule::NonEmptyString => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            Rule::FiniteNumber => value.as_f64().is_some_and(f64::is_finite),
            Rule::Boolean => value.is_boolean(),
        }
    }

    fn expectation(self) -> &'static str {
        match self {
            Rule::NonEmptyString => "a non-empty string",
            Rule::FiniteNumber => "a finite number",
            Rule::Boolean => "a boolean",
        }
    }
}

/// Field rules, in the order violations are reported.
const PRODUCT_RULES: [(&str, Rule); 5] = [
    ("name", Rule::NonEmptyString),
    ("description", Rule::NonEmptyString),
    ("price", Rule::FiniteNumber),
    ("category", Rule::NonEmptyString),
    ("inStock", Rule::Boolean),
];

/// Validate a candidate product payload.
///
/// All field rules are evaluated; if any fail, the returned
/// [`ErrorKind::Validation`](crate::error::ErrorKind::Validation) error lists
/// every violation joined by `"; "`.
///
/// # Errors
///
/// Returns a validation error if the payload is not a JSON object or if any
/// field violates its rule.
pub fn validate_product(payload: &Value, presence: Presence) -> AppResult<()> {
    let Some(object) = payload.as_object() else {
        return Err(AppError::validation(
            "Request body must be a JSON object",
        ));
    };

    let violations = collect_violations(object, presence);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(violations.join(VIOLATION_SEPARATOR)))
    }
}

fn collect_violations(object: &Map<String, Value>, presence: Presence) -> Vec<String> {
    PRODUCT_RULES
        .iter()
        .filter_map(|&(field, rule)| match object.get(field) {
            None | Some(Value::Null) if presence == Presence::RequireAll => {
                Some(format!("{field} is required"))
            }
            None => None,
            Some(value) if rule.accepts(value) => None,
            Some(_) => Some(format!("{field} must be {}", rule.expectation())),
        })
        .collect()
}

/// Validate a full payload and convert it into typed fields.
///
/// # Errors
///
/// Returns the aggregated validation error from [`validate_product`].
pub fn parse_product_fields(payload: Value) -> AppResult<ProductFields> {
    validate_product(&payload, Presence::RequireAll)?;
    Ok(serde_json::from_value(payload)?)
}
