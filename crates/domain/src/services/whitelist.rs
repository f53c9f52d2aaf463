//! Permitted-attribute whitelist for template update payloads.
//!
//! The whitelist is a mask, not a schema validator: recognized keys are
//! copied through, everything else is dropped silently. A recognized key
//! holding the wrong kind of value (an object where a scalar is expected,
//! a non-array where a list is expected) is dropped as if it were absent.

use serde_json::{Map, Value};

use super::PayloadError;

/// Key under which a payload may wrap its template attributes.
pub const TEMPLATE_WRAPPER_KEY: &str = "template";

/// Shape accepted for one key.
#[derive(Debug, Clone, Copy)]
pub enum Permit {
    /// String, number, boolean or null.
    Scalar,
    /// Any JSON object, passed through untouched.
    OpenMap,
    /// Ordered list of records, each masked with the given keys.
    ListOf(&'static [(&'static str, Permit)]),
}

const SCHEMA_KEYS: &[(&str, Permit)] = &[
    ("attachment_uuid", Permit::Scalar),
    ("name", Permit::Scalar),
];

const SUBMITTER_KEYS: &[(&str, Permit)] = &[("name", Permit::Scalar), ("uuid", Permit::Scalar)];

const OPTION_KEYS: &[(&str, Permit)] = &[("value", Permit::Scalar), ("uuid", Permit::Scalar)];

const AREA_KEYS: &[(&str, Permit)] = &[
    ("x", Permit::Scalar),
    ("y", Permit::Scalar),
    ("w", Permit::Scalar),
    ("h", Permit::Scalar),
    ("cell_w", Permit::Scalar),
    ("attachment_uuid", Permit::Scalar),
    ("option_uuid", Permit::Scalar),
    ("page", Permit::Scalar),
];

const FIELD_KEYS: &[(&str, Permit)] = &[
    ("uuid", Permit::Scalar),
    ("submitter_uuid", Permit::Scalar),
    ("name", Permit::Scalar),
    ("type", Permit::Scalar),
    ("required", Permit::Scalar),
    ("readonly", Permit::Scalar),
    ("default_value", Permit::Scalar),
    ("preferences", Permit::OpenMap),
    ("options", Permit::ListOf(OPTION_KEYS)),
    ("areas", Permit::ListOf(AREA_KEYS)),
];

/// Top-level attributes a template update may change.
pub const TEMPLATE_PERMITTED: &[(&str, Permit)] = &[
    ("name", Permit::Scalar),
    ("schema", Permit::ListOf(SCHEMA_KEYS)),
    ("submitters", Permit::ListOf(SUBMITTER_KEYS)),
    ("fields", Permit::ListOf(FIELD_KEYS)),
];

/// Masks an object down to the permitted keys, recursively.
pub fn mask_object(source: &Map<String, Value>, permitted: &[(&str, Permit)]) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, permit) in permitted {
        let Some(value) = source.get(*key) else {
            continue;
        };
        if let Some(masked) = mask_value(value, *permit) {
            out.insert((*key).to_string(), masked);
        }
    }
    out
}

fn mask_value(value: &Value, permit: Permit) -> Option<Value> {
    match (permit, value) {
        (Permit::Scalar, Value::Array(_) | Value::Object(_)) => None,
        (Permit::Scalar, scalar) => Some(scalar.clone()),
        (Permit::OpenMap, Value::Object(map)) => Some(Value::Object(map.clone())),
        (Permit::OpenMap, _) => None,
        (Permit::ListOf(keys), Value::Array(items)) => Some(Value::Array(
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|item| Value::Object(mask_object(item, keys)))
                .collect(),
        )),
        (Permit::ListOf(_), _) => None,
    }
}

/// Locates the attribute object of an update payload.
///
/// When the `template` key is present its value must be a non-empty object;
/// otherwise the payload itself is treated as flat.
pub fn attributes_root(payload: &Map<String, Value>) -> Result<&Map<String, Value>, PayloadError> {
    match payload.get(TEMPLATE_WRAPPER_KEY) {
        None => Ok(payload),
        Some(Value::Object(inner)) if !inner.is_empty() => Ok(inner),
        Some(_) => Err(PayloadError::MissingWrapper(TEMPLATE_WRAPPER_KEY)),
    }
}

/// Extracts the permitted template attributes from an update payload.
pub fn permit_template_attributes(
    payload: &Map<String, Value>,
) -> Result<Map<String, Value>, PayloadError> {
    let root = attributes_root(payload)?;
    Ok(mask_object(root, TEMPLATE_PERMITTED))
}
