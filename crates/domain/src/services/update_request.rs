//! Normalizes raw update payloads into one canonical command.
//!
//! Payloads arrive either flat or wrapped under `template`. Everything that
//! depends on that shape is resolved here so mutation logic only ever sees
//! an [`UpdateTemplateCommand`].

use serde_json::{Map, Value};

use super::whitelist::{permit_template_attributes, TEMPLATE_WRAPPER_KEY};
use super::PayloadError;

const FOLDER_NAME_KEY: &str = "folder_name";
const ARCHIVED_KEY: &str = "archived";

/// Requested change to a template's archival state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveIntent {
    Unchanged,
    Archive,
    Restore,
}

impl ArchiveIntent {
    /// Only literal JSON booleans toggle the archival state.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Bool(true)) => ArchiveIntent::Archive,
            Some(Value::Bool(false)) => ArchiveIntent::Restore,
            _ => ArchiveIntent::Unchanged,
        }
    }
}

/// Canonical update request.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTemplateCommand {
    pub folder_name: Option<String>,
    pub archive: ArchiveIntent,
    /// Whitelisted attributes, still loosely typed.
    pub attributes: Map<String, Value>,
}

/// Builds the canonical command from a request body.
///
/// `folder_name` is taken from the top level when it holds a usable value,
/// otherwise from the `template` wrapper. `archived` is taken from the top
/// level whenever the key is present there, whatever its value.
pub fn normalize_update(payload: &Value) -> Result<UpdateTemplateCommand, PayloadError> {
    let payload = payload.as_object().ok_or(PayloadError::NotAnObject)?;
    let attributes = permit_template_attributes(payload)?;
    let nested = payload.get(TEMPLATE_WRAPPER_KEY).and_then(Value::as_object);

    let folder_name = scalar_text(payload.get(FOLDER_NAME_KEY))
        .or_else(|| nested.and_then(|n| scalar_text(n.get(FOLDER_NAME_KEY))));

    let archived = if payload.contains_key(ARCHIVED_KEY) {
        payload.get(ARCHIVED_KEY)
    } else {
        nested.and_then(|n| n.get(ARCHIVED_KEY))
    };

    Ok(UpdateTemplateCommand {
        folder_name,
        archive: ArchiveIntent::from_value(archived),
        attributes,
    })
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_archive_intent_strict_booleans() {
        assert_eq!(ArchiveIntent::from_value(Some(&json!(true))), ArchiveIntent::Archive);
        assert_eq!(ArchiveIntent::from_value(Some(&json!(false))), ArchiveIntent::Restore);
        assert_eq!(ArchiveIntent::from_value(Some(&json!("true"))), ArchiveIntent::Unchanged);
        assert_eq!(ArchiveIntent::from_value(Some(&json!(1))), ArchiveIntent::Unchanged);
        assert_eq!(ArchiveIntent::from_value(Some(&json!(null))), ArchiveIntent::Unchanged);
        assert_eq!(ArchiveIntent::from_value(None), ArchiveIntent::Unchanged);
    }

    #[test]
    fn test_flat_payload() {
        let cmd = normalize_update(&json!({
            "name": "NDA",
            "folder_name": "Contracts",
            "archived": true
        }))
        .unwrap();
        assert_eq!(cmd.folder_name.as_deref(), Some("Contracts"));
        assert_eq!(cmd.archive, ArchiveIntent::Archive);
        assert_eq!(Value::Object(cmd.attributes), json!({"name": "NDA"}));
    }

    #[test]
    fn test_nested_payload() {
        let cmd = normalize_update(&json!({
            "template": {"name": "NDA", "folder_name": "HR", "archived": false}
        }))
        .unwrap();
        assert_eq!(cmd.folder_name.as_deref(), Some("HR"));
        assert_eq!(cmd.archive, ArchiveIntent::Restore);
        assert_eq!(Value::Object(cmd.attributes), json!({"name": "NDA"}));
    }

    #[test]
    fn test_top_level_folder_name_wins() {
        let cmd = normalize_update(&json!({
            "folder_name": "Top",
            "template": {"name": "x", "folder_name": "Nested"}
        }))
        .unwrap();
        assert_eq!(cmd.folder_name.as_deref(), Some("Top"));
    }

    #[test]
    fn test_null_top_level_folder_name_falls_back_to_nested() {
        let cmd = normalize_update(&json!({
            "folder_name": null,
            "template": {"name": "x", "folder_name": "Nested"}
        }))
        .unwrap();
        assert_eq!(cmd.folder_name.as_deref(), Some("Nested"));
    }

    #[test]
    fn test_empty_folder_name_is_kept() {
        let cmd = normalize_update(&json!({"folder_name": ""})).unwrap();
        assert_eq!(cmd.folder_name.as_deref(), Some(""));
    }

    #[test]
    fn test_top_level_archived_key_shadows_nested_even_when_not_boolean() {
        let cmd = normalize_update(&json!({
            "archived": "yes",
            "template": {"name": "x", "archived": true}
        }))
        .unwrap();
        assert_eq!(cmd.archive, ArchiveIntent::Unchanged);
    }

    #[test]
    fn test_missing_wrapper_is_an_error() {
        let err = normalize_update(&json!({"template": {}, "folder_name": "A"})).unwrap_err();
        assert_eq!(err, PayloadError::MissingWrapper("template"));
    }

    #[test]
    fn test_non_object_body() {
        assert_eq!(
            normalize_update(&json!([{"name": "x"}])).unwrap_err(),
            PayloadError::NotAnObject
        );
    }

    #[test]
    fn test_no_recognized_keys() {
        let cmd = normalize_update(&json!({"unknown": 1})).unwrap();
        assert!(cmd.folder_name.is_none());
        assert_eq!(cmd.archive, ArchiveIntent::Unchanged);
        assert!(cmd.attributes.is_empty());
    }
}
