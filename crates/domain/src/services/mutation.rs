//! Update planning for a single template.
//!
//! A [`TemplateChangeset`] captures every write of one update (folder
//! assignment, archive toggle, whitelisted attributes) so the store can
//! commit them as one unit. Planning checks the attribute data against the
//! store's invariants up front; a changeset that exists is committable.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use shared::validation::{validate_name, validate_no_nul};

use super::update_request::{ArchiveIntent, UpdateTemplateCommand};
use super::{InvalidAttributes, Violation};
use crate::models::field::Field;
use crate::models::folder::FolderTarget;

/// Validated template attributes, still in their whitelisted JSON shape.
/// `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateAttributes {
    pub name: Option<String>,
    pub schema: Option<Vec<Value>>,
    pub submitters: Option<Vec<Value>>,
    pub fields: Option<Vec<Value>>,
}

impl TemplateAttributes {
    /// Validates whitelisted attributes against what the store accepts.
    pub fn from_permitted(permitted: &Map<String, Value>) -> Result<Self, InvalidAttributes> {
        let mut violations = Vec::new();

        let name = permitted.get("name").map(|value| match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        });
        if let Some(name) = &name {
            if let Err(e) = validate_name(name) {
                violations.push(violation("name", &e));
            }
        }

        let schema = list(permitted, "schema", &mut violations);
        let submitters = list(permitted, "submitters", &mut violations);
        let fields = list(permitted, "fields", &mut violations);

        if let Some(fields) = &fields {
            for (i, item) in fields.iter().enumerate() {
                check_field(item, &format!("fields[{}]", i), &mut violations);
            }
        }

        if violations.is_empty() {
            Ok(Self {
                name,
                schema,
                submitters,
                fields,
            })
        } else {
            Err(InvalidAttributes { violations })
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.schema.is_none() && self.submitters.is_none() && self.fields.is_none()
    }
}

/// Takes a whitelisted list as-is, flagging any string the store cannot hold.
fn list(permitted: &Map<String, Value>, key: &str, violations: &mut Vec<Violation>) -> Option<Vec<Value>> {
    let items = permitted.get(key)?.as_array()?;
    for (i, item) in items.iter().enumerate() {
        reject_nul(item, &format!("{}[{}]", key, i), violations);
    }
    Some(items.clone())
}

fn check_field(item: &Value, path: &str, violations: &mut Vec<Violation>) {
    let field = match serde_json::from_value::<Field>(item.clone()) {
        Ok(field) => field,
        Err(e) => {
            violations.push(Violation {
                path: path.to_string(),
                message: e.to_string(),
            });
            return;
        }
    };
    if let Err(errors) = field.validate() {
        collect(path, &errors, violations);
    }
    for (j, area) in field.areas.iter().enumerate() {
        if let Err(errors) = area.validate() {
            collect(&format!("{}.areas[{}]", path, j), &errors, violations);
        }
    }
}

fn reject_nul(value: &Value, path: &str, violations: &mut Vec<Violation>) {
    match value {
        Value::String(s) => {
            if let Err(e) = validate_no_nul(s) {
                violations.push(violation(path, &e));
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                reject_nul(item, &format!("{}[{}]", path, i), violations);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                let nested = format!("{}.{}", path, key);
                if let Err(e) = validate_no_nul(key) {
                    violations.push(violation(&nested, &e));
                }
                reject_nul(item, &nested, violations);
            }
        }
        _ => {}
    }
}

fn violation(path: &str, error: &validator::ValidationError) -> Violation {
    Violation {
        path: path.to_string(),
        message: error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| error.code.to_string()),
    }
}

fn collect(prefix: &str, errors: &ValidationErrors, violations: &mut Vec<Violation>) {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    for (field, errs) in fields {
        for e in errs.iter() {
            violations.push(violation(&format!("{}.{}", prefix, field), e));
        }
    }
}

/// Every write of one template update.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateChangeset {
    pub folder: Option<FolderTarget>,
    /// `None` leaves `archived_at` untouched; `Some(None)` clears it.
    pub archived_at: Option<Option<DateTime<Utc>>>,
    pub attributes: TemplateAttributes,
    pub updated_at: DateTime<Utc>,
}

/// Plans an update at wall-clock time `now`.
pub fn plan_update(
    command: UpdateTemplateCommand,
    now: DateTime<Utc>,
) -> Result<TemplateChangeset, InvalidAttributes> {
    let folder = command.folder_name.as_deref().map(FolderTarget::from_name);
    if let Some(target) = &folder {
        if let Err(e) = validate_name(target.name()) {
            return Err(InvalidAttributes {
                violations: vec![violation("folder_name", &e)],
            });
        }
    }

    let archived_at = match command.archive {
        ArchiveIntent::Archive => Some(Some(now)),
        ArchiveIntent::Restore => Some(None),
        ArchiveIntent::Unchanged => None,
    };

    let attributes = TemplateAttributes::from_permitted(&command.attributes)?;

    Ok(TemplateChangeset {
        folder,
        archived_at,
        attributes,
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::update_request::normalize_update;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn plan(payload: Value, now: DateTime<Utc>) -> Result<TemplateChangeset, InvalidAttributes> {
        plan_update(normalize_update(&payload).unwrap(), now)
    }

    fn paths(err: &InvalidAttributes) -> Vec<&str> {
        err.violations.iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn test_whitelisted_payload_persists_recognized_keys() {
        let changeset = plan(
            json!({
                "name": "X",
                "not_a_real_field": "Y",
                "fields": [{"uuid": "u1", "type": "text", "evil_key": 1}]
            }),
            at(10),
        )
        .unwrap();

        let attributes = &changeset.attributes;
        assert_eq!(attributes.name.as_deref(), Some("X"));
        assert_eq!(attributes.fields, Some(vec![json!({"uuid": "u1", "type": "text"})]));
        assert!(attributes.schema.is_none());
        assert_eq!(changeset.updated_at, at(10));
    }

    #[test]
    fn test_archive_true_restamps_every_time() {
        let first = plan(json!({"archived": true}), at(10)).unwrap();
        assert_eq!(first.archived_at, Some(Some(at(10))));

        let second = plan(json!({"archived": true}), at(20)).unwrap();
        assert_eq!(second.archived_at, Some(Some(at(20))));
    }

    #[test]
    fn test_archive_false_always_clears() {
        let changeset = plan(json!({"archived": false}), at(5)).unwrap();
        assert_eq!(changeset.archived_at, Some(None));
    }

    #[test]
    fn test_non_boolean_archived_leaves_state() {
        let changeset = plan(json!({"archived": "false"}), at(9)).unwrap();
        assert!(changeset.archived_at.is_none());
        assert_eq!(changeset.updated_at, at(9));
    }

    #[test]
    fn test_absent_keys_keep_stored_values() {
        let changeset = plan(json!({"name": "Renamed"}), at(3)).unwrap();
        assert_eq!(changeset.attributes.name.as_deref(), Some("Renamed"));
        assert!(changeset.attributes.fields.is_none());
        assert!(changeset.attributes.submitters.is_none());
        assert!(changeset.folder.is_none());
    }

    #[test]
    fn test_folder_target_resolution() {
        let changeset = plan(json!({"folder_name": "Contracts"}), at(0)).unwrap();
        assert_eq!(changeset.folder, Some(FolderTarget::Named("Contracts".into())));

        let changeset = plan(json!({"template": {"name": "n", "folder_name": ""}}), at(0)).unwrap();
        assert_eq!(changeset.folder, Some(FolderTarget::Default));

        let changeset = plan(json!({"name": "n"}), at(0)).unwrap();
        assert!(changeset.folder.is_none());
    }

    #[test]
    fn test_overlong_folder_name_rejected() {
        let err = plan(json!({"folder_name": "f".repeat(300)}), at(0)).unwrap_err();
        assert_eq!(err.violations[0].path, "folder_name");
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = plan(json!({"name": "   "}), at(0)).unwrap_err();
        assert_eq!(err.violations[0].path, "name");

        let err = plan(json!({"name": null}), at(0)).unwrap_err();
        assert_eq!(err.violations[0].message, "can't be blank");
    }

    #[test]
    fn test_numeric_name_is_stringified() {
        let changeset = plan(json!({"name": 2024}), at(0)).unwrap();
        assert_eq!(changeset.attributes.name.as_deref(), Some("2024"));
    }

    #[test]
    fn test_loosely_typed_slots_are_kept_verbatim() {
        let payload = json!({
            "submitters": [{"name": "Signer", "uuid": 7}],
            "fields": [{
                "uuid": "f1",
                "type": "checkbox",
                "name": 5,
                "required": "true",
                "areas": [{"w": 0.1, "h": 0.05}]
            }]
        });
        let changeset = plan(payload.clone(), at(0)).unwrap();
        assert_eq!(changeset.attributes.submitters.as_ref(), payload["submitters"].as_array());
        assert_eq!(changeset.attributes.fields.as_ref(), payload["fields"].as_array());
    }

    #[test]
    fn test_unknown_field_type_rejected_with_path() {
        let err = plan(
            json!({"fields": [{"uuid": "a", "type": "text"}, {"uuid": "b", "type": "laser"}]}),
            at(0),
        )
        .unwrap_err();
        assert_eq!(paths(&err), vec!["fields[1].type"]);
        assert_eq!(err.violations[0].message, "is not included in the list");
    }

    #[test]
    fn test_invalid_area_rejected_with_path() {
        let err = plan(
            json!({"fields": [{"uuid": "a", "type": "text", "areas": [
                {"x": 0, "y": 0, "w": 0.2, "h": 0.1, "page": 0},
                {"x": 0, "y": 0, "w": -0.2, "h": 0.1, "page": 0}
            ]}]}),
            at(0),
        )
        .unwrap_err();
        assert_eq!(paths(&err), vec!["fields[0].areas[1].w"]);
    }

    #[test]
    fn test_nul_characters_rejected_with_path() {
        let err = plan(json!({"name": "Lease\u{0}"}), at(0)).unwrap_err();
        assert_eq!(paths(&err), vec!["name"]);
        assert_eq!(err.violations[0].message, "contains a null character");

        let err = plan(
            json!({
                "schema": [{"attachment_uuid": "a1", "name": "doc\u{0}"}],
                "fields": [{"uuid": "f1", "type": "text", "default_value": "x\u{0}",
                            "preferences": {"format\u{0}": "DD/MM/YYYY"}}]
            }),
            at(0),
        )
        .unwrap_err();
        assert_eq!(
            paths(&err),
            vec![
                "schema[0].name",
                "fields[0].default_value",
                "fields[0].preferences.format\u{0}",
            ]
        );
    }

    #[test]
    fn test_nul_in_folder_name_rejected() {
        let err = plan(json!({"folder_name": "Deals\u{0}"}), at(0)).unwrap_err();
        assert_eq!(paths(&err), vec!["folder_name"]);
    }

    #[test]
    fn test_violations_abort_whole_plan() {
        let result = plan(
            json!({"name": "Fine", "folder_name": "Fine", "archived": true,
                   "fields": [{"uuid": "", "type": "text"}]}),
            at(0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_attributes_is_empty() {
        assert!(TemplateAttributes::default().is_empty());
        let changeset = plan(json!({"archived": true}), at(0)).unwrap();
        assert!(changeset.attributes.is_empty());
    }
}
