//! Template field models.
//!
//! Stored and submitted field records are carried as JSON. The structs here
//! are the typed view the update path checks them through: every slot is
//! optional and keeps whatever JSON the client sent, and `validate` enforces
//! only what the store requires.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use shared::validation::{validate_dimension, validate_not_blank, validate_page_index};

/// Input kinds a field can take.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Heading,
    Text,
    Signature,
    Initials,
    Date,
    Number,
    Image,
    Checkbox,
    Multiple,
    File,
    Radio,
    Select,
    Cells,
    Stamp,
    Payment,
    Phone,
    Verification,
}

impl FieldType {
    pub const ALL: [FieldType; 17] = [
        FieldType::Heading,
        FieldType::Text,
        FieldType::Signature,
        FieldType::Initials,
        FieldType::Date,
        FieldType::Number,
        FieldType::Image,
        FieldType::Checkbox,
        FieldType::Multiple,
        FieldType::File,
        FieldType::Radio,
        FieldType::Select,
        FieldType::Cells,
        FieldType::Stamp,
        FieldType::Payment,
        FieldType::Phone,
        FieldType::Verification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Heading => "heading",
            FieldType::Text => "text",
            FieldType::Signature => "signature",
            FieldType::Initials => "initials",
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Image => "image",
            FieldType::Checkbox => "checkbox",
            FieldType::Multiple => "multiple",
            FieldType::File => "file",
            FieldType::Radio => "radio",
            FieldType::Select => "select",
            FieldType::Cells => "cells",
            FieldType::Stamp => "stamp",
            FieldType::Payment => "payment",
            FieldType::Phone => "phone",
            FieldType::Verification => "verification",
        }
    }

    /// Exact, case-sensitive lookup by wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Placement of a field on a document page.
///
/// Coordinates are relative to the page size. Absent or null slots are not
/// checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldArea {
    #[serde(default)]
    pub w: Value,
    #[serde(default)]
    pub h: Value,
    #[serde(default)]
    pub cell_w: Value,
    #[serde(default)]
    pub page: Value,
}

impl Validate for FieldArea {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (key, value) in [("w", &self.w), ("h", &self.h), ("cell_w", &self.cell_w)] {
            let checked = numeric(value).and_then(|n| n.map_or(Ok(()), validate_dimension));
            if let Err(e) = checked {
                errors.add(key, e);
            }
        }
        if let Err(e) = numeric(&self.page).and_then(|n| n.map_or(Ok(()), validate_page)) {
            errors.add("page", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A single data-entry element of a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub uuid: Value,
    #[serde(default, rename = "type")]
    pub field_type: Value,
    #[serde(default)]
    pub areas: Vec<FieldArea>,
}

impl Field {
    /// The field's kind, when it names one of the known kinds.
    pub fn kind(&self) -> Option<FieldType> {
        self.field_type.as_str().and_then(FieldType::parse)
    }
}

impl Validate for Field {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_not_blank(&scalar_text(&self.uuid)) {
            errors.add("uuid", e);
        }
        if let Err(e) = validate_field_type(self) {
            errors.add("type", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_field_type(field: &Field) -> Result<(), ValidationError> {
    if field.kind().is_some() {
        return Ok(());
    }
    validate_not_blank(&scalar_text(&field.field_type))?;
    let mut err = ValidationError::new("inclusion");
    err.message = Some("is not included in the list".into());
    Err(err)
}

fn validate_page(page: f64) -> Result<(), ValidationError> {
    if page.fract() != 0.0 {
        let mut err = ValidationError::new("not_an_integer");
        err.message = Some("must be an integer".into());
        return Err(err);
    }
    validate_page_index(page as i64)
}

/// Renders a scalar the way it is stored as text. Null is empty.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads a numeric slot. Numbers and numeric strings count; null is absent.
fn numeric(value: &Value) -> Result<Option<f64>, ValidationError> {
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) => Ok(Some(n)),
        None => {
            let mut err = ValidationError::new("not_a_number");
            err.message = Some("is not a number".into());
            Err(err)
        }
    }
}
