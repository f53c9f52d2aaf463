//! Template entity (database row mapping).

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

use domain::models::Template;

/// Database row mapping for the templates table, joined with its folder name.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateEntity {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub account_id: i64,
    pub author_id: i64,
    pub folder_id: Option<i64>,
    pub folder_name: Option<String>,
    pub external_id: Option<String>,
    /// Decoded without a record shape so any stored element reads back.
    pub schema: Json<Vec<Value>>,
    pub submitters: Json<Vec<Value>>,
    pub fields: Json<Vec<Value>>,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns selected for [`TemplateEntity`]; expects `templates t` and a
/// `LEFT JOIN template_folders f`.
pub const TEMPLATE_COLUMNS: &str = "t.id, t.slug, t.name, t.account_id, t.author_id, \
     t.folder_id, f.name AS folder_name, t.external_id, t.schema, t.submitters, t.fields, \
     t.archived_at, t.created_at, t.updated_at";

/// Author and documents are attached separately.
impl From<TemplateEntity> for Template {
    fn from(entity: TemplateEntity) -> Self {
        Self {
            id: entity.id,
            slug: entity.slug,
            name: entity.name,
            account_id: entity.account_id,
            author_id: entity.author_id,
            folder_id: entity.folder_id,
            folder_name: entity.folder_name,
            external_id: entity.external_id,
            schema: entity.schema.0,
            submitters: entity.submitters.0,
            fields: entity.fields.0,
            archived_at: entity.archived_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            author: None,
            documents: Vec::new(),
        }
    }
}

/// Row returned by a committed update.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct TemplateStampEntity {
    pub id: i64,
    pub updated_at: DateTime<Utc>,
}

/// Row returned by an archive or a permanent delete.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct TemplateArchivalEntity {
    pub id: i64,
    pub archived_at: Option<DateTime<Utc>>,
}
