//! Template domain model and its request/response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use shared::pagination::{parse_limit, PageParams, Pagination};

/// A reusable document definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub account_id: i64,
    pub author_id: i64,
    pub folder_id: Option<i64>,
    /// Name of the assigned folder, joined at load time.
    pub folder_name: Option<String>,
    pub external_id: Option<String>,
    /// Stored JSON records, carried as-is.
    pub schema: Vec<Value>,
    pub submitters: Vec<Value>,
    pub fields: Vec<Value>,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Option<TemplateAuthor>,
    pub documents: Vec<TemplateDocument>,
}

impl Template {
    /// A template is active iff it has no archival timestamp.
    pub fn is_active(&self) -> bool {
        self.archived_at.is_none()
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Client-facing integration key. Mirrors `external_id`.
    pub fn application_key(&self) -> Option<&str> {
        self.external_id.as_deref()
    }
}

/// The user who authored a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateAuthor {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A file attached to a template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDocument {
    pub id: i64,
    pub uuid: Uuid,
    pub filename: String,
    pub blob_key: String,
}

/// Query parameters for listing templates.
///
/// Pagination fields are kept flat; flattened numeric fields do not survive
/// query-string decoding. `limit` stays text so any value reads as a size.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTemplatesQuery {
    pub q: Option<String>,
    pub archived: Option<String>,
    pub application_key: Option<String>,
    pub external_id: Option<String>,
    pub folder: Option<String>,
    pub limit: Option<String>,
    pub after: Option<i64>,
    pub before: Option<i64>,
}

impl ListTemplatesQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            limit: self.limit.as_deref().map(parse_limit),
            after: self.after,
            before: self.before,
        }
    }

    /// Whether archived templates were requested.
    ///
    /// Any value other than `false`/`0` counts as a request.
    pub fn wants_archived(&self) -> bool {
        match self.archived.as_deref() {
            None => false,
            Some(v) => {
                let v = v.trim();
                !(v.eq_ignore_ascii_case("false") || v == "0")
            }
        }
    }
}

/// Query parameters for deleting a template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteTemplateQuery {
    pub permanently: Option<String>,
}

impl DeleteTemplateQuery {
    /// Only the literal string `true` signals permanent deletion.
    pub fn wants_permanent(&self) -> bool {
        self.permanently.as_deref() == Some("true")
    }
}

/// Author projection in template responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorResponse {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<TemplateAuthor> for AuthorResponse {
    fn from(a: TemplateAuthor) -> Self {
        Self {
            id: a.id,
            email: a.email,
            first_name: a.first_name,
            last_name: a.last_name,
        }
    }
}

/// Document projection in template responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentResponse {
    pub id: i64,
    pub uuid: Uuid,
    pub url: String,
    pub preview_image_url: String,
    pub filename: String,
}

/// Full template representation returned by list and show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateResponse {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub schema: Vec<Value>,
    pub fields: Vec<Value>,
    pub submitters: Vec<Value>,
    pub author_id: i64,
    pub folder_id: Option<i64>,
    pub folder_name: Option<String>,
    pub external_id: Option<String>,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub application_key: Option<String>,
    pub author: Option<AuthorResponse>,
    pub documents: Vec<DocumentResponse>,
}

/// Response for listing templates.
#[derive(Debug, Clone, Serialize)]
pub struct ListTemplatesResponse {
    pub data: Vec<TemplateResponse>,
    pub pagination: Pagination,
}

/// Minimal confirmation returned after an update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateTemplateResponse {
    pub id: i64,
    pub updated_at: DateTime<Utc>,
}

/// Confirmation returned after a deletion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestroyTemplateResponse {
    pub id: i64,
    pub archived_at: Option<DateTime<Utc>>,
}
