//! Template folder entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the template_folders table.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateFolderEntity {
    pub id: i64,
    pub account_id: i64,
    pub author_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
