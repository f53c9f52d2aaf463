//! Template document entity (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the template_documents table.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateDocumentEntity {
    pub id: i64,
    pub template_id: i64,
    pub uuid: Uuid,
    pub filename: String,
    pub blob_key: String,
    pub position: i32,
}

impl From<TemplateDocumentEntity> for domain::models::TemplateDocument {
    fn from(entity: TemplateDocumentEntity) -> Self {
        Self {
            id: entity.id,
            uuid: entity.uuid,
            filename: entity.filename,
            blob_key: entity.blob_key,
        }
    }
}
