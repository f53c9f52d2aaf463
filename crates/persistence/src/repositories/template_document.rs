//! Repository for template document lookups.

use sqlx::PgPool;

use crate::entities::TemplateDocumentEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct TemplateDocumentRepository {
    pool: PgPool,
}

impl TemplateDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Documents of the given templates, in attachment order per template.
    pub async fn find_by_template_ids(
        &self,
        template_ids: &[i64],
    ) -> Result<Vec<TemplateDocumentEntity>, sqlx::Error> {
        if template_ids.is_empty() {
            return Ok(Vec::new());
        }
        let timer = QueryTimer::new("find_template_documents");
        let result = sqlx::query_as::<_, TemplateDocumentEntity>(
            r#"
            SELECT id, template_id, uuid, filename, blob_key, position
            FROM template_documents
            WHERE template_id = ANY($1)
            ORDER BY template_id, position, id
            "#,
        )
        .bind(template_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
