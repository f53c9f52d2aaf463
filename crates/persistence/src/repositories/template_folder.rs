//! Repository for template folders.

use sqlx::PgConnection;

use crate::entities::TemplateFolderEntity;
use crate::metrics::QueryTimer;

/// Folder writes only happen inside a template update's transaction.
pub struct TemplateFolderRepository;

impl TemplateFolderRepository {
    /// Returns the account's folder with this name, creating it if needed.
    ///
    /// Backed by the `(account_id, name)` unique constraint, so concurrent
    /// callers always converge on one row.
    pub async fn upsert_in(
        conn: &mut PgConnection,
        account_id: i64,
        author_id: i64,
        name: &str,
    ) -> Result<TemplateFolderEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_template_folder");
        let result = sqlx::query_as::<_, TemplateFolderEntity>(
            r#"
            INSERT INTO template_folders (account_id, author_id, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (account_id, name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, account_id, author_id, name, created_at, updated_at
            "#,
        )
        .bind(account_id)
        .bind(author_id)
        .bind(name)
        .fetch_one(conn)
        .await;
        timer.record();
        result
    }
}
