//! Repository for template database operations.
//!
//! Every query is scoped to one account. List filters are rendered from the
//! same [`Predicate`]s the domain layer evaluates in memory.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use domain::models::{Template, TemplateAuthor, TemplateDocument};
use domain::services::filter::like_pattern;
use domain::services::{Predicate, TemplateChangeset, TemplateFilter};
use shared::pagination::PageParams;

use super::template_document::TemplateDocumentRepository;
use super::template_folder::TemplateFolderRepository;
use super::user::UserRepository;
use crate::entities::template::TEMPLATE_COLUMNS;
use crate::entities::{TemplateArchivalEntity, TemplateEntity, TemplateStampEntity};
use crate::metrics::QueryTimer;

/// Repository for template operations.
#[derive(Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists one page of the account's templates matching `filter`,
    /// ordered by id descending.
    pub async fn list(
        &self,
        account_id: i64,
        filter: &TemplateFilter,
        page: PageParams,
    ) -> Result<Vec<Template>, sqlx::Error> {
        let mut qb = select_in_account(account_id);
        push_filter(&mut qb, filter);
        push_page(&mut qb, page);

        let timer = QueryTimer::new("list_templates");
        let result = qb
            .build_query_as::<TemplateEntity>()
            .fetch_all(&self.pool)
            .await;
        timer.record();

        self.hydrate(result?).await
    }

    /// Finds a template by id within an account, archived or not.
    pub async fn find_in_account(
        &self,
        account_id: i64,
        id: i64,
    ) -> Result<Option<Template>, sqlx::Error> {
        let mut qb = select_in_account(account_id);
        qb.push(" AND t.id = ").push_bind(id);

        let timer = QueryTimer::new("find_template_in_account");
        let result = qb
            .build_query_as::<TemplateEntity>()
            .fetch_optional(&self.pool)
            .await;
        timer.record();

        match result? {
            Some(entity) => Ok(self.hydrate(vec![entity]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn exists_in_account(&self, account_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("template_exists_in_account");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM templates WHERE id = $1 AND account_id = $2)",
        )
        .bind(id)
        .bind(account_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Commits a changeset in one transaction.
    ///
    /// Folder resolve-or-create, archive toggle and attribute writes either
    /// all land or none do. Returns `None` when the template is not in the
    /// account.
    pub async fn apply_update(
        &self,
        account_id: i64,
        author_id: i64,
        id: i64,
        changeset: &TemplateChangeset,
    ) -> Result<Option<TemplateStampEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_template");
        let mut tx = self.pool.begin().await?;

        let folder_id = match &changeset.folder {
            Some(target) => Some(
                TemplateFolderRepository::upsert_in(&mut *tx, account_id, author_id, target.name())
                    .await?
                    .id,
            ),
            None => None,
        };

        let attributes = &changeset.attributes;
        let stamp = sqlx::query_as::<_, TemplateStampEntity>(
            r#"
            UPDATE templates SET
                folder_id = CASE WHEN $3 THEN $4 ELSE folder_id END,
                archived_at = CASE WHEN $5 THEN $6 ELSE archived_at END,
                name = COALESCE($7, name),
                schema = COALESCE($8, schema),
                submitters = COALESCE($9, submitters),
                fields = COALESCE($10, fields),
                updated_at = $11
            WHERE id = $1 AND account_id = $2
            RETURNING id, updated_at
            "#,
        )
        .bind(id)
        .bind(account_id)
        .bind(folder_id.is_some())
        .bind(folder_id)
        .bind(changeset.archived_at.is_some())
        .bind(changeset.archived_at.flatten())
        .bind(attributes.name.as_deref())
        .bind(attributes.schema.as_ref().map(Json))
        .bind(attributes.submitters.as_ref().map(Json))
        .bind(attributes.fields.as_ref().map(Json))
        .bind(changeset.updated_at)
        .fetch_optional(&mut *tx)
        .await?;

        if stamp.is_some() {
            tx.commit().await?;
        } else {
            debug!(template_id = id, account_id, "template not in account, update rolled back");
        }
        timer.record();
        Ok(stamp)
    }

    /// Stamps `archived_at`, whether or not the template was already archived.
    pub async fn archive(
        &self,
        account_id: i64,
        id: i64,
        archived_at: DateTime<Utc>,
    ) -> Result<Option<TemplateArchivalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("archive_template");
        let result = sqlx::query_as::<_, TemplateArchivalEntity>(
            r#"
            UPDATE templates
            SET archived_at = $3, updated_at = $3
            WHERE id = $1 AND account_id = $2
            RETURNING id, archived_at
            "#,
        )
        .bind(id)
        .bind(account_id)
        .bind(archived_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Removes a template and its documents. Returns the removed row's
    /// `archived_at`.
    pub async fn delete(
        &self,
        account_id: i64,
        id: i64,
    ) -> Result<Option<TemplateArchivalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("delete_template");
        let result = sqlx::query_as::<_, TemplateArchivalEntity>(
            r#"
            DELETE FROM templates
            WHERE id = $1 AND account_id = $2
            RETURNING id, archived_at
            "#,
        )
        .bind(id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Attaches authors and documents, keeping the input order.
    async fn hydrate(&self, entities: Vec<TemplateEntity>) -> Result<Vec<Template>, sqlx::Error> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let template_ids: Vec<i64> = entities.iter().map(|e| e.id).collect();
        let mut author_ids: Vec<i64> = entities.iter().map(|e| e.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<i64, TemplateAuthor> = UserRepository::new(self.pool.clone())
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.into()))
            .collect();

        let mut documents: HashMap<i64, Vec<TemplateDocument>> = HashMap::new();
        for doc in TemplateDocumentRepository::new(self.pool.clone())
            .find_by_template_ids(&template_ids)
            .await?
        {
            documents.entry(doc.template_id).or_default().push(doc.into());
        }

        Ok(entities
            .into_iter()
            .map(|entity| {
                let author = authors.get(&entity.author_id).cloned();
                let docs = documents.remove(&entity.id).unwrap_or_default();
                let mut template: Template = entity.into();
                template.author = author;
                template.documents = docs;
                template
            })
            .collect())
    }
}

fn select_in_account<'args>(account_id: i64) -> QueryBuilder<'args, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM templates t LEFT JOIN template_folders f ON f.id = t.folder_id WHERE t.account_id = ",
        TEMPLATE_COLUMNS
    ));
    qb.push_bind(account_id);
    qb
}

/// Appends one `AND` clause per filter predicate.
pub fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &TemplateFilter) {
    for predicate in filter.predicates() {
        match predicate {
            Predicate::Search(term) => {
                let pattern = like_pattern(term);
                qb.push(" AND (t.name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR f.name ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
            Predicate::Archived => {
                qb.push(" AND t.archived_at IS NOT NULL");
            }
            Predicate::Active => {
                qb.push(" AND t.archived_at IS NULL");
            }
            Predicate::ExternalId(id) => {
                qb.push(" AND t.external_id = ").push_bind(id.to_string());
            }
            Predicate::FolderName(name) => {
                qb.push(" AND f.name = ").push_bind(name.to_string());
            }
        }
    }
}

/// Appends the page boundaries, ordering and limit.
pub fn push_page(qb: &mut QueryBuilder<'_, Postgres>, page: PageParams) {
    if let Some(after) = page.after {
        qb.push(" AND t.id < ").push_bind(after);
    }
    if let Some(before) = page.before {
        qb.push(" AND t.id > ").push_bind(before);
    }
    qb.push(" ORDER BY t.id DESC LIMIT ")
        .push_bind(page.effective_limit());
}
