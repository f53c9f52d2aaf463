//! Template resource handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use domain::models::{
    DeleteTemplateQuery, DestroyTemplateResponse, ListTemplatesQuery, ListTemplatesResponse,
    TemplateResponse, UpdateTemplateResponse,
};
use domain::services::{
    normalize_update, plan_update, project_page, project_template, Deletion, DeletionPolicy,
    TemplateFilter, TenancyMode,
};
use persistence::repositories::TemplateRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::{record_template_mutation, TemplateMutation};

/// Non-numeric ids can never match a template.
fn template_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::template_not_found())
}

/// Tenancy is read from configuration on every request.
fn deletion_policy(state: &AppState) -> DeletionPolicy {
    DeletionPolicy::new(TenancyMode::from_multitenant(
        state.config.deployment.multitenant,
    ))
}

/// GET /api/templates
pub async fn list_templates(
    State(state): State<AppState>,
    user: CurrentUser,
    query: Result<Query<ListTemplatesQuery>, QueryRejection>,
) -> Result<Json<ListTemplatesResponse>, ApiError> {
    let Query(query) = query?;
    let filter = TemplateFilter::from_query(&query);
    let page = query.page_params();

    debug!(
        account_id = user.account_id,
        predicates = ?filter.predicates(),
        limit = page.effective_limit(),
        after = ?page.after,
        before = ?page.before,
        "Listing templates"
    );

    let repo = TemplateRepository::new(state.pool.clone());
    let templates = repo.list(user.account_id, &filter, page).await?;

    Ok(Json(project_page(templates, &state.document_urls)))
}

/// GET /api/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    user: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let id = template_id(path)?;
    let repo = TemplateRepository::new(state.pool.clone());
    let template = repo
        .find_in_account(user.account_id, id)
        .await?
        .ok_or_else(ApiError::template_not_found)?;

    Ok(Json(project_template(template, &state.document_urls)))
}

/// PUT/PATCH /api/templates/:id
///
/// Accepts attributes flat or wrapped under `template`. Unknown keys are
/// dropped; folder assignment, archive toggle and attribute writes commit
/// together.
pub async fn update_template(
    State(state): State<AppState>,
    user: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateTemplateResponse>, ApiError> {
    let id = template_id(path)?;
    let repo = TemplateRepository::new(state.pool.clone());
    if !repo.exists_in_account(user.account_id, id).await? {
        return Err(ApiError::template_not_found());
    }

    let Json(payload) = payload?;
    let command = normalize_update(&payload)?;
    let changeset = plan_update(command, Utc::now())?;

    let stamp = repo
        .apply_update(user.account_id, user.user_id, id, &changeset)
        .await?
        .ok_or_else(ApiError::template_not_found)?;

    record_template_mutation(TemplateMutation::Update);
    info!(
        template_id = stamp.id,
        account_id = user.account_id,
        folder = ?changeset.folder.as_ref().map(|f| f.name()),
        archived = ?changeset.archived_at.map(|a| a.is_some()),
        "Template updated"
    );

    Ok(Json(UpdateTemplateResponse {
        id: stamp.id,
        updated_at: stamp.updated_at,
    }))
}

/// DELETE /api/templates/:id
///
/// Archives by default. `permanently=true` removes the template outright on
/// single-tenant deployments.
pub async fn delete_template(
    State(state): State<AppState>,
    user: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    Query(query): Query<DeleteTemplateQuery>,
) -> Result<Json<DestroyTemplateResponse>, ApiError> {
    let id = template_id(path)?;
    let repo = TemplateRepository::new(state.pool.clone());

    let deletion = deletion_policy(&state).decide(query.wants_permanent(), Utc::now());
    let row = match deletion {
        Deletion::Permanent => repo.delete(user.account_id, id).await?,
        Deletion::Archive { archived_at } => repo.archive(user.account_id, id, archived_at).await?,
    }
    .ok_or_else(ApiError::template_not_found)?;

    let mutation = match deletion {
        Deletion::Permanent => TemplateMutation::Destroy,
        Deletion::Archive { .. } => TemplateMutation::Archive,
    };
    record_template_mutation(mutation);
    info!(
        template_id = row.id,
        account_id = user.account_id,
        action = mutation.as_str(),
        "Template deleted"
    );

    Ok(Json(DestroyTemplateResponse {
        id: row.id,
        archived_at: row.archived_at,
    }))
}
