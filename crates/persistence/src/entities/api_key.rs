//! API key entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// An api_keys row joined with the user it authenticates.
#[derive(Debug, Clone, FromRow)]
pub struct ApiKeyEntity {
    pub id: i64,
    pub user_id: i64,
    pub account_id: i64,
    pub email: String,
    pub key_prefix: String,
    pub is_active: bool,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}
