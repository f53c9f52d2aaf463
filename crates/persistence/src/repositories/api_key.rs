//! Repository for API key database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::ApiKeyEntity;
use crate::metrics::QueryTimer;

/// Repository for API key operations.
#[derive(Clone)]
pub struct ApiKeyRepository {
    pool: PgPool,
}

impl ApiKeyRepository {
    /// Creates a new API key repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds an API key by its hash, together with the user it belongs to.
    ///
    /// Returns `None` if no key with the given hash exists.
    pub async fn find_by_key_hash(
        &self,
        key_hash: &str,
    ) -> Result<Option<ApiKeyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_api_key_by_hash");
        let result = sqlx::query_as::<_, ApiKeyEntity>(
            r#"
            SELECT k.id, k.user_id, u.account_id, u.email, k.key_prefix, k.is_active,
                   k.last_used_at, k.created_at, k.expires_at
            FROM api_keys k
            JOIN users u ON u.id = k.user_id
            WHERE k.key_hash = $1
            "#,
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Updates the last_used_at timestamp for an API key.
    pub async fn update_last_used(&self, key_id: i64) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_api_key_last_used");
        let result = sqlx::query("UPDATE api_keys SET last_used_at = NOW() WHERE id = $1")
            .bind(key_id)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|_| ())
    }

    /// Checks if an API key is active and not expired at `at`.
    pub fn is_key_valid_at(key: &ApiKeyEntity, at: DateTime<Utc>) -> bool {
        key.is_active && key.expires_at.map_or(true, |expires_at| expires_at >= at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_test_key(is_active: bool, expires_at: Option<DateTime<Utc>>) -> ApiKeyEntity {
        ApiKeyEntity {
            id: 1,
            user_id: 10,
            account_id: 100,
            email: "owner@example.com".to_string(),
            key_prefix: "aBcDeF".to_string(),
            is_active,
            last_used_at: None,
            created_at: Utc::now(),
            expires_at,
        }
    }

    #[test]
    fn test_active_key_without_expiry_is_valid() {
        let key = make_test_key(true, None);
        assert!(ApiKeyRepository::is_key_valid_at(&key, Utc::now()));
    }

    #[test]
    fn test_expiry_is_checked_against_given_time() {
        let now = Utc::now();
        let key = make_test_key(true, Some(now + Duration::days(30)));
        assert!(ApiKeyRepository::is_key_valid_at(&key, now));
        assert!(!ApiKeyRepository::is_key_valid_at(&key, now + Duration::days(31)));
    }

    #[test]
    fn test_inactive_key_is_invalid() {
        let key = make_test_key(false, Some(Utc::now() + Duration::days(30)));
        assert!(!ApiKeyRepository::is_key_valid_at(&key, Utc::now()));
    }
}
