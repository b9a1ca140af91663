//! Subscription repository
//!
//! Manages the follow edges stored in the subscribers_on_authors join table.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryResult};
use super::utils::SUBSCRIPTION_COLUMNS;
use crate::models::{Subscription, SubscriptionFilter};

/// Storage operations for subscription edges
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_many(&self, filter: SubscriptionFilter) -> RepositoryResult<Vec<Subscription>>;

    /// Record that `subscriber_id` follows `author_id`
    async fn create(&self, subscriber_id: Uuid, author_id: Uuid) -> RepositoryResult<Subscription>;

    /// Remove the edge; fails with `NotFound` if it does not exist
    async fn delete(&self, subscriber_id: Uuid, author_id: Uuid) -> RepositoryResult<Subscription>;
}

fn edge_id(subscriber_id: Uuid, author_id: Uuid) -> String {
    format!("{} -> {}", subscriber_id, author_id)
}

/// PostgreSQL-backed subscription repository
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn find_many(&self, filter: SubscriptionFilter) -> RepositoryResult<Vec<Subscription>> {
        let sql = format!(
            r#"SELECT {} FROM subscribers_on_authors
            WHERE ($1::uuid[] IS NULL OR subscriber_id = ANY($1))
              AND ($2::uuid[] IS NULL OR author_id = ANY($2))"#,
            SUBSCRIPTION_COLUMNS
        );
        let edges = sqlx::query_as::<_, Subscription>(&sql)
            .bind(filter.subscriber_ids)
            .bind(filter.author_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(edges)
    }

    async fn create(&self, subscriber_id: Uuid, author_id: Uuid) -> RepositoryResult<Subscription> {
        let sql = format!(
            "INSERT INTO subscribers_on_authors (subscriber_id, author_id) VALUES ($1, $2) RETURNING {}",
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query_as::<_, Subscription>(&sql)
            .bind(subscriber_id)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write("subscription", e))
    }

    async fn delete(&self, subscriber_id: Uuid, author_id: Uuid) -> RepositoryResult<Subscription> {
        let sql = format!(
            "DELETE FROM subscribers_on_authors WHERE subscriber_id = $1 AND author_id = $2 RETURNING {}",
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query_as::<_, Subscription>(&sql)
            .bind(subscriber_id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write("subscription", e))?
            .ok_or_else(|| {
                RepositoryError::not_found("subscription", edge_id(subscriber_id, author_id))
            })
    }
}
