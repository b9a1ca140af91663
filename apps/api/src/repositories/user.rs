//! User repository
//!
//! Defines the storage contract for users and its PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryResult};
use super::utils::{preview_keys, SUBSCRIPTION_COLUMNS, USER_COLUMNS};
use crate::models::{
    ChangeUser, CreateUser, Subscription, SubscriptionInclude, User, UserFilter, UserListing,
};

/// Storage operations for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id; `None` when absent
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    /// Find every user matching the filter, in storage order
    async fn find_many(&self, filter: UserFilter) -> RepositoryResult<Vec<User>>;

    /// List all users, fetching the requested subscription edges in the same call
    async fn list_with_subscriptions(
        &self,
        include: SubscriptionInclude,
    ) -> RepositoryResult<UserListing>;

    async fn create(&self, input: CreateUser) -> RepositoryResult<User>;

    /// Apply a partial update; fails with `NotFound` when the id is unknown
    async fn update(&self, id: Uuid, input: ChangeUser) -> RepositoryResult<User>;

    /// Delete a user and everything it owns; fails with `NotFound` when the id is unknown
    async fn delete(&self, id: Uuid) -> RepositoryResult<User>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_many(&self, filter: UserFilter) -> RepositoryResult<Vec<User>> {
        if let Some(ids) = &filter.ids {
            tracing::debug!(ids = %preview_keys(ids), "Fetching users by id");
        }
        let sql = format!(
            "SELECT {} FROM users WHERE ($1::uuid[] IS NULL OR id = ANY($1)) ORDER BY name, id",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(filter.ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn list_with_subscriptions(
        &self,
        include: SubscriptionInclude,
    ) -> RepositoryResult<UserListing> {
        let users = self.find_many(UserFilter::default()).await?;

        // Every edge connects two listed users, so one unfiltered read covers
        // both directions.
        let subscriptions = if include.any() {
            let sql = format!(
                "SELECT {} FROM subscribers_on_authors",
                SUBSCRIPTION_COLUMNS
            );
            sqlx::query_as::<_, Subscription>(&sql)
                .fetch_all(&self.pool)
                .await?
        } else {
            Vec::new()
        };

        Ok(UserListing {
            users,
            subscriptions,
        })
    }

    async fn create(&self, input: CreateUser) -> RepositoryResult<User> {
        let sql = format!(
            "INSERT INTO users (name, balance) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(input.name)
            .bind(input.balance)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write("user", e))
    }

    async fn update(&self, id: Uuid, input: ChangeUser) -> RepositoryResult<User> {
        let sql = format!(
            r#"UPDATE users
            SET name = COALESCE($2, name),
                balance = COALESCE($3, balance)
            WHERE id = $1
            RETURNING {}"#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(input.name)
            .bind(input.balance)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write("user", e))?
            .ok_or_else(|| RepositoryError::not_found("user", id))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<User> {
        // Profiles, posts and subscription edges go with it (ON DELETE CASCADE)
        let sql = format!("DELETE FROM users WHERE id = $1 RETURNING {}", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write("user", e))?
            .ok_or_else(|| RepositoryError::not_found("user", id))
    }
}
