//! Profile repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryResult};
use super::utils::PROFILE_COLUMNS;
use crate::models::{ChangeProfile, CreateProfile, Profile, ProfileFilter};

/// Storage operations for profiles
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Profile>>;

    async fn find_many(&self, filter: ProfileFilter) -> RepositoryResult<Vec<Profile>>;

    /// Create a profile; fails with `Conflict` if the user already has one
    async fn create(&self, input: CreateProfile) -> RepositoryResult<Profile>;

    async fn update(&self, id: Uuid, input: ChangeProfile) -> RepositoryResult<Profile>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<Profile>;
}

/// PostgreSQL-backed profile repository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Profile>> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn find_many(&self, filter: ProfileFilter) -> RepositoryResult<Vec<Profile>> {
        let sql = format!(
            r#"SELECT {} FROM profiles
            WHERE ($1::uuid[] IS NULL OR id = ANY($1))
              AND ($2::uuid[] IS NULL OR user_id = ANY($2))
              AND ($3::member_type_id[] IS NULL OR member_type_id = ANY($3))
            ORDER BY year_of_birth, id"#,
            PROFILE_COLUMNS
        );
        let profiles = sqlx::query_as::<_, Profile>(&sql)
            .bind(filter.ids)
            .bind(filter.user_ids)
            .bind(filter.member_type_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    async fn create(&self, input: CreateProfile) -> RepositoryResult<Profile> {
        let sql = format!(
            r#"INSERT INTO profiles (is_male, year_of_birth, member_type_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}"#,
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(input.is_male)
            .bind(input.year_of_birth)
            .bind(input.member_type_id)
            .bind(input.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write("profile", e))
    }

    async fn update(&self, id: Uuid, input: ChangeProfile) -> RepositoryResult<Profile> {
        let sql = format!(
            r#"UPDATE profiles
            SET is_male = COALESCE($2, is_male),
                year_of_birth = COALESCE($3, year_of_birth),
                member_type_id = COALESCE($4, member_type_id)
            WHERE id = $1
            RETURNING {}"#,
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(input.is_male)
            .bind(input.year_of_birth)
            .bind(input.member_type_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write("profile", e))?
            .ok_or_else(|| RepositoryError::not_found("profile", id))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Profile> {
        let sql = format!(
            "DELETE FROM profiles WHERE id = $1 RETURNING {}",
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write("profile", e))?
            .ok_or_else(|| RepositoryError::not_found("profile", id))
    }
}

