//! Member type repository
//!
//! Member types are reference data, so the contract is read-only.

use async_trait::async_trait;
use sqlx::PgPool;

use super::error::RepositoryResult;
use super::utils::MEMBER_TYPE_COLUMNS;
use crate::models::{MemberType, MemberTypeId};

/// Read-only storage operations for member types
#[async_trait]
pub trait MemberTypeRepository: Send + Sync {
    async fn find_by_id(&self, id: MemberTypeId) -> RepositoryResult<Option<MemberType>>;

    /// Find member types; `None` lists all of them
    async fn find_many(&self, ids: Option<Vec<MemberTypeId>>) -> RepositoryResult<Vec<MemberType>>;
}

/// PostgreSQL-backed member type repository
#[derive(Clone)]
pub struct PgMemberTypeRepository {
    pool: PgPool,
}

impl PgMemberTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberTypeRepository for PgMemberTypeRepository {
    async fn find_by_id(&self, id: MemberTypeId) -> RepositoryResult<Option<MemberType>> {
        let sql = format!(
            "SELECT {} FROM member_types WHERE id = $1",
            MEMBER_TYPE_COLUMNS
        );
        let member_type = sqlx::query_as::<_, MemberType>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member_type)
    }

    async fn find_many(&self, ids: Option<Vec<MemberTypeId>>) -> RepositoryResult<Vec<MemberType>> {
        let sql = format!(
            "SELECT {} FROM member_types WHERE ($1::member_type_id[] IS NULL OR id = ANY($1)) ORDER BY id",
            MEMBER_TYPE_COLUMNS
        );
        let member_types = sqlx::query_as::<_, MemberType>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(member_types)
    }
}
