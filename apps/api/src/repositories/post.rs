//! Post repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryResult};
use super::utils::POST_COLUMNS;
use crate::models::{ChangePost, CreatePost, Post, PostFilter};

/// Storage operations for posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Post>>;

    async fn find_many(&self, filter: PostFilter) -> RepositoryResult<Vec<Post>>;

    /// Create a post; the author must exist
    async fn create(&self, input: CreatePost) -> RepositoryResult<Post>;

    async fn update(&self, id: Uuid, input: ChangePost) -> RepositoryResult<Post>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<Post>;
}

/// PostgreSQL-backed post repository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Post>> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn find_many(&self, filter: PostFilter) -> RepositoryResult<Vec<Post>> {
        let sql = format!(
            r#"SELECT {} FROM posts
            WHERE ($1::uuid[] IS NULL OR id = ANY($1))
              AND ($2::uuid[] IS NULL OR author_id = ANY($2))
            ORDER BY title, id"#,
            POST_COLUMNS
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(filter.ids)
            .bind(filter.author_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn create(&self, input: CreatePost) -> RepositoryResult<Post> {
        let sql = format!(
            "INSERT INTO posts (title, content, author_id) VALUES ($1, $2, $3) RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(input.title)
            .bind(input.content)
            .bind(input.author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write("post", e))
    }

    async fn update(&self, id: Uuid, input: ChangePost) -> RepositoryResult<Post> {
        let sql = format!(
            r#"UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content)
            WHERE id = $1
            RETURNING {}"#,
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(input.title)
            .bind(input.content)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write("post", e))?
            .ok_or_else(|| RepositoryError::not_found("post", id))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Post> {
        let sql = format!("DELETE FROM posts WHERE id = $1 RETURNING {}", POST_COLUMNS);
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write("post", e))?
            .ok_or_else(|| RepositoryError::not_found("post", id))
    }
}
