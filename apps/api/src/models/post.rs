//! Post model for Rookery

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Post record from the posts table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Post {
    /// Unique post identifier
    pub id: Uuid,

    /// Post title
    pub title: String,

    /// Post body
    pub content: String,

    /// User who wrote the post
    pub author_id: Uuid,
}

/// Input for creating a post
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

/// Partial update for a post; the author cannot be changed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangePost {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Filter for listing posts
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub ids: Option<Vec<Uuid>>,
    pub author_ids: Option<Vec<Uuid>>,
}

impl PostFilter {
    pub fn by_ids(ids: &[Uuid]) -> Self {
        Self {
            ids: Some(ids.to_vec()),
            ..Self::default()
        }
    }

    pub fn by_authors(author_ids: &[Uuid]) -> Self {
        Self {
            author_ids: Some(author_ids.to_vec()),
            ..Self::default()
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.ids.as_ref().map_or(true, |ids| ids.contains(&post.id))
            && self
                .author_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&post.author_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_filter_combines_conditions() {
        let post = Post {
            id: Uuid::new_v4(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            author_id: Uuid::new_v4(),
        };

        let filter = PostFilter {
            ids: Some(vec![post.id]),
            author_ids: Some(vec![Uuid::new_v4()]),
        };
        assert!(!filter.matches(&post));
        assert!(PostFilter::by_authors(&[post.author_id]).matches(&post));
    }
}
