//! Subscription edges between users
//!
//! A subscription means `subscriber_id` follows `author_id`. Pairs are unique.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Row from the subscribers_on_authors join table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRow, Serialize)]
pub struct Subscription {
    pub subscriber_id: Uuid,
    pub author_id: Uuid,
}

/// Filter for listing subscription edges
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    pub subscriber_ids: Option<Vec<Uuid>>,
    pub author_ids: Option<Vec<Uuid>>,
}

impl SubscriptionFilter {
    pub fn by_subscribers(ids: &[Uuid]) -> Self {
        Self {
            subscriber_ids: Some(ids.to_vec()),
            ..Self::default()
        }
    }

    pub fn by_authors(ids: &[Uuid]) -> Self {
        Self {
            author_ids: Some(ids.to_vec()),
            ..Self::default()
        }
    }

    pub fn matches(&self, edge: &Subscription) -> bool {
        self.subscriber_ids
            .as_ref()
            .map_or(true, |ids| ids.contains(&edge.subscriber_id))
            && self
                .author_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&edge.author_id))
    }
}

/// Which edge directions a user listing should fetch inline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionInclude {
    /// Edges where the listed user is the subscriber (`userSubscribedTo`)
    pub subscribed_to: bool,
    /// Edges where the listed user is the author (`subscribedToUser`)
    pub subscribers: bool,
}

impl SubscriptionInclude {
    pub fn any(&self) -> bool {
        self.subscribed_to || self.subscribers
    }
}
