//! User model for Rookery

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::subscription::Subscription;

/// User record from the users table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Account balance
    pub balance: f64,
}

/// Input for creating a user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub balance: f64,
}

/// Partial update for a user; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeUser {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

/// Filter for listing users
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Restrict to these ids
    pub ids: Option<Vec<Uuid>>,
}

impl UserFilter {
    pub fn by_ids(ids: &[Uuid]) -> Self {
        Self {
            ids: Some(ids.to_vec()),
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        self.ids.as_ref().map_or(true, |ids| ids.contains(&user.id))
    }
}

/// Users listed together with the subscription edges that were asked for
#[derive(Debug, Clone, Default)]
pub struct UserListing {
    pub users: Vec<User>,

    /// Empty unless at least one direction was included
    pub subscriptions: Vec<Subscription>,
}
