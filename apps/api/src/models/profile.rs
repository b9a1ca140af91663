//! Profile model for Rookery
//!
//! Each user owns at most one profile; `user_id` is unique.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::member_type::MemberTypeId;

/// Profile record from the profiles table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Profile {
    /// Unique profile identifier
    pub id: Uuid,

    pub is_male: bool,

    pub year_of_birth: i32,

    /// Membership tier
    pub member_type_id: MemberTypeId,

    /// Owning user
    pub user_id: Uuid,
}

/// Input for creating a profile
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfile {
    pub is_male: bool,
    pub year_of_birth: i32,
    pub member_type_id: MemberTypeId,
    pub user_id: Uuid,
}

/// Partial update for a profile; ownership cannot be transferred
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeProfile {
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
    pub member_type_id: Option<MemberTypeId>,
}

/// Filter for listing profiles
#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    pub ids: Option<Vec<Uuid>>,
    pub user_ids: Option<Vec<Uuid>>,
    pub member_type_ids: Option<Vec<MemberTypeId>>,
}

impl ProfileFilter {
    pub fn by_ids(ids: &[Uuid]) -> Self {
        Self {
            ids: Some(ids.to_vec()),
            ..Self::default()
        }
    }

    pub fn by_users(user_ids: &[Uuid]) -> Self {
        Self {
            user_ids: Some(user_ids.to_vec()),
            ..Self::default()
        }
    }

    pub fn by_member_types(member_type_ids: &[MemberTypeId]) -> Self {
        Self {
            member_type_ids: Some(member_type_ids.to_vec()),
            ..Self::default()
        }
    }

    pub fn matches(&self, profile: &Profile) -> bool {
        self.ids.as_ref().map_or(true, |ids| ids.contains(&profile.id))
            && self
                .user_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&profile.user_id))
            && self
                .member_type_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&profile.member_type_id))
    }
}
