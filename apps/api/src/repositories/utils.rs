//! Shared SQL fragments for the PostgreSQL repositories
//!
//! Column lists are kept in one place so `SELECT` and `RETURNING` clauses
//! stay in step with the `FromRow` models.

/// SQL columns for user queries
pub const USER_COLUMNS: &str = "id, name, balance";

/// SQL columns for post queries
pub const POST_COLUMNS: &str = "id, title, content, author_id";

/// SQL columns for profile queries
pub const PROFILE_COLUMNS: &str = "id, is_male, year_of_birth, member_type_id, user_id";

/// SQL columns for member type queries
pub const MEMBER_TYPE_COLUMNS: &str = "id, discount, posts_limit_per_month";

/// SQL columns for subscription edges
pub const SUBSCRIPTION_COLUMNS: &str = "subscriber_id, author_id";

/// Render keys for log lines without dumping huge batches
pub fn preview_keys<K: std::fmt::Display>(keys: &[K]) -> String {
    const MAX_SHOWN: usize = 5;
    let shown: Vec<String> = keys.iter().take(MAX_SHOWN).map(|k| k.to_string()).collect();
    if keys.len() > MAX_SHOWN {
        format!("[{}, ... +{}]", shown.join(", "), keys.len() - MAX_SHOWN)
    } else {
        format!("[{}]", shown.join(", "))
    }
}
