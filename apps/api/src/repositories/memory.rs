//! In-memory repository
//!
//! Implements every repository trait over a process-local store. It enforces
//! the same constraints as the PostgreSQL schema (unique profile per user,
//! unique subscription pairs, foreign keys, cascading user deletes) and keeps
//! a journal of every call so tests can count round trips.
//!
//! # Lock Poisoning Recovery
//!
//! Locks are acquired with `unwrap_or_else(|e| e.into_inner())` so one
//! panicking test does not poison the store for the rest of the suite.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryResult};
use super::{
    MemberTypeRepository, PostRepository, ProfileRepository, SubscriptionRepository,
    UserRepository,
};
use crate::models::{
    ChangePost, ChangeProfile, ChangeUser, CreatePost, CreateProfile, CreateUser, MemberType,
    MemberTypeId, Post, PostFilter, Profile, ProfileFilter, Subscription, SubscriptionFilter,
    SubscriptionInclude, User, UserFilter, UserListing,
};

/// One recorded repository call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCall {
    /// Repository name, e.g. `"users"`
    pub repository: &'static str,
    /// Operation name, e.g. `"find_many"`
    pub operation: &'static str,
    /// Keys the call was made with, rendered as strings
    pub keys: Vec<String>,
}

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    posts: Vec<Post>,
    profiles: Vec<Profile>,
    member_types: Vec<MemberType>,
    subscriptions: Vec<Subscription>,
}

impl MemoryState {
    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn require_user(&self, entity: &'static str, id: Uuid) -> RepositoryResult<()> {
        if self.user_exists(id) {
            Ok(())
        } else {
            Err(RepositoryError::InvalidReference {
                entity,
                reason: format!("user {} does not exist", id),
            })
        }
    }
}

/// Seeded in-process store implementing every repository trait
#[derive(Clone)]
pub struct MemoryRepository {
    state: Arc<RwLock<MemoryState>>,
    journal: Arc<Mutex<Vec<RepositoryCall>>>,
    failures: Arc<Mutex<HashSet<(&'static str, &'static str)>>>,
}

impl MemoryRepository {
    /// Create a store seeded with the member type reference rows
    pub fn new() -> Self {
        let state = MemoryState {
            member_types: MemberType::seed(),
            ..MemoryState::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
            journal: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Every call recorded since creation or the last [`clear_calls`](Self::clear_calls)
    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.journal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Recorded calls for one repository operation
    pub fn calls_to(&self, repository: &str, operation: &str) -> Vec<RepositoryCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.repository == repository && c.operation == operation)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.journal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Make every later call to the operation fail with `Unavailable`
    pub fn fail(&self, repository: &'static str, operation: &'static str) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((repository, operation));
    }

    /// Undo a previous [`fail`](Self::fail)
    pub fn recover(&self, repository: &'static str, operation: &'static str) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&(repository, operation));
    }

    fn record(
        &self,
        repository: &'static str,
        operation: &'static str,
        keys: Vec<String>,
    ) -> RepositoryResult<()> {
        self.journal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RepositoryCall {
                repository,
                operation,
                keys,
            });

        let failing = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&(repository, operation));
        if failing {
            return Err(RepositoryError::Unavailable(format!(
                "{}.{} failed (injected)",
                repository, operation
            )));
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn render<K: ToString>(keys: &Option<Vec<K>>) -> Vec<String> {
    keys.as_ref()
        .map(|keys| keys.iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        self.record("users", "find_by_id", vec![id.to_string()])?;
        Ok(self.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_many(&self, filter: UserFilter) -> RepositoryResult<Vec<User>> {
        self.record("users", "find_many", render(&filter.ids))?;
        Ok(self
            .read()
            .users
            .iter()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect())
    }

    async fn list_with_subscriptions(
        &self,
        include: SubscriptionInclude,
    ) -> RepositoryResult<UserListing> {
        self.record("users", "list_with_subscriptions", Vec::new())?;
        let state = self.read();
        Ok(UserListing {
            users: state.users.clone(),
            subscriptions: if include.any() {
                state.subscriptions.clone()
            } else {
                Vec::new()
            },
        })
    }

    async fn create(&self, input: CreateUser) -> RepositoryResult<User> {
        self.record("users", "create", Vec::new())?;
        let user = User {
            id: Uuid::new_v4(),
            name: input.name,
            balance: input.balance,
        };
        self.write().users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, input: ChangeUser) -> RepositoryResult<User> {
        self.record("users", "update", vec![id.to_string()])?;
        let mut state = self.write();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| RepositoryError::not_found("user", id))?;
        if let Some(name) = input.name {
            user.name = name;
        }
        if let Some(balance) = input.balance {
            user.balance = balance;
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<User> {
        self.record("users", "delete", vec![id.to_string()])?;
        let mut state = self.write();
        let index = state
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| RepositoryError::not_found("user", id))?;
        let user = state.users.remove(index);

        state.profiles.retain(|p| p.user_id != id);
        state.posts.retain(|p| p.author_id != id);
        state
            .subscriptions
            .retain(|s| s.subscriber_id != id && s.author_id != id);

        Ok(user)
    }
}

#[async_trait]
impl PostRepository for MemoryRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Post>> {
        self.record("posts", "find_by_id", vec![id.to_string()])?;
        Ok(self.read().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_many(&self, filter: PostFilter) -> RepositoryResult<Vec<Post>> {
        let mut keys = render(&filter.ids);
        keys.extend(render(&filter.author_ids));
        self.record("posts", "find_many", keys)?;
        Ok(self
            .read()
            .posts
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn create(&self, input: CreatePost) -> RepositoryResult<Post> {
        self.record("posts", "create", Vec::new())?;
        let mut state = self.write();
        state.require_user("post", input.author_id)?;
        let post = Post {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            author_id: input.author_id,
        };
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: Uuid, input: ChangePost) -> RepositoryResult<Post> {
        self.record("posts", "update", vec![id.to_string()])?;
        let mut state = self.write();
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RepositoryError::not_found("post", id))?;
        if let Some(title) = input.title {
            post.title = title;
        }
        if let Some(content) = input.content {
            post.content = content;
        }
        Ok(post.clone())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Post> {
        self.record("posts", "delete", vec![id.to_string()])?;
        let mut state = self.write();
        let index = state
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| RepositoryError::not_found("post", id))?;
        Ok(state.posts.remove(index))
    }
}

#[async_trait]
impl ProfileRepository for MemoryRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Profile>> {
        self.record("profiles", "find_by_id", vec![id.to_string()])?;
        Ok(self.read().profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_many(&self, filter: ProfileFilter) -> RepositoryResult<Vec<Profile>> {
        let mut keys = render(&filter.ids);
        keys.extend(render(&filter.user_ids));
        keys.extend(render(&filter.member_type_ids));
        self.record("profiles", "find_many", keys)?;
        Ok(self
            .read()
            .profiles
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn create(&self, input: CreateProfile) -> RepositoryResult<Profile> {
        self.record("profiles", "create", Vec::new())?;
        let mut state = self.write();
        state.require_user("profile", input.user_id)?;
        if state.profiles.iter().any(|p| p.user_id == input.user_id) {
            return Err(RepositoryError::Conflict {
                entity: "profile",
                reason: format!("user {} already has a profile", input.user_id),
            });
        }
        let profile = Profile {
            id: Uuid::new_v4(),
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            member_type_id: input.member_type_id,
            user_id: input.user_id,
        };
        state.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update(&self, id: Uuid, input: ChangeProfile) -> RepositoryResult<Profile> {
        self.record("profiles", "update", vec![id.to_string()])?;
        let mut state = self.write();
        let profile = state
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RepositoryError::not_found("profile", id))?;
        if let Some(is_male) = input.is_male {
            profile.is_male = is_male;
        }
        if let Some(year_of_birth) = input.year_of_birth {
            profile.year_of_birth = year_of_birth;
        }
        if let Some(member_type_id) = input.member_type_id {
            profile.member_type_id = member_type_id;
        }
        Ok(profile.clone())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Profile> {
        self.record("profiles", "delete", vec![id.to_string()])?;
        let mut state = self.write();
        let index = state
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| RepositoryError::not_found("profile", id))?;
        Ok(state.profiles.remove(index))
    }
}

#[async_trait]
impl MemberTypeRepository for MemoryRepository {
    async fn find_by_id(&self, id: MemberTypeId) -> RepositoryResult<Option<MemberType>> {
        self.record("member_types", "find_by_id", vec![id.to_string()])?;
        Ok(self.read().member_types.iter().find(|m| m.id == id).cloned())
    }

    async fn find_many(&self, ids: Option<Vec<MemberTypeId>>) -> RepositoryResult<Vec<MemberType>> {
        self.record("member_types", "find_many", render(&ids))?;
        Ok(self
            .read()
            .member_types
            .iter()
            .filter(|m| ids.as_ref().map_or(true, |ids| ids.contains(&m.id)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryRepository {
    async fn find_many(&self, filter: SubscriptionFilter) -> RepositoryResult<Vec<Subscription>> {
        let mut keys = render(&filter.subscriber_ids);
        keys.extend(render(&filter.author_ids));
        self.record("subscriptions", "find_many", keys)?;
        Ok(self
            .read()
            .subscriptions
            .iter()
            .filter(|s| filter.matches(s))
            .copied()
            .collect())
    }

    async fn create(&self, subscriber_id: Uuid, author_id: Uuid) -> RepositoryResult<Subscription> {
        self.record("subscriptions", "create", vec![
            subscriber_id.to_string(),
            author_id.to_string(),
        ])?;
        let mut state = self.write();
        state.require_user("subscription", subscriber_id)?;
        state.require_user("subscription", author_id)?;

        let edge = Subscription {
            subscriber_id,
            author_id,
        };
        if state.subscriptions.contains(&edge) {
            return Err(RepositoryError::Conflict {
                entity: "subscription",
                reason: format!("{} already follows {}", subscriber_id, author_id),
            });
        }
        state.subscriptions.push(edge);
        Ok(edge)
    }

    async fn delete(&self, subscriber_id: Uuid, author_id: Uuid) -> RepositoryResult<Subscription> {
        self.record("subscriptions", "delete", vec![
            subscriber_id.to_string(),
            author_id.to_string(),
        ])?;
        let edge = Subscription {
            subscriber_id,
            author_id,
        };
        let mut state = self.write();
        let index = state
            .subscriptions
            .iter()
            .position(|s| *s == edge)
            .ok_or_else(|| {
                RepositoryError::not_found(
                    "subscription",
                    format!("{} -> {}", subscriber_id, author_id),
                )
            })?;
        Ok(state.subscriptions.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::Repositories;
    use assert_matches::assert_matches;

    async fn user(repos: &Repositories, name: &str) -> User {
        repos
            .users
            .create(CreateUser {
                name: name.to_string(),
                balance: 10.0,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_seeded_member_types() {
        let repos = Repositories::in_memory(MemoryRepository::new());
        let all = repos.member_types.find_many(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_one_profile_per_user() {
        let repos = Repositories::in_memory(MemoryRepository::new());
        let owner = user(&repos, "owner").await;
        let input = CreateProfile {
            is_male: true,
            year_of_birth: 1990,
            member_type_id: MemberTypeId::Basic,
            user_id: owner.id,
        };

        repos.profiles.create(input.clone()).await.unwrap();
        let second = repos.profiles.create(input).await;
        assert_matches!(second, Err(RepositoryError::Conflict { entity: "profile", .. }));
    }

    #[tokio::test]
    async fn test_post_requires_existing_author() {
        let repos = Repositories::in_memory(MemoryRepository::new());
        let result = repos
            .posts
            .create(CreatePost {
                title: "t".to_string(),
                content: "c".to_string(),
                author_id: Uuid::new_v4(),
            })
            .await;
        assert_matches!(result, Err(RepositoryError::InvalidReference { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_subscription_conflicts() {
        let repos = Repositories::in_memory(MemoryRepository::new());
        let a = user(&repos, "a").await;
        let b = user(&repos, "b").await;

        repos.subscriptions.create(a.id, b.id).await.unwrap();
        let again = repos.subscriptions.create(a.id, b.id).await;
        assert_matches!(again, Err(RepositoryError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_user_delete_cascades() {
        let repos = Repositories::in_memory(MemoryRepository::new());
        let a = user(&repos, "a").await;
        let b = user(&repos, "b").await;
        repos.subscriptions.create(a.id, b.id).await.unwrap();
        repos.subscriptions.create(b.id, a.id).await.unwrap();
        repos
            .posts
            .create(CreatePost {
                title: "t".to_string(),
                content: "c".to_string(),
                author_id: a.id,
            })
            .await
            .unwrap();

        repos.users.delete(a.id).await.unwrap();

        let edges = repos
            .subscriptions
            .find_many(SubscriptionFilter::default())
            .await
            .unwrap();
        assert!(edges.is_empty());
        let posts = repos.posts.find_many(PostFilter::default()).await.unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let repos = Repositories::in_memory(MemoryRepository::new());
        let result = repos.users.delete(Uuid::new_v4()).await;
        assert_matches!(result, Err(RepositoryError::NotFound { entity: "user", .. }));
    }

    #[tokio::test]
    async fn test_journal_and_failure_injection() {
        let store = MemoryRepository::new();
        let repos = Repositories::in_memory(store.clone());

        repos.users.find_many(UserFilter::default()).await.unwrap();
        assert_eq!(store.calls_to("users", "find_many").len(), 1);

        store.fail("users", "find_many");
        let failed = repos.users.find_many(UserFilter::default()).await;
        assert_matches!(failed, Err(RepositoryError::Unavailable(_)));

        store.recover("users", "find_many");
        store.clear_calls();
        repos.users.find_many(UserFilter::default()).await.unwrap();
        assert_eq!(store.calls().len(), 1);
    }
}
