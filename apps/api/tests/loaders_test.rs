//! Integration tests for the per-request batch loaders
//!
//! Repository calls are counted through the in-memory store's journal.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use futures_util::future::join_all;
use rookery_api::graphql::{LoaderConfig, RequestContext};
use rookery_api::models::{
    ChangeUser, CreateUser, MemberTypeId, SubscriptionInclude, User, UserFilter, UserListing,
};
use rookery_api::repositories::{RepositoryError, RepositoryResult, UserRepository};
use uuid::Uuid;

use common::*;

#[tokio::test]
async fn test_concurrent_loads_share_one_batch() {
    let app = TestApp::new();
    let a = seed_user(&app.repos, "a").await;
    let b = seed_user(&app.repos, "b").await;
    let c = seed_user(&app.repos, "c").await;
    app.store.clear_calls();

    let ctx = app.context();
    let results = join_all([a.id, b.id, c.id].map(|id| ctx.loaders.user.load_one(id))).await;

    let names: Vec<String> = results
        .into_iter()
        .map(|r| r.unwrap().unwrap().name)
        .collect();
    assert_eq!(names, ["a", "b", "c"]);

    let calls = app.store.calls_to("users", "find_many");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].keys.len(), 3);
}

#[tokio::test]
async fn test_repeated_key_is_memoized() {
    let app = TestApp::new();
    let user = seed_user(&app.repos, "memo").await;
    app.store.clear_calls();

    let ctx = app.context();
    let first = ctx.loaders.user.load_one(user.id).await.unwrap();
    let second = ctx.loaders.user.load_one(user.id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(app.store.calls_to("users", "find_many").len(), 1);
}

#[tokio::test]
async fn test_primed_key_skips_repository() {
    let app = TestApp::new();
    let user = seed_user(&app.repos, "primed").await;
    app.store.clear_calls();

    let ctx = app.context();
    ctx.loaders.prime_users(std::slice::from_ref(&user)).await;
    let loaded = ctx.loaders.user.load_one(user.id).await.unwrap();

    assert_eq!(loaded, Some(user));
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn test_profile_by_user_matches_on_owner() {
    let app = TestApp::new();
    let owner = seed_user(&app.repos, "owner").await;
    let other = seed_user(&app.repos, "other").await;
    let profile = seed_profile(&app.repos, owner.id, MemberTypeId::Business).await;
    seed_profile(&app.repos, other.id, MemberTypeId::Basic).await;

    let ctx = app.context();
    let (by_owner, by_profile_id, missing) = tokio::join!(
        ctx.loaders.profile_by_user.load_one(owner.id),
        // A profile id is not a user id
        ctx.loaders.profile_by_user.load_one(profile.id),
        ctx.loaders.profile_by_user.load_one(Uuid::new_v4()),
    );

    assert_eq!(by_owner.unwrap(), Some(profile));
    assert_eq!(by_profile_id.unwrap(), None);
    assert_eq!(missing.unwrap(), None);
}

#[tokio::test]
async fn test_list_loader_returns_empty_for_keys_without_rows() {
    let app = TestApp::new();
    let author = seed_user(&app.repos, "author").await;
    let silent = seed_user(&app.repos, "silent").await;
    seed_post(&app.repos, author.id, "first").await;
    seed_post(&app.repos, author.id, "second").await;
    app.store.clear_calls();

    let ctx = app.context();
    let posts = ctx
        .loaders
        .posts_by_author
        .load_many([author.id, silent.id])
        .await
        .unwrap();

    assert_eq!(posts[&author.id].len(), 2);
    assert_eq!(posts[&silent.id], Vec::new());
    assert_eq!(app.store.calls_to("posts", "find_many").len(), 1);
}

#[tokio::test]
async fn test_member_type_loader_keys_by_enum() {
    let app = TestApp::new();
    let ctx = app.context();

    let business = ctx
        .loaders
        .member_type
        .load_one(MemberTypeId::Business)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(business.posts_limit_per_month, 100);
    let calls = app.store.calls_to("member_types", "find_many");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].keys, ["business"]);
}

#[tokio::test]
async fn test_contexts_do_not_share_caches() {
    let app = TestApp::new();
    let user = seed_user(&app.repos, "isolated").await;
    app.store.clear_calls();

    let first: RequestContext = app.context();
    let second: RequestContext = app.context();
    first.loaders.user.load_one(user.id).await.unwrap();
    second.loaders.user.load_one(user.id).await.unwrap();

    assert_eq!(app.store.calls_to("users", "find_many").len(), 2);
}

#[tokio::test]
async fn test_batch_failure_reaches_every_key_without_retry() {
    let app = TestApp::new();
    let a = seed_user(&app.repos, "a").await;
    let b = seed_user(&app.repos, "b").await;
    app.store.clear_calls();
    app.store.fail("users", "find_many");

    let ctx = app.context();
    let (ra, rb) = tokio::join!(
        ctx.loaders.user.load_one(a.id),
        ctx.loaders.user.load_one(b.id)
    );

    assert_matches!(ra, Err(RepositoryError::Unavailable(_)));
    assert_matches!(rb, Err(RepositoryError::Unavailable(_)));
    assert_eq!(app.store.calls_to("users", "find_many").len(), 1);
}

#[tokio::test]
async fn test_batches_are_split_by_max_batch_size() {
    let mut app = TestApp::new();
    app.loader_config = LoaderConfig {
        delay: Duration::from_millis(1),
        max_batch_size: 2,
    };
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(seed_user(&app.repos, &format!("u{}", i)).await.id);
    }
    app.store.clear_calls();

    let ctx = app.context();
    let loaded = join_all(ids.iter().map(|id| ctx.loaders.user.load_one(*id))).await;

    assert!(loaded.into_iter().all(|r| matches!(r, Ok(Some(_)))));
    let calls = app.store.calls_to("users", "find_many");
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.keys.len() <= 2));
}

#[tokio::test]
async fn test_subscription_loaders_group_edges() {
    let app = TestApp::new();
    let users = seed_follow_ring(&app.repos, 3).await;
    app.store.clear_calls();

    let ctx = app.context();
    let (following, followers) = tokio::join!(
        ctx.loaders.subscribed_to.load_one(users[0].id),
        ctx.loaders.subscribers.load_one(users[0].id),
    );

    assert_eq!(following.unwrap(), Some(vec![users[1].id]));
    assert_eq!(followers.unwrap(), Some(vec![users[2].id]));
    assert_eq!(app.store.calls_to("subscriptions", "find_many").len(), 2);
}

/// User repository whose batch reads take a while to answer
struct SlowUsers {
    inner: Arc<dyn UserRepository>,
    delay: Duration,
}

#[async_trait]
impl UserRepository for SlowUsers {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        self.inner.find_by_id(id).await
    }

    async fn find_many(&self, filter: UserFilter) -> RepositoryResult<Vec<User>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_many(filter).await
    }

    async fn list_with_subscriptions(
        &self,
        include: SubscriptionInclude,
    ) -> RepositoryResult<UserListing> {
        self.inner.list_with_subscriptions(include).await
    }

    async fn create(&self, input: CreateUser) -> RepositoryResult<User> {
        self.inner.create(input).await
    }

    async fn update(&self, id: Uuid, input: ChangeUser) -> RepositoryResult<User> {
        self.inner.update(id, input).await
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<User> {
        self.inner.delete(id).await
    }
}

fn slow_context(app: &TestApp) -> RequestContext {
    let mut repos = app.repos.clone();
    repos.users = Arc::new(SlowUsers {
        inner: app.repos.users.clone(),
        delay: Duration::from_millis(50),
    });
    RequestContext::new(repos, &app.loader_config)
}

#[tokio::test]
async fn test_key_requested_during_running_batch_joins_it() {
    let app = TestApp::new();
    let user = seed_user(&app.repos, "slow").await;
    app.store.clear_calls();

    let ctx = slow_context(&app);
    let loader = ctx.loaders.user.clone();
    let first = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load_one(user.id).await }
    });
    // The first batch is dispatched and waiting on storage by now
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = loader.load_one(user.id).await.unwrap();
    let first = first.await.unwrap().unwrap();

    assert_eq!(first, Some(user.clone()));
    assert_eq!(second, Some(user));
    assert_eq!(app.store.calls_to("users", "find_many").len(), 1);
}

#[tokio::test]
async fn test_load_many_only_fetches_keys_not_already_running() {
    let app = TestApp::new();
    let running = seed_user(&app.repos, "running").await;
    let fresh = seed_user(&app.repos, "fresh").await;
    app.store.clear_calls();

    let ctx = slow_context(&app);
    let loader = ctx.loaders.user.clone();
    let first = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load_one(running.id).await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    let both = loader.load_many([running.id, fresh.id]).await.unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(both.len(), 2);
    let calls = app.store.calls_to("users", "find_many");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].keys, [fresh.id.to_string()]);
}
