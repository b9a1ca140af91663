//! DataLoader implementations for GraphQL
//!
//! Each loader turns the point lookups one request makes for an entity or
//! relationship into a single batched repository call. Loaders are built
//! fresh for every request (see [`Loaders::new`]) so nothing cached for one
//! caller is ever visible to another.
//!
//! There are two types of loaders:
//! - Single-entity loaders: Return `Option<T>` for a single entity by key
//! - Collection loaders: Return `Vec<T>` for related entities by parent key,
//!   with an empty list for parents that have no rows

mod member_type;
mod post;
mod posts_by_author;
mod profile;
mod profile_by_user;
mod profiles_by_member_type;
mod subscriptions;
mod user;

pub use member_type::MemberTypeLoader;
pub use post::PostLoader;
pub use posts_by_author::PostsByAuthorLoader;
pub use profile::ProfileLoader;
pub use profile_by_user::ProfileByUserLoader;
pub use profiles_by_member_type::ProfilesByMemberTypeLoader;
pub use subscriptions::{SubscribedToLoader, SubscribersLoader};
pub use user::UserLoader;

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_graphql::dataloader::{DataLoader, HashMapCache, Loader};
use futures_util::future::{join_all, BoxFuture, FutureExt, Shared};
use uuid::Uuid;

use crate::models::{MemberType, MemberTypeId, Post, Profile, Subscription, User};
use crate::repositories::Repositories;

/// Batching knobs shared by every loader of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// How long a loader waits for more keys before dispatching
    pub delay: Duration,
    /// Upper bound on keys per repository call
    pub max_batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1),
            max_batch_size: 1000,
        }
    }
}

type SharedLoad<V, E> = Shared<BoxFuture<'static, Result<Option<V>, E>>>;

/// Per-request loader with a memoizing cache
///
/// `DataLoader` only answers from its cache once a batch has completed. A key
/// asked for while its batch is still running is joined onto that running
/// load here, so each key reaches the repository at most once per request.
pub struct CachedLoader<K, T>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    T: Loader<K>,
{
    inner: Arc<DataLoader<T, HashMapCache>>,
    in_flight: Mutex<HashMap<K, SharedLoad<T::Value, T::Error>>>,
}

impl<K, T> CachedLoader<K, T>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    T: Loader<K>,
    T::Error: Sync,
{
    fn new(loader: T, config: &LoaderConfig) -> Self {
        let inner = DataLoader::with_cache(loader, tokio::spawn, HashMapCache::default())
            .delay(config.delay)
            .max_batch_size(config.max_batch_size);
        Self {
            inner: Arc::new(inner),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<K, SharedLoad<T::Value, T::Error>>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Load one key, sharing any load of the same key already in progress
    pub async fn load_one(&self, key: K) -> Result<Option<T::Value>, T::Error> {
        let load = {
            let mut in_flight = self.lock_in_flight();
            if let Some(running) = in_flight.get(&key).cloned() {
                running
            } else {
                let inner = self.inner.clone();
                let owned = key.clone();
                let load = async move { inner.load_one(owned).await }
                    .boxed()
                    .shared();
                in_flight.insert(key.clone(), load.clone());
                load
            }
        };

        let result = load.clone().await;
        self.settle(&key, &load);
        result
    }

    /// Load several keys as one batch; absent keys are left out of the map
    pub async fn load_many(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<HashMap<K, T::Value>, T::Error> {
        let keys: Vec<K> = keys.into_iter().collect();
        let results = join_all(keys.iter().cloned().map(|key| self.load_one(key))).await;

        let mut found = HashMap::with_capacity(keys.len());
        for (key, result) in keys.into_iter().zip(results) {
            if let Some(value) = result? {
                found.insert(key, value);
            }
        }
        Ok(found)
    }

    /// Seed the cache with values fetched some other way
    pub async fn feed_many(&self, values: impl IntoIterator<Item = (K, T::Value)>) {
        self.inner.feed_many(values).await;
    }

    // Completed values live in the DataLoader cache from here on
    fn settle(&self, key: &K, load: &SharedLoad<T::Value, T::Error>) {
        let mut in_flight = self.lock_in_flight();
        if in_flight.get(key).is_some_and(|current| current.ptr_eq(load)) {
            in_flight.remove(key);
        }
    }
}

/// Index rows by the field that matches the requested key
///
/// Rows whose match field was not requested are dropped, so a repository
/// that over-fetches cannot leak values onto the wrong key.
pub(crate) fn match_one<K, V>(keys: &[K], rows: Vec<V>, field: impl Fn(&V) -> K) -> HashMap<K, V>
where
    K: Eq + Hash + Clone,
{
    let wanted: HashSet<&K> = keys.iter().collect();
    let mut result = HashMap::with_capacity(keys.len());
    for row in rows {
        let key = field(&row);
        if wanted.contains(&key) {
            result.entry(key).or_insert(row);
        }
    }
    result
}

/// Group rows under the key their match field points at
///
/// Every requested key gets an entry, empty when it has no rows.
pub(crate) fn match_many<K, V>(
    keys: &[K],
    rows: Vec<V>,
    field: impl Fn(&V) -> K,
) -> HashMap<K, Vec<V>>
where
    K: Eq + Hash + Clone,
{
    let mut result: HashMap<K, Vec<V>> =
        keys.iter().cloned().map(|key| (key, Vec::new())).collect();
    for row in rows {
        if let Some(group) = result.get_mut(&field(&row)) {
            group.push(row);
        }
    }
    result
}

/// The loader set of one request
#[derive(Clone)]
pub struct Loaders {
    pub user: Arc<CachedLoader<Uuid, UserLoader>>,
    pub post: Arc<CachedLoader<Uuid, PostLoader>>,
    pub posts_by_author: Arc<CachedLoader<Uuid, PostsByAuthorLoader>>,
    pub profile: Arc<CachedLoader<Uuid, ProfileLoader>>,
    pub profile_by_user: Arc<CachedLoader<Uuid, ProfileByUserLoader>>,
    pub profiles_by_member_type: Arc<CachedLoader<MemberTypeId, ProfilesByMemberTypeLoader>>,
    pub member_type: Arc<CachedLoader<MemberTypeId, MemberTypeLoader>>,
    pub subscribed_to: Arc<CachedLoader<Uuid, SubscribedToLoader>>,
    pub subscribers: Arc<CachedLoader<Uuid, SubscribersLoader>>,
}

impl Loaders {
    /// Create a fresh loader set with empty caches
    pub fn new(repos: &Repositories, config: &LoaderConfig) -> Self {
        Self {
            user: Arc::new(CachedLoader::new(UserLoader::new(repos.users.clone()), config)),
            post: Arc::new(CachedLoader::new(PostLoader::new(repos.posts.clone()), config)),
            posts_by_author: Arc::new(CachedLoader::new(
                PostsByAuthorLoader::new(repos.posts.clone()),
                config,
            )),
            profile: Arc::new(CachedLoader::new(
                ProfileLoader::new(repos.profiles.clone()),
                config,
            )),
            profile_by_user: Arc::new(CachedLoader::new(
                ProfileByUserLoader::new(repos.profiles.clone()),
                config,
            )),
            profiles_by_member_type: Arc::new(CachedLoader::new(
                ProfilesByMemberTypeLoader::new(repos.profiles.clone()),
                config,
            )),
            member_type: Arc::new(CachedLoader::new(
                MemberTypeLoader::new(repos.member_types.clone()),
                config,
            )),
            subscribed_to: Arc::new(CachedLoader::new(
                SubscribedToLoader::new(repos.subscriptions.clone()),
                config,
            )),
            subscribers: Arc::new(CachedLoader::new(
                SubscribersLoader::new(repos.subscriptions.clone()),
                config,
            )),
        }
    }

    /// Seed the user cache with rows a listing already fetched
    pub async fn prime_users(&self, users: &[User]) {
        self.user
            .feed_many(users.iter().map(|u| (u.id, u.clone())))
            .await;
    }

    pub async fn prime_posts(&self, posts: &[Post]) {
        self.post
            .feed_many(posts.iter().map(|p| (p.id, p.clone())))
            .await;
    }

    /// Seed both profile caches, by profile id and by owning user
    pub async fn prime_profiles(&self, profiles: &[Profile]) {
        self.profile
            .feed_many(profiles.iter().map(|p| (p.id, p.clone())))
            .await;
        self.profile_by_user
            .feed_many(profiles.iter().map(|p| (p.user_id, p.clone())))
            .await;
    }

    pub async fn prime_member_types(&self, member_types: &[MemberType]) {
        self.member_type
            .feed_many(member_types.iter().map(|m| (m.id, m.clone())))
            .await;
    }

    /// Seed the edge loaders for every listed user
    ///
    /// Users without edges are primed with an empty list so that asking for
    /// their relations later does not trigger a repository call.
    pub async fn prime_subscriptions(
        &self,
        user_ids: &[Uuid],
        edges: &[Subscription],
        subscribed_to: bool,
        subscribers: bool,
    ) {
        if subscribed_to {
            let grouped = match_many(user_ids, edges.to_vec(), |e| e.subscriber_id);
            self.subscribed_to
                .feed_many(grouped.into_iter().map(|(id, edges)| {
                    (id, edges.into_iter().map(|e| e.author_id).collect::<Vec<_>>())
                }))
                .await;
        }
        if subscribers {
            let grouped = match_many(user_ids, edges.to_vec(), |e| e.author_id);
            self.subscribers
                .feed_many(grouped.into_iter().map(|(id, edges)| {
                    (id, edges.into_iter().map(|e| e.subscriber_id).collect::<Vec<_>>())
                }))
                .await;
        }
    }
}
