//! Domain declarations and the registered, cache-backed domain.

use crate::error::DomainError;
use async_trait::async_trait;
use futures::FutureExt;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tessera_model::{ApplyOptions, ChangeSet, DomainOutput, DomainResult};
use tracing::{debug, error, trace};

/// Turns a change set into a domain's token updates and semantic output.
///
/// Appliers may suspend (remote lookups, slow generators); the engine bounds
/// each call with the configured deadline.
#[async_trait]
pub trait DomainApplier: Send + Sync + 'static {
    /// # Errors
    /// Any [`DomainError`]; the engine reports it for the source domain and
    /// records it as skipped for dependents.
    async fn apply(&self, changes: &ChangeSet) -> Result<DomainOutput, DomainError>;
}

/// Async closure-backed [`DomainApplier`]. The closure receives its own copy of the change set.
pub struct FnApplier<F> {
    f: F,
}

impl<F> Debug for FnApplier<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnApplier").finish_non_exhaustive()
    }
}

pub const fn applier_fn<F, Fut>(f: F) -> FnApplier<F>
where
    F: Fn(ChangeSet) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<DomainOutput, DomainError>> + Send + 'static,
{
    FnApplier { f }
}

#[async_trait]
impl<F, Fut> DomainApplier for FnApplier<F>
where
    F: Fn(ChangeSet) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<DomainOutput, DomainError>> + Send + 'static,
{
    async fn apply(&self, changes: &ChangeSet) -> Result<DomainOutput, DomainError> {
        (self.f)(changes.clone()).await
    }
}

/// Synchronous closure-backed [`DomainApplier`].
pub struct SyncApplier<F> {
    f: F,
}

impl<F> Debug for SyncApplier<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncApplier").finish_non_exhaustive()
    }
}

pub const fn sync_applier_fn<F>(f: F) -> SyncApplier<F>
where
    F: Fn(&ChangeSet) -> Result<DomainOutput, DomainError> + Send + Sync + 'static,
{
    SyncApplier { f }
}

#[async_trait]
impl<F> DomainApplier for SyncApplier<F>
where
    F: Fn(&ChangeSet) -> Result<DomainOutput, DomainError> + Send + Sync + 'static,
{
    async fn apply(&self, changes: &ChangeSet) -> Result<DomainOutput, DomainError> {
        (self.f)(changes)
    }
}

/// Registration payload. Every field but `dependencies` is required.
#[derive(Default, Clone)]
pub struct DomainConfig {
    pub name: String,
    pub version: String,
    /// Domains that must already be registered; changes flow from them to this one.
    pub dependencies: Vec<String>,
    /// Listing order only (lower first); propagation ignores it.
    pub priority: i32,
    /// Tokens this domain owns, for presentation layers.
    pub tokens: Vec<String>,
    pub applier: Option<Arc<dyn DomainApplier>>,
}

impl Debug for DomainConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainConfig")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("dependencies", &self.dependencies)
            .field("priority", &self.priority)
            .field("tokens", &self.tokens)
            .field("applier", &self.applier.is_some())
            .finish()
    }
}

impl DomainConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(), version: version.into(), ..Self::default() }
    }

    #[must_use]
    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(dependencies.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens.extend(tokens.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn applier(mut self, applier: impl DomainApplier) -> Self {
        self.applier = Some(Arc::new(applier));
        self
    }

    #[must_use]
    pub fn applier_arc(mut self, applier: Arc<dyn DomainApplier>) -> Self {
        self.applier = Some(applier);
        self
    }
}

/// A registered domain with its bounded result cache.
pub struct Domain {
    name: String,
    version: String,
    dependencies: Vec<String>,
    priority: i32,
    tokens: Vec<String>,
    applier: Arc<dyn DomainApplier>,
    cache: Option<Cache<String, Arc<DomainOutput>>>,
}

impl Debug for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Domain")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("dependencies", &self.dependencies)
            .field("priority", &self.priority)
            .field("tokens", &self.tokens)
            .field("cached_entries", &self.cache.as_ref().map(Cache::entry_count))
            .finish_non_exhaustive()
    }
}

impl Domain {
    /// `cache_capacity == 0` disables caching.
    pub(crate) fn new(
        name: String,
        version: String,
        dependencies: Vec<String>,
        priority: i32,
        tokens: Vec<String>,
        applier: Arc<dyn DomainApplier>,
        cache_capacity: u64,
    ) -> Self {
        let cache = (cache_capacity > 0).then(|| {
            Cache::builder()
                .name(&format!("domain-{name}"))
                .max_capacity(cache_capacity)
                .eviction_policy(EvictionPolicy::lru())
                .build()
        });
        Self { name, version, dependencies, priority, tokens, applier, cache }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn depends_on(&self, domain: &str) -> bool {
        self.dependencies.iter().any(|d| d == domain)
    }

    /// Drops every cached output.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }

    /// Applies `changes`, serving structurally identical change sets from the cache.
    ///
    /// # Errors
    /// The applier's own error, [`DomainError::Timeout`] when `deadline` expires,
    /// or [`DomainError::Serialize`] if the cache key cannot be built.
    pub async fn apply(
        &self,
        changes: &ChangeSet,
        options: ApplyOptions,
        deadline: Option<Duration>,
    ) -> Result<DomainResult, DomainError> {
        let cache = self.cache.as_ref().filter(|_| !options.contains(ApplyOptions::SKIP_CACHE));
        let key = match cache {
            Some(_) => Some(serde_json::to_string(changes)?),
            None => None,
        };

        if let (Some(cache), Some(key)) = (cache, key.as_ref())
            && let Some(output) = cache.get(key)
        {
            trace!(domain = %self.name, "Cache hit");
            return Ok(self.result(output, true));
        }

        trace!(domain = %self.name, keys = changes.len(), "Applying change set");
        let output = Arc::new(self.invoke(changes, deadline).await?);

        if let (Some(cache), Some(key)) = (cache, key) {
            cache.insert(key, Arc::clone(&output));
        }
        debug!(
            domain = %self.name,
            updates = output.updates.len(),
            valid = output.validation.valid,
            "Domain applied"
        );
        Ok(self.result(output, false))
    }

    /// Runs the applier under the deadline. A panicking applier becomes [`DomainError::Apply`].
    async fn invoke(&self, changes: &ChangeSet, deadline: Option<Duration>) -> Result<DomainOutput, DomainError> {
        let guarded = AssertUnwindSafe(self.applier.apply(changes)).catch_unwind();
        let outcome = match deadline {
            None => guarded.await,
            Some(deadline) => tokio::time::timeout(deadline, guarded).await.map_err(|_| DomainError::Timeout {
                domain: self.name.clone(),
                timeout_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                context: None,
            })?,
        };

        outcome.unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            error!(domain = %self.name, %message, "Domain applier panicked");
            Err(DomainError::apply(&self.name, format!("applier panicked: {message}")))
        })
    }

    fn result(&self, output: Arc<DomainOutput>, cached: bool) -> DomainResult {
        DomainResult { domain: self.name.clone(), version: self.version.clone(), cached, output }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
