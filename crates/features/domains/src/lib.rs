//! # Domains
//!
//! Named groups of tokens (`color`, `typography`, `component`) with an async
//! applier each, a bounded LRU result cache per domain and iterative
//! cross-domain propagation along declared dependencies.
//!
//! ```rust
//! use tessera_domains::{DomainConfig, Domains, sync_applier_fn};
//! use tessera_events::EventBus;
//! use tessera_model::config::EngineConfig;
//! use tessera_model::{ApplyOptions, ChangeSet, DomainOutput};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let domains = Domains::new(&EngineConfig::default(), EventBus::new());
//! domains
//!     .register("color", DomainConfig::new("color", "1.0.0").applier(sync_applier_fn(|changes| {
//!         Ok(DomainOutput { semantic: changes.clone(), ..DomainOutput::default() })
//!     })))
//!     .unwrap();
//!
//! let result = domains
//!     .apply_customization("color", ChangeSet::new(), ApplyOptions::empty())
//!     .await
//!     .unwrap();
//! assert!(result.get("color").is_some());
//! # });
//! ```

pub mod domain;
mod error;
pub mod propagator;
pub mod registry;
pub mod rules;

pub use crate::domain::{Domain, DomainApplier, DomainConfig, applier_fn, sync_applier_fn};
pub use crate::error::{DomainError, DomainErrorExt};
pub use crate::propagator::{Propagation, PropagationPolicy, Propagator};
pub use crate::registry::DomainRegistry;
pub use crate::rules::{ForwardSemantic, PropagationRule, PropagationRules, rule_fn};

use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tessera_events::{CustomizationApplied, EngineEvent, EventBus};
use tessera_model::config::EngineConfig;
use tessera_model::{ApplyOptions, ChangeSet, CustomizationResult};
use tracing::{Instrument, info, info_span};

/// Domain layer state shared by every clone.
#[derive(Debug)]
pub struct DomainsInner {
    registry: DomainRegistry,
    rules: PropagationRules,
    events: EventBus,
    cache_capacity: u64,
    policy: PropagationPolicy,
    deadline: Option<Duration>,
}

/// Cheap-to-clone handle over the domain registry, propagation rules and event bus.
#[derive(Debug, Clone)]
pub struct Domains {
    inner: Arc<DomainsInner>,
}

impl Deref for Domains {
    type Target = DomainsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Domains {
    #[must_use]
    pub fn new(config: &EngineConfig, events: EventBus) -> Self {
        Self {
            inner: Arc::new(DomainsInner {
                registry: DomainRegistry::new(),
                rules: PropagationRules::new(),
                events,
                cache_capacity: config.cache.capacity,
                policy: PropagationPolicy::from(&config.propagation),
                deadline: config.deadline.apply_timeout(),
            }),
        }
    }

    /// Registers a domain and wires default `dependency → name` propagation rules.
    ///
    /// # Errors
    /// See [`DomainRegistry::register`].
    pub fn register(&self, name: &str, config: DomainConfig) -> Result<Arc<Domain>, DomainError> {
        let domain = self.registry.register(name, config, self.cache_capacity)?;
        for dependency in domain.dependencies() {
            self.rules.ensure_default(dependency, name);
        }
        self.events.publish(EngineEvent::DomainRegistered {
            domain: name.to_owned(),
            version: domain.version().to_owned(),
            dependencies: domain.dependencies().to_vec(),
        });
        Ok(domain)
    }

    pub fn register_rule(&self, source: &str, target: &str, rule: impl PropagationRule) {
        self.rules.register(source, target, rule);
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.registry.names()
    }

    #[must_use]
    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    #[must_use]
    pub fn rules(&self) -> &PropagationRules {
        &self.rules
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    #[must_use]
    pub fn policy(&self) -> PropagationPolicy {
        self.policy
    }

    /// Applies `changes` to `name`, then propagates to its dependents unless
    /// [`ApplyOptions::SKIP_CROSS_DOMAIN`] is set.
    ///
    /// Dependent failures do not fail the call; they land in
    /// [`CustomizationResult::skipped`].
    ///
    /// # Errors
    /// * [`DomainError::UnknownDomain`] when `name` is not registered.
    /// * The source applier's error, including [`DomainError::Timeout`].
    pub async fn apply_customization(
        &self,
        name: &str,
        changes: ChangeSet,
        options: ApplyOptions,
    ) -> Result<CustomizationResult, DomainError> {
        self.apply_with_policy(name, changes, options, self.policy).await
    }

    /// [`Domains::apply_customization`] with an explicit propagation policy.
    ///
    /// # Errors
    /// See [`Domains::apply_customization`].
    pub async fn apply_with_policy(
        &self,
        name: &str,
        changes: ChangeSet,
        options: ApplyOptions,
        policy: PropagationPolicy,
    ) -> Result<CustomizationResult, DomainError> {
        let run_id = tessera_kernel::run_id();
        let span = info_span!("apply_customization", run_id = %run_id, domain = name);

        async move {
            let domain = self.registry.get(name).ok_or_else(|| DomainError::UnknownDomain {
                domain: name.to_owned(),
                context: None,
            })?;

            let source = domain.apply(&changes, options, self.deadline).await?;
            let output = Arc::clone(&source.output);

            let mut domains = BTreeMap::from([(name.to_owned(), source)]);
            let mut skipped = BTreeMap::new();

            if !options.contains(ApplyOptions::SKIP_CROSS_DOMAIN) {
                let propagator =
                    Propagator { registry: &self.registry, rules: &self.rules, policy, deadline: self.deadline };
                let propagation = propagator.run(&domain, changes, output, options).await;
                domains.extend(propagation.applied);
                skipped = propagation.skipped;
            }

            let result = CustomizationResult { run_id, source: name.to_owned(), domains, skipped };
            info!(
                domains = result.domains.len(),
                skipped = result.skipped.len(),
                valid = result.is_valid(),
                "Customization applied"
            );

            self.events.publish(EngineEvent::CustomizationApplied(Arc::new(CustomizationApplied {
                result: Arc::new(result.clone()),
                options,
            })));
            Ok(result)
        }
        .instrument(span)
        .await
    }
}
