use crate::error::EngineError;
use crate::resolver_domain::ResolverDomain;
use std::ops::Deref;
use std::sync::Arc;
use tessera_domains::{DomainConfig, Domains, PropagationRule};
use tessera_events::{EngineEvent, EventBus};
use tessera_model::config::EngineConfig;
use tessera_model::{ApplyOptions, ChangeSet, CustomizationResult, Relationship, Resolution, TokenRole, TokenSpec, TokenValue};
use tessera_resolver::{AffectRule, ConstraintValidator, Generator, Registries, Resolver, ResolverError};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Everything one engine instance owns. No globals: two engines never share state.
#[derive(Debug)]
pub struct EngineInner {
    config: EngineConfig,
    resolver: Resolver,
    domains: Domains,
    events: EventBus,
}

/// Token resolution and domain customization behind one cheap-to-clone handle.
#[derive(Debug, Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Deref for Engine {
    type Target = EngineInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Builder for [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    config: Option<EngineConfig>,
    events: Option<EventBus>,
    defaults: bool,
}

impl EngineBuilder {
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shares an existing bus instead of creating one sized by `events.capacity`.
    #[must_use]
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Installs the built-in validators and affect rules.
    #[must_use]
    pub const fn with_defaults(mut self, enabled: bool) -> Self {
        self.defaults = enabled;
        self
    }

    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] when the event capacity is zero.
    pub fn build(self) -> Result<Engine, EngineError> {
        let config = self.config.unwrap_or_default();
        let events = match self.events {
            Some(events) => events,
            None => EventBus::with_capacity(config.events.capacity)?,
        };

        let registries = Registries::new();
        if self.defaults {
            tessera_constraints::install_defaults(&config.constraints, &registries);
        }

        let domains = Domains::new(&config, events.clone());
        info!(
            defaults = self.defaults,
            cache_capacity = config.cache.capacity,
            max_depth = config.propagation.max_depth,
            "Engine initialized"
        );

        Ok(Engine {
            inner: Arc::new(EngineInner { config, resolver: Resolver::new(registries), domains, events }),
        })
    }
}

impl Engine {
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder { defaults: true, ..EngineBuilder::default() }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    #[must_use]
    pub fn registries(&self) -> &Registries {
        self.resolver.registries()
    }

    #[must_use]
    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // --- Registration ---

    pub fn declare_token(&self, spec: TokenSpec) {
        self.registries().catalog.declare(spec);
    }

    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] for a malformed relationship.
    pub fn register_relationship(&self, token: &str, relationship: Relationship) -> Result<(), EngineError> {
        Ok(self.registries().relationships.register(token, relationship)?)
    }

    pub fn register_generator(&self, token: impl Into<String>, generator: impl Generator) {
        self.registries().generators.register(token, generator);
    }

    pub fn register_validator(&self, id: impl Into<String>, validator: impl ConstraintValidator) {
        self.registries().validators.register(id, validator);
    }

    pub fn register_affect_rule(&self, affected: TokenRole, base: TokenRole, rule: impl AffectRule) {
        self.registries().affect_rules.register(affected, base, rule);
    }

    /// # Errors
    /// [`EngineError::InvalidConfig`] or [`EngineError::UnmetDependency`]; the
    /// domain is not registered in either case.
    pub fn register_domain(&self, name: &str, config: DomainConfig) -> Result<(), EngineError> {
        self.domains.register(name, config)?;
        Ok(())
    }

    /// Registers `config` with this engine's resolver as its applier; any applier
    /// already on `config` is replaced.
    ///
    /// # Errors
    /// See [`Engine::register_domain`].
    pub fn register_resolver_domain(&self, config: DomainConfig, bindings: &[(&str, &str)]) -> Result<(), EngineError> {
        let applier = bindings
            .iter()
            .fold(ResolverDomain::new(self.resolver.clone()), |domain, (key, token)| domain.bind(*key, *token));
        let name = config.name.clone();
        self.register_domain(&name, config.applier(applier))
    }

    pub fn register_propagation_rule(&self, source: &str, target: &str, rule: impl PropagationRule) {
        self.domains.register_rule(source, target, rule);
    }

    #[must_use]
    pub fn is_registered(&self, domain: &str) -> bool {
        self.domains.is_registered(domain)
    }

    /// Domain names in registration order.
    #[must_use]
    pub fn domain_names(&self) -> Vec<String> {
        self.domains.names()
    }

    // --- Resolution ---

    /// Resolves one token change.
    ///
    /// Isolated generator and validator failures are reported on the
    /// [`Resolution`], not as errors; see [`Engine::resolve_strict`].
    ///
    /// # Errors
    /// Returns [`EngineError::CircularDependency`] when `token` reaches itself.
    pub fn resolve(&self, token: &str, value: TokenValue) -> Result<Resolution, EngineError> {
        match self.resolver.resolve(token, value) {
            Ok(resolution) => {
                self.events.publish(EngineEvent::TokenResolved {
                    token: token.to_owned(),
                    updates: resolution.updates.len(),
                    valid: resolution.validation.valid,
                });
                Ok(resolution)
            },
            Err(ResolverError::CircularDependency { token, path, context }) => {
                self.events.publish(EngineEvent::CycleDetected { token: token.clone(), path: path.clone() });
                Err(EngineError::CircularDependency { token, path, context })
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Like [`Engine::resolve`], but any isolated failure or orchestration
    /// fault becomes an error.
    ///
    /// # Errors
    /// [`EngineError::Generator`] or [`EngineError::Validator`] for the first
    /// isolated failure, [`EngineError::System`] for a `system-error` result.
    pub fn resolve_strict(&self, token: &str, value: TokenValue) -> Result<Resolution, EngineError> {
        let resolution = self.resolve(token, value)?;
        if let Some(failure) = resolution.failures.first() {
            warn!(token, stage = %failure.stage, subject = %failure.subject, "Strict resolution failed");
            return Err(failure.into());
        }
        if resolution.validation.is_system_error() {
            let message = resolution
                .validation
                .violations
                .iter()
                .find(|v| v.constraint == tessera_model::constants::SYSTEM_ERROR)
                .map_or_else(String::new, |v| v.message.clone());
            return Err(EngineError::System { message: message.into(), context: Some(token.to_owned().into()) });
        }
        debug!(token, "Strict resolution passed");
        Ok(resolution)
    }

    /// Applies `changes` to `domain` and propagates to its dependents.
    ///
    /// # Errors
    /// [`EngineError::UnknownDomain`], [`EngineError::Timeout`] or
    /// [`EngineError::Apply`] for the source domain.
    pub async fn apply_customization(
        &self,
        domain: &str,
        changes: ChangeSet,
        options: ApplyOptions,
    ) -> Result<CustomizationResult, EngineError> {
        Ok(self.domains.apply_customization(domain, changes, options).await?)
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<EngineEvent>> {
        self.events.subscribe()
    }
}
