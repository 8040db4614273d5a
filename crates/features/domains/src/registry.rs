use crate::domain::{Domain, DomainConfig};
use crate::error::DomainError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct Entries {
    by_name: FxHashMap<String, Arc<Domain>>,
    /// Registration order; dependents are visited in this order.
    order: Vec<String>,
}

/// Registered domains.
///
/// Dependencies must be registered strictly before their dependents, so the
/// registration order is always a valid topological order.
#[derive(Debug, Default)]
pub struct DomainRegistry {
    entries: RwLock<Entries>,
}

impl DomainRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a domain. Re-registering a name replaces the
    /// domain (and its cache) in place.
    ///
    /// # Errors
    /// * [`DomainError::InvalidConfig`] when the name, version or applier is
    ///   missing, or the config's name differs from `name`.
    /// * [`DomainError::UnmetDependency`] when a dependency is not registered yet.
    ///
    /// A rejected call leaves the registry untouched.
    pub fn register(&self, name: &str, config: DomainConfig, cache_capacity: u64) -> Result<Arc<Domain>, DomainError> {
        let DomainConfig { name: config_name, version, dependencies, priority, tokens, applier } = config;

        if name.trim().is_empty() {
            return Err(invalid(name, "domain name cannot be empty".into()));
        }
        if config_name != name {
            return Err(invalid(name, format!("config name '{config_name}' does not match '{name}'")));
        }
        if version.trim().is_empty() {
            return Err(invalid(name, format!("domain '{name}' has no version")));
        }
        let Some(applier) = applier else {
            return Err(invalid(name, format!("domain '{name}' has no applier")));
        };

        let mut entries = self.entries.write();
        if let Some(dependency) = dependencies.iter().find(|d| !entries.by_name.contains_key(d.as_str())) {
            warn!(domain = name, dependency = %dependency, "Domain registration rejected, unmet dependency");
            return Err(DomainError::UnmetDependency {
                domain: name.to_owned(),
                dependency: dependency.clone(),
                context: None,
            });
        }

        let domain =
            Arc::new(Domain::new(name.to_owned(), version, dependencies, priority, tokens, applier, cache_capacity));
        if entries.by_name.insert(name.to_owned(), Arc::clone(&domain)).is_none() {
            entries.order.push(name.to_owned());
        }
        info!(
            domain = name,
            version = %domain.version(),
            dependencies = ?domain.dependencies(),
            priority = domain.priority(),
            "Domain registered"
        );
        Ok(domain)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Domain>> {
        self.entries.read().by_name.get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().by_name.contains_key(name)
    }

    /// Names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.read().order.clone()
    }

    /// Domains by ascending priority; equal priorities keep registration order.
    #[must_use]
    pub fn by_priority(&self) -> Vec<Arc<Domain>> {
        let entries = self.entries.read();
        let mut domains: Vec<_> = entries.order.iter().filter_map(|name| entries.by_name.get(name)).cloned().collect();
        domains.sort_by_key(|domain| domain.priority());
        domains
    }

    /// Domains depending on `source`, in registration order.
    #[must_use]
    pub fn dependents_of(&self, source: &str) -> Vec<Arc<Domain>> {
        let entries = self.entries.read();
        entries
            .order
            .iter()
            .filter_map(|name| entries.by_name.get(name))
            .filter(|domain| domain.depends_on(source))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().order.len()
    }
}

fn invalid(name: &str, message: String) -> DomainError {
    warn!(domain = name, %message, "Domain registration rejected");
    DomainError::InvalidConfig { message: message.into(), context: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sync_applier_fn;
    use tessera_model::DomainOutput;

    fn config(name: &str) -> DomainConfig {
        DomainConfig::new(name, "1.0.0").applier(sync_applier_fn(|_| Ok(DomainOutput::default())))
    }

    #[test]
    fn priority_orders_listing_but_not_dependents() {
        let registry = DomainRegistry::new();
        registry.register("color", config("color").priority(10).tokens(["primary", "background"]), 8).unwrap();
        registry.register("typography", config("typography").depends_on(["color"]).priority(20), 8).unwrap();
        registry.register("component", config("component").depends_on(["color"]).priority(5), 8).unwrap();
        registry.register("motion", config("motion").priority(10), 8).unwrap();

        let listed: Vec<_> = registry.by_priority().iter().map(|d| d.name().to_owned()).collect();
        assert_eq!(listed, ["component", "color", "motion", "typography"]);

        let dependents: Vec<_> = registry.dependents_of("color").iter().map(|d| d.name().to_owned()).collect();
        assert_eq!(dependents, ["typography", "component"]);

        let color = registry.get("color").unwrap();
        assert_eq!(color.priority(), 10);
        assert_eq!(color.tokens(), ["primary", "background"]);
        assert!(registry.get("motion").unwrap().tokens().is_empty());
    }

    #[test]
    fn empty_config_is_rejected() {
        let registry = DomainRegistry::new();
        let err = registry.register("x", DomainConfig::default(), 8).unwrap_err();
        assert_eq!(err.kind(), "invalid-config");
        assert!(!registry.contains("x"));
    }

    #[test]
    fn missing_applier_and_mismatched_name_are_rejected() {
        let registry = DomainRegistry::new();
        assert!(registry.register("x", DomainConfig::new("x", "1.0.0"), 8).is_err());
        assert!(registry.register("x", config("y"), 8).is_err());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn unmet_dependency_is_rejected() {
        let registry = DomainRegistry::new();
        let err = registry.register("y", config("y").depends_on(["unregistered"]), 8).unwrap_err();
        assert!(matches!(err, DomainError::UnmetDependency { ref dependency, .. } if dependency == "unregistered"));
        assert!(!registry.contains("y"));
    }

    #[test]
    fn dependents_follow_registration_order() {
        let registry = DomainRegistry::new();
        registry.register("color", config("color"), 8).unwrap();
        registry.register("typography", config("typography").depends_on(["color"]), 8).unwrap();
        registry.register("component", config("component").depends_on(["color", "typography"]), 8).unwrap();

        let dependents: Vec<_> = registry.dependents_of("color").iter().map(|d| d.name().to_owned()).collect();
        assert_eq!(dependents, ["typography", "component"]);
        assert_eq!(registry.names(), ["color", "typography", "component"]);

        // Re-registration keeps the slot.
        registry.register("color", config("color"), 8).unwrap();
        assert_eq!(registry.names(), ["color", "typography", "component"]);
    }
}
