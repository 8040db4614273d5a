use crate::affect::AffectRuleRegistry;
use crate::catalog::TokenCatalog;
use crate::error::ResolverError;
use crate::generator::GeneratorRegistry;
use crate::graph::DependencyGraph;
use crate::validator::ValidatorRegistry;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tessera_model::Relationship;
use tracing::{debug, warn};

/// Relationships keyed by base token, feeding the dependency graph.
#[derive(Debug, Default)]
pub struct RelationshipRegistry {
    relationships: RwLock<FxHashMap<String, Relationship>>,
    graph: DependencyGraph,
}

impl RelationshipRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `relationship` under `token` and adds its edges to the graph.
    ///
    /// Re-registration replaces the record; edges from earlier registrations stay.
    ///
    /// # Errors
    /// Returns [`ResolverError::InvalidConfig`] (and leaves the registry untouched) when
    /// `token` or any listed entry is empty, a list repeats an entry, or a token is
    /// both generated and affected.
    pub fn register(&self, token: &str, relationship: Relationship) -> Result<(), ResolverError> {
        if let Err(err) = check_shape(token, &relationship) {
            warn!(token, error = %err, "Relationship rejected");
            return Err(err);
        }

        self.graph.add_edges(token, relationship.targets());
        debug!(
            token,
            domain = %relationship.domain,
            generates = relationship.generates.len(),
            affects = relationship.affects.len(),
            constraints = relationship.constraints.len(),
            "Relationship registered"
        );
        self.relationships.write().insert(token.to_owned(), relationship);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, token: &str) -> Option<Relationship> {
        self.relationships.read().get(token).cloned()
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.relationships.read().contains_key(token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.relationships.read().len()
    }

    #[must_use]
    pub const fn graph(&self) -> &DependencyGraph {
        &self.graph
    }
}

fn check_shape(token: &str, relationship: &Relationship) -> Result<(), ResolverError> {
    let invalid = |message: String| ResolverError::InvalidConfig {
        message: message.into(),
        context: Some(format!("registering `{token}`").into()),
    };

    if token.trim().is_empty() {
        return Err(invalid("base token name is empty".to_owned()));
    }
    let lists = [&relationship.generates, &relationship.affects, &relationship.constraints];
    if lists.iter().any(|list| list.iter().any(|entry| entry.trim().is_empty())) {
        return Err(invalid("relationship lists must not contain empty names".to_owned()));
    }
    if let Some(duplicate) = relationship.duplicate() {
        return Err(invalid(format!("`{duplicate}` is listed twice")));
    }
    if let Some(overlap) = relationship.overlap() {
        return Err(invalid(format!("`{overlap}` is both generated and affected")));
    }
    Ok(())
}

/// Every registry the resolver reads, shared behind `Arc`s.
#[derive(Debug, Clone, Default)]
pub struct Registries {
    pub catalog: Arc<TokenCatalog>,
    pub relationships: Arc<RelationshipRegistry>,
    pub generators: Arc<GeneratorRegistry>,
    pub validators: Arc<ValidatorRegistry>,
    pub affect_rules: Arc<AffectRuleRegistry>,
}

impl Registries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_overlap_without_mutation() {
        let registry = RelationshipRegistry::new();
        let rel = Relationship::new("color").generates(["a"]).affects(["a"]);

        let err = registry.register("base", rel).unwrap_err();
        assert_eq!(err.kind(), "invalid-config");
        assert!(!registry.contains("base"));
        assert_eq!(registry.graph().edge_count(), 0);
    }

    #[test]
    fn rejects_empty_names_and_duplicates() {
        let registry = RelationshipRegistry::new();
        assert!(registry.register(" ", Relationship::new("x")).is_err());
        assert!(registry.register("base", Relationship::new("x").generates([""])).is_err());
        assert!(registry.register("base", Relationship::new("x").affects(["t", "t"])).is_err());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn reregistration_overwrites_but_keeps_edges() {
        let registry = RelationshipRegistry::new();
        registry.register("base", Relationship::new("x").generates(["old"])).unwrap();
        registry.register("base", Relationship::new("x").generates(["new"])).unwrap();

        assert_eq!(registry.get("base").unwrap().generates, ["new"]);
        assert_eq!(registry.graph().successors("base"), ["old", "new"]);
    }
}
