//! A domain whose applier is the engine's own resolver.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tessera_domains::{DomainApplier, DomainError};
use tessera_model::constants::NAMESPACE_SEPARATOR;
use tessera_model::{ChangeSet, DomainOutput, FailureStage, ItemFailure, TokenUpdate, TokenValue, UpdateOrigin};
use tessera_resolver::Resolver;
use tracing::{debug, trace};

/// Sets and resolves the tokens named by a change set.
///
/// Plain keys name tokens directly. Namespaced keys forwarded from other
/// domains (`color.primary`) only count when bound to a local token; the rest
/// are ignored. The semantic output holds every resolved value by token name.
#[derive(Debug, Clone)]
pub struct ResolverDomain {
    resolver: Resolver,
    bindings: BTreeMap<String, String>,
}

impl ResolverDomain {
    #[must_use]
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver, bindings: BTreeMap::new() }
    }

    /// Routes input `key` to `token`.
    #[must_use]
    pub fn bind(mut self, key: impl Into<String>, token: impl Into<String>) -> Self {
        self.bindings.insert(key.into(), token.into());
        self
    }

    /// Local token an input key targets, if any.
    #[must_use]
    pub fn target<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        match self.bindings.get(key) {
            Some(token) => Some(token),
            None if key.contains(NAMESPACE_SEPARATOR) => None,
            None => Some(key),
        }
    }

    fn set(&self, output: &mut DomainOutput, token: &str, value: TokenValue) {
        output.updates.push(TokenUpdate {
            name: token.to_owned(),
            css_variable: self.resolver.registries().catalog.css_variable(token),
            value: value.clone(),
            origin: UpdateOrigin::Direct,
            constraint_corrected: false,
        });
        output.semantic.insert(token, value.clone());

        match self.resolver.resolve(token, value) {
            Ok(resolution) => {
                for update in &resolution.updates {
                    output.semantic.insert(update.name.as_str(), update.value.clone());
                }
                output.updates.extend(resolution.updates);
                output.validation.merge(resolution.validation);
                output.failures.extend(resolution.failures);
            },
            Err(err) => {
                output.failures.push(ItemFailure::new(FailureStage::Generation, token, err.to_string()));
            },
        }
    }
}

#[async_trait]
impl DomainApplier for ResolverDomain {
    async fn apply(&self, changes: &ChangeSet) -> Result<DomainOutput, DomainError> {
        let mut output = DomainOutput::default();

        for (key, value) in changes {
            let Some(token) = self.target(key) else {
                trace!(key = %key, "Unbound namespaced input ignored");
                continue;
            };
            self.set(&mut output, token, value.clone());
        }

        debug!(
            inputs = changes.len(),
            updates = output.updates.len(),
            failures = output.failures.len(),
            "Resolver domain applied"
        );
        Ok(output)
    }
}
