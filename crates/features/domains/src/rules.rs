//! How one domain's output becomes another domain's input.

use crate::error::DomainError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use tessera_model::constants::NAMESPACE_SEPARATOR;
use tessera_model::{ChangeSet, DomainOutput};
use tracing::trace;

/// Synthesizes the change set a target domain receives when `source` changes.
///
/// An empty change set means "nothing for this target" and skips it.
pub trait PropagationRule: Send + Sync + 'static {
    /// # Errors
    /// Any [`DomainError`]; the target is then recorded as skipped.
    fn derive(&self, source: &str, changes: &ChangeSet, output: &DomainOutput) -> Result<ChangeSet, DomainError>;
}

/// Default rule: forwards the source's semantic output as `<source>.<key>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardSemantic;

impl PropagationRule for ForwardSemantic {
    fn derive(&self, source: &str, _: &ChangeSet, output: &DomainOutput) -> Result<ChangeSet, DomainError> {
        Ok(output
            .semantic
            .iter()
            .map(|(key, value)| (format!("{source}{NAMESPACE_SEPARATOR}{key}"), value.clone()))
            .collect())
    }
}

/// Closure-backed [`PropagationRule`].
pub struct FnRule<F> {
    f: F,
}

impl<F> Debug for FnRule<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").finish_non_exhaustive()
    }
}

pub const fn rule_fn<F>(f: F) -> FnRule<F>
where
    F: Fn(&str, &ChangeSet, &DomainOutput) -> Result<ChangeSet, DomainError> + Send + Sync + 'static,
{
    FnRule { f }
}

impl<F> PropagationRule for FnRule<F>
where
    F: Fn(&str, &ChangeSet, &DomainOutput) -> Result<ChangeSet, DomainError> + Send + Sync + 'static,
{
    fn derive(&self, source: &str, changes: &ChangeSet, output: &DomainOutput) -> Result<ChangeSet, DomainError> {
        (self.f)(source, changes, output)
    }
}

/// Rules keyed by `(source, target)`. Last registration wins.
#[derive(Default)]
pub struct PropagationRules {
    rules: RwLock<FxHashMap<(String, String), Arc<dyn PropagationRule>>>,
}

impl Debug for PropagationRules {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rules = self.rules.read();
        f.debug_struct("PropagationRules").field("edges", &rules.keys().collect::<Vec<_>>()).finish()
    }
}

impl PropagationRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, source: impl Into<String>, target: impl Into<String>, rule: impl PropagationRule) {
        self.register_arc(source, target, Arc::new(rule));
    }

    pub fn register_arc(&self, source: impl Into<String>, target: impl Into<String>, rule: Arc<dyn PropagationRule>) {
        let (source, target) = (source.into(), target.into());
        trace!(source = %source, target = %target, "Propagation rule registered");
        self.rules.write().insert((source, target), rule);
    }

    /// Installs [`ForwardSemantic`] unless a rule for the edge already exists.
    pub fn ensure_default(&self, source: &str, target: &str) {
        self.rules
            .write()
            .entry((source.to_owned(), target.to_owned()))
            .or_insert_with(|| Arc::new(ForwardSemantic));
    }

    #[must_use]
    pub fn get(&self, source: &str, target: &str) -> Option<Arc<dyn PropagationRule>> {
        self.rules.read().get(&(source.to_owned(), target.to_owned())).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }
}
