use crate::rule_error::RuleError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use tessera_model::{Token, TokenRole, TokenSpec, TokenValue};
use tracing::trace;

/// Recomputes an affected token from its base (background → text, font size → line height).
pub trait AffectRule: Send + Sync + 'static {
    /// # Errors
    /// Returns [`RuleError`] when the base value does not fit the rule.
    fn compute(&self, base: &Token, affected: &TokenSpec) -> Result<TokenValue, RuleError>;
}

/// Closure-backed [`AffectRule`].
pub struct FnAffectRule<F> {
    f: F,
}

impl<F> Debug for FnAffectRule<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAffectRule").finish_non_exhaustive()
    }
}

pub const fn affect_fn<F>(f: F) -> FnAffectRule<F>
where
    F: Fn(&Token, &TokenSpec) -> Result<TokenValue, RuleError> + Send + Sync + 'static,
{
    FnAffectRule { f }
}

impl<F> AffectRule for FnAffectRule<F>
where
    F: Fn(&Token, &TokenSpec) -> Result<TokenValue, RuleError> + Send + Sync + 'static,
{
    fn compute(&self, base: &Token, affected: &TokenSpec) -> Result<TokenValue, RuleError> {
        (self.f)(base, affected)
    }
}

/// Affect rules keyed by `(affected role, base role)`.
///
/// The set is explicit and open: pairs without a rule are skipped by the resolver.
#[derive(Default)]
pub struct AffectRuleRegistry {
    rules: RwLock<FxHashMap<(TokenRole, TokenRole), Arc<dyn AffectRule>>>,
}

impl Debug for AffectRuleRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rules = self.rules.read();
        f.debug_struct("AffectRuleRegistry").field("pairs", &rules.keys().collect::<Vec<_>>()).finish()
    }
}

impl AffectRuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, affected: TokenRole, base: TokenRole, rule: impl AffectRule) {
        self.register_arc(affected, base, Arc::new(rule));
    }

    pub fn register_arc(&self, affected: TokenRole, base: TokenRole, rule: Arc<dyn AffectRule>) {
        trace!(affected = %affected, base = %base, "Affect rule registered");
        self.rules.write().insert((affected, base), rule);
    }

    #[must_use]
    pub fn get(&self, affected: TokenRole, base: TokenRole) -> Option<Arc<dyn AffectRule>> {
        self.rules.read().get(&(affected, base)).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }
}
