use crate::rule_error::RuleError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use tessera_model::{TokenCategory, TokenValue};
use tracing::trace;

/// Pure derivation of one token's value from a base value.
pub trait Generator: Send + Sync + 'static {
    /// Category of the base value this generator accepts.
    fn input(&self) -> TokenCategory;

    /// Category of the value it produces.
    fn output(&self) -> TokenCategory;

    /// # Errors
    /// Returns [`RuleError`] when the base value cannot be derived from.
    fn generate(&self, base: &TokenValue) -> Result<TokenValue, RuleError>;
}

/// Closure-backed [`Generator`].
pub struct FnGenerator<F> {
    input: TokenCategory,
    output: TokenCategory,
    f: F,
}

impl<F> Debug for FnGenerator<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGenerator").field("input", &self.input).field("output", &self.output).finish()
    }
}

/// Wraps a closure as a [`Generator`].
///
/// ```rust
/// use tessera_model::{Dimension, TokenCategory, TokenValue};
/// use tessera_resolver::generator::{Generator, generator_fn};
///
/// let double = generator_fn(TokenCategory::Dimension, TokenCategory::Dimension, |base| {
///     Ok(TokenValue::Dimension(base.as_dimension().unwrap_or(Dimension::px(0.0)).scaled(2.0)))
/// });
/// let out = double.generate(&TokenValue::Dimension(Dimension::px(8.0))).unwrap();
/// assert_eq!(out.as_px(), Some(16.0));
/// ```
pub const fn generator_fn<F>(input: TokenCategory, output: TokenCategory, f: F) -> FnGenerator<F>
where
    F: Fn(&TokenValue) -> Result<TokenValue, RuleError> + Send + Sync + 'static,
{
    FnGenerator { input, output, f }
}

impl<F> Generator for FnGenerator<F>
where
    F: Fn(&TokenValue) -> Result<TokenValue, RuleError> + Send + Sync + 'static,
{
    fn input(&self) -> TokenCategory {
        self.input
    }

    fn output(&self) -> TokenCategory {
        self.output
    }

    fn generate(&self, base: &TokenValue) -> Result<TokenValue, RuleError> {
        (self.f)(base)
    }
}

/// Generators keyed by the identifier of the token they produce. Last registration wins.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: RwLock<FxHashMap<String, Arc<dyn Generator>>>,
}

impl Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let generators = self.generators.read();
        f.debug_struct("GeneratorRegistry").field("tokens", &generators.keys().collect::<Vec<_>>()).finish()
    }
}

impl GeneratorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, token: impl Into<String>, generator: impl Generator) {
        self.register_arc(token, Arc::new(generator));
    }

    pub fn register_arc(&self, token: impl Into<String>, generator: Arc<dyn Generator>) {
        let token = token.into();
        trace!(token = %token, input = %generator.input(), output = %generator.output(), "Generator registered");
        self.generators.write().insert(token, generator);
    }

    #[must_use]
    pub fn get(&self, token: &str) -> Option<Arc<dyn Generator>> {
        self.generators.read().get(token).cloned()
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.generators.read().contains_key(token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.read().len()
    }
}
