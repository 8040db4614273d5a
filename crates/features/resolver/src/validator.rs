use crate::rule_error::RuleError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use tessera_model::{Token, TokenCategory, ValidationResult};
use tracing::trace;

/// Checks a base token against the candidates produced so far.
///
/// Corrections are advisory: the resolver decides whether to apply them and
/// ignores those naming tokens that are not candidates.
pub trait ConstraintValidator: Send + Sync + 'static {
    /// Base category this validator understands; `None` accepts any.
    fn category(&self) -> Option<TokenCategory>;

    /// # Errors
    /// Returns [`RuleError`] when the check itself cannot run.
    fn validate(&self, base: &Token, candidates: &[Token]) -> Result<ValidationResult, RuleError>;
}

/// Closure-backed [`ConstraintValidator`].
pub struct FnValidator<F> {
    category: Option<TokenCategory>,
    f: F,
}

impl<F> Debug for FnValidator<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator").field("category", &self.category).finish()
    }
}

pub const fn validator_fn<F>(category: Option<TokenCategory>, f: F) -> FnValidator<F>
where
    F: Fn(&Token, &[Token]) -> Result<ValidationResult, RuleError> + Send + Sync + 'static,
{
    FnValidator { category, f }
}

impl<F> ConstraintValidator for FnValidator<F>
where
    F: Fn(&Token, &[Token]) -> Result<ValidationResult, RuleError> + Send + Sync + 'static,
{
    fn category(&self) -> Option<TokenCategory> {
        self.category
    }

    fn validate(&self, base: &Token, candidates: &[Token]) -> Result<ValidationResult, RuleError> {
        (self.f)(base, candidates)
    }
}

/// Validators keyed by constraint id. Last registration wins.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: RwLock<FxHashMap<String, Arc<dyn ConstraintValidator>>>,
}

impl Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let validators = self.validators.read();
        f.debug_struct("ValidatorRegistry")
            .field("constraints", &validators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ValidatorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: impl Into<String>, validator: impl ConstraintValidator) {
        self.register_arc(id, Arc::new(validator));
    }

    pub fn register_arc(&self, id: impl Into<String>, validator: Arc<dyn ConstraintValidator>) {
        let id = id.into();
        trace!(constraint = %id, "Validator registered");
        self.validators.write().insert(id, validator);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn ConstraintValidator>> {
        self.validators.read().get(id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.validators.read().contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.read().len()
    }
}
