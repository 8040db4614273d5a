use fxhash::FxHashMap;
use parking_lot::RwLock;
use tessera_model::token::default_css_variable;
use tessera_model::{TokenCategory, TokenRole, TokenSpec};
use tracing::trace;

/// Declared tokens: role, category and CSS variable per name.
///
/// Undeclared tokens are still resolvable; they fall back to [`TokenRole::Generic`]
/// and `--<name>`.
#[derive(Debug, Default)]
pub struct TokenCatalog {
    specs: RwLock<FxHashMap<String, TokenSpec>>,
}

impl TokenCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares or replaces a token.
    pub fn declare(&self, spec: TokenSpec) {
        trace!(token = %spec.name, role = %spec.role, category = %spec.category, "Token declared");
        self.specs.write().insert(spec.name.clone(), spec);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<TokenSpec> {
        self.specs.read().get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.specs.read().contains_key(name)
    }

    #[must_use]
    pub fn role_of(&self, name: &str) -> TokenRole {
        self.specs.read().get(name).map_or(TokenRole::Generic, |spec| spec.role)
    }

    #[must_use]
    pub fn css_variable(&self, name: &str) -> String {
        self.specs
            .read()
            .get(name)
            .map_or_else(|| default_css_variable(name), |spec| spec.css_variable().into_owned())
    }

    /// Declared spec, or a generic one in `fallback` category.
    #[must_use]
    pub fn spec_or(&self, name: &str, fallback: TokenCategory) -> TokenSpec {
        self.get(name).unwrap_or_else(|| TokenSpec::new(name, fallback, TokenRole::Generic))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.read().len()
    }
}
