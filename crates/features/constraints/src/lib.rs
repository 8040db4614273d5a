//! # Constraints
//!
//! The built-in rule set: WCAG colour math, the accessibility and consistency
//! validators, value generators and the default affect rules.
//!
//! ```rust
//! use tessera_constraints::install_defaults;
//! use tessera_model::ConstraintConfig;
//! use tessera_resolver::Registries;
//!
//! let registries = Registries::new();
//! install_defaults(&ConstraintConfig::default(), &registries);
//! assert!(registries.validators.contains("contrast-aa"));
//! ```

pub mod affect;
pub mod color;
pub mod generators;
pub mod validators;

pub use crate::validators::{
    ContrastValidator, HarmonyValidator, ReadabilityValidator, RhythmValidator, TouchTargetValidator,
};

use tessera_model::ConstraintConfig;
use tessera_resolver::Registries;
use tracing::debug;

/// Registers the built-in validators and affect rules.
///
/// Generators are bound per token, so they are left to the caller (see [`generators`]).
pub fn install_defaults(config: &ConstraintConfig, registries: &Registries) {
    validators::install(config, &registries.validators);
    affect::install(&registries.affect_rules);
    debug!(
        validators = registries.validators.len(),
        affect_rules = registries.affect_rules.len(),
        "Built-in constraints installed"
    );
}
