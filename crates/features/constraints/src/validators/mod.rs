//! Built-in constraint validators.
//!
//! Each validator checks the resolved candidates against the base token and
//! proposes corrections only for candidates, never for the base itself.

mod contrast;
mod harmony;
mod readability;
mod rhythm;
mod touch_target;

pub use contrast::ContrastValidator;
pub use harmony::HarmonyValidator;
pub use readability::ReadabilityValidator;
pub use rhythm::RhythmValidator;
pub use touch_target::TouchTargetValidator;

use tessera_model::constants::{
    COLOR_HARMONY, CONTRAST_AA, CONTRAST_AAA, CONTRAST_LARGE, TOUCH_TARGET, TYPOGRAPHY_READABILITY,
    VISUAL_RHYTHM,
};
use tessera_model::{ConstraintConfig, Dimension, Token, TokenRole};
use tessera_resolver::ValidatorRegistry;

/// Registers every built-in validator under its constraint id.
pub fn install(config: &ConstraintConfig, validators: &ValidatorRegistry) {
    validators.register(CONTRAST_AA, ContrastValidator::new(CONTRAST_AA, config.contrast_aa));
    validators.register(CONTRAST_AAA, ContrastValidator::new(CONTRAST_AAA, config.contrast_aaa));
    validators.register(CONTRAST_LARGE, ContrastValidator::new(CONTRAST_LARGE, config.contrast_large));
    validators.register(COLOR_HARMONY, HarmonyValidator::new(config.harmony_tolerance));
    validators.register(
        TYPOGRAPHY_READABILITY,
        ReadabilityValidator::new(config.readability_minimum, config.readability_optimal),
    );
    validators.register(TOUCH_TARGET, TouchTargetValidator::new(config.touch_target));
    validators.register(
        VISUAL_RHYTHM,
        RhythmValidator::new(config.rhythm_ratios.clone(), config.rhythm_tolerance),
    );
}

/// Dimension candidates carrying `role`.
fn dimensions_with_role(candidates: &[Token], role: TokenRole) -> impl Iterator<Item = (&Token, Dimension)> {
    candidates
        .iter()
        .filter(move |candidate| candidate.role == role)
        .filter_map(|candidate| candidate.value.as_dimension().map(|dimension| (candidate, dimension)))
}
