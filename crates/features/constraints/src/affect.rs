//! Default affect rules: the three role pairings the engine understands out of the box.

use crate::color::best_text_color;
use tessera_model::{Dimension, Token, TokenCategory, TokenRole, TokenSpec, TokenValue};
use tessera_resolver::{AffectRuleRegistry, RuleError, affect_fn};

/// Multiplier from a spacing unit to a comfortable interactive size (16px → 44px).
pub const INTERACTIVE_SPACING_FACTOR: f64 = 2.75;

/// Registers every default rule.
pub fn install(rules: &AffectRuleRegistry) {
    for surface in [TokenRole::Background, TokenRole::Surface, TokenRole::Accent] {
        rules.register(TokenRole::Text, surface, affect_fn(contrast_safe_text));
    }
    rules.register(TokenRole::LineHeight, TokenRole::FontSize, affect_fn(optimal_line_height));
    rules.register(TokenRole::InteractiveSize, TokenRole::Spacing, affect_fn(interactive_size));
}

/// Black or white text, whichever reads better on the base colour.
///
/// # Errors
/// The base must be a colour.
pub fn contrast_safe_text(base: &Token, _: &TokenSpec) -> Result<TokenValue, RuleError> {
    let background = base.value.as_color().ok_or(RuleError::CategoryMismatch {
        expected: TokenCategory::Color,
        actual: base.category(),
        context: Some("contrast-safe text".into()),
    })?;
    Ok(TokenValue::Color(best_text_color(background)))
}

/// Unitless line height: `clamp(1.6 − (px − 16) · 0.0125, 1.1, 1.7)`, two decimals.
///
/// # Errors
/// The base must be a dimension.
pub fn optimal_line_height(base: &Token, _: &TokenSpec) -> Result<TokenValue, RuleError> {
    let px = base_px(base, "line height")?;
    let ratio = (px - 16.0).mul_add(-0.0125, 1.6).clamp(1.1, 1.7);
    Ok(TokenValue::Number((ratio * 100.0).round() / 100.0))
}

/// Interactive size derived from a spacing unit, in the spacing's unit.
///
/// # Errors
/// The base must be a dimension.
pub fn interactive_size(base: &Token, _: &TokenSpec) -> Result<TokenValue, RuleError> {
    let spacing = base_dimension(base, "interactive size")?;
    Ok(TokenValue::Dimension(spacing.scaled(INTERACTIVE_SPACING_FACTOR)))
}

fn base_dimension(base: &Token, rule: &'static str) -> Result<Dimension, RuleError> {
    base.value.as_dimension().ok_or(RuleError::CategoryMismatch {
        expected: TokenCategory::Dimension,
        actual: base.category(),
        context: Some(rule.into()),
    })
}

fn base_px(base: &Token, rule: &'static str) -> Result<f64, RuleError> {
    base_dimension(base, rule).map(Dimension::to_px)
}
