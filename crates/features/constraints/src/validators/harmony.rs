use crate::color::{Hsl, hue_offset, rotate_hue};
use tessera_model::constants::COLOR_HARMONY;
use tessera_model::{Correction, Severity, Token, TokenCategory, TokenRole, TokenValue, ValidationResult, Violation};
use tessera_resolver::{ConstraintValidator, RuleError};

const ANCHOR_STEP: f64 = 30.0;
const CHECKED_ROLES: [TokenRole; 4] =
    [TokenRole::Accent, TokenRole::Border, TokenRole::Surface, TokenRole::Background];

/// Hue relationships between the base colour and palette candidates.
///
/// Offsets within `tolerance` of a multiple of 30° are harmonious. Anything
/// else is a warning with a correction rotating the candidate onto the nearest
/// anchor. Greys have no hue and are never checked.
#[derive(Debug, Clone)]
pub struct HarmonyValidator {
    tolerance: f64,
}

impl HarmonyValidator {
    #[must_use]
    pub const fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Nearest anchor for a hue offset in `[0, 360)`.
    #[must_use]
    pub fn nearest_anchor(offset: f64) -> f64 {
        ((offset / ANCHOR_STEP).round() * ANCHOR_STEP).rem_euclid(360.0)
    }

    #[must_use]
    pub fn is_harmonious(&self, offset: f64) -> bool {
        let anchor = Self::nearest_anchor(offset);
        let distance = (offset - anchor).abs();
        distance.min(360.0 - distance) < self.tolerance
    }

    /// Name of the scheme an anchor belongs to.
    #[must_use]
    pub fn scheme(anchor: f64) -> &'static str {
        match anchor.round() as u16 {
            30 | 330 => "analogous",
            120 | 240 => "triadic",
            180 => "complementary",
            _ => "harmonic",
        }
    }
}

impl ConstraintValidator for HarmonyValidator {
    fn category(&self) -> Option<TokenCategory> {
        Some(TokenCategory::Color)
    }

    fn validate(&self, base: &Token, candidates: &[Token]) -> Result<ValidationResult, RuleError> {
        let base_color = base.value.as_color().ok_or(RuleError::CategoryMismatch {
            expected: TokenCategory::Color,
            actual: base.category(),
            context: Some(COLOR_HARMONY.into()),
        })?;

        let mut result = ValidationResult::passed();
        if Hsl::from_rgb(base_color).is_achromatic() {
            return Ok(result);
        }

        for candidate in candidates.iter().filter(|c| CHECKED_ROLES.contains(&c.role)) {
            let Some(color) = candidate.value.as_color() else { continue };
            if Hsl::from_rgb(color).is_achromatic() {
                continue;
            }

            let offset = hue_offset(base_color, color);
            if self.is_harmonious(offset) {
                continue;
            }

            let anchor = Self::nearest_anchor(offset);
            let mut shift = anchor - offset;
            if shift > 180.0 {
                shift -= 360.0;
            } else if shift < -180.0 {
                shift += 360.0;
            }
            let corrected = rotate_hue(color, shift);
            let scheme = Self::scheme(anchor);

            result.push(
                Violation::new(
                    COLOR_HARMONY,
                    Some(candidate.name.as_str()),
                    format!("hue of `{}` is {offset:.1}° from `{}`, off every harmony anchor", candidate.name, base.name),
                    Severity::Warning,
                ),
                Some(Correction::new(
                    candidate.name.as_str(),
                    TokenValue::Color(corrected),
                    format!("rotated onto the {scheme} anchor at {anchor}°"),
                )),
            );
        }
        Ok(result)
    }
}
