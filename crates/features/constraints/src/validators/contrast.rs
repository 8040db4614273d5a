use crate::color::{best_text_color, contrast_ratio, mix};
use tessera_model::{Correction, Rgb, Severity, Token, TokenCategory, TokenRole, TokenValue, ValidationResult, Violation};
use tessera_resolver::{ConstraintValidator, RuleError};

const STEPS: u32 = 100;

/// WCAG contrast between a surface and the text drawn on it.
///
/// A surface-like base (background, surface, accent, generic) is checked
/// against text candidates; a text base against background and surface
/// candidates.
#[derive(Debug, Clone)]
pub struct ContrastValidator {
    id: &'static str,
    minimum: f64,
}

impl ContrastValidator {
    #[must_use]
    pub const fn new(id: &'static str, minimum: f64) -> Self {
        Self { id, minimum }
    }

    #[must_use]
    pub const fn minimum(&self) -> f64 {
        self.minimum
    }

    /// Closest colour to `color`, moving toward black or white, that reaches the
    /// minimum against `against`. Falls back to the better of black and white
    /// when no shade does.
    #[must_use]
    pub fn correct(&self, color: Rgb, against: Rgb) -> Rgb {
        let reach = |target: Rgb| {
            (1..=STEPS).find_map(|step| {
                let shade = mix(color, target, f64::from(step) / f64::from(STEPS));
                (contrast_ratio(shade, against) >= self.minimum).then_some((step, shade))
            })
        };

        match (reach(Rgb::BLACK), reach(Rgb::WHITE)) {
            (Some((dark_step, dark)), Some((light_step, light))) => {
                if dark_step <= light_step { dark } else { light }
            },
            (Some((_, shade)), None) | (None, Some((_, shade))) => shade,
            (None, None) => best_text_color(against),
        }
    }

    fn opposite_roles(role: TokenRole) -> &'static [TokenRole] {
        match role {
            TokenRole::Text => &[TokenRole::Background, TokenRole::Surface],
            TokenRole::Background | TokenRole::Surface | TokenRole::Accent | TokenRole::Generic => {
                &[TokenRole::Text]
            },
            _ => &[],
        }
    }
}

impl ConstraintValidator for ContrastValidator {
    fn category(&self) -> Option<TokenCategory> {
        Some(TokenCategory::Color)
    }

    fn validate(&self, base: &Token, candidates: &[Token]) -> Result<ValidationResult, RuleError> {
        let base_color = base.value.as_color().ok_or(RuleError::CategoryMismatch {
            expected: TokenCategory::Color,
            actual: base.category(),
            context: Some(self.id.into()),
        })?;
        let roles = Self::opposite_roles(base.role);

        let mut result = ValidationResult::passed();
        for candidate in candidates.iter().filter(|c| roles.contains(&c.role)) {
            let Some(color) = candidate.value.as_color() else { continue };

            let ratio = contrast_ratio(base_color, color);
            if ratio >= self.minimum {
                continue;
            }

            let corrected = self.correct(color, base_color);
            result.push(
                Violation::new(
                    self.id,
                    Some(candidate.name.as_str()),
                    format!(
                        "contrast {ratio:.2}:1 between `{}` and `{}` is below {}:1",
                        base.name, candidate.name, self.minimum
                    ),
                    Severity::Error,
                ),
                Some(Correction::new(
                    candidate.name.as_str(),
                    TokenValue::Color(corrected),
                    format!(
                        "adjusted to {corrected} for {:.2}:1 contrast",
                        contrast_ratio(base_color, corrected)
                    ),
                )),
            );
        }
        Ok(result)
    }
}
