use super::dimensions_with_role;
use tessera_model::constants::VISUAL_RHYTHM;
use tessera_model::{Correction, Severity, Token, TokenCategory, TokenRole, TokenValue, ValidationResult, Violation};
use tessera_resolver::{ConstraintValidator, RuleError};

/// Keeps spacing candidates on a ratio scale of the base spacing unit.
#[derive(Debug, Clone)]
pub struct RhythmValidator {
    ratios: Vec<f64>,
    tolerance: f64,
}

impl RhythmValidator {
    #[must_use]
    pub const fn new(ratios: Vec<f64>, tolerance: f64) -> Self {
        Self { ratios, tolerance }
    }

    /// Preferred ratio closest to `ratio`.
    #[must_use]
    pub fn nearest_ratio(&self, ratio: f64) -> Option<f64> {
        self.ratios.iter().copied().min_by(|a, b| (a - ratio).abs().total_cmp(&(b - ratio).abs()))
    }
}

impl ConstraintValidator for RhythmValidator {
    fn category(&self) -> Option<TokenCategory> {
        Some(TokenCategory::Dimension)
    }

    fn validate(&self, base: &Token, candidates: &[Token]) -> Result<ValidationResult, RuleError> {
        let base_px = base.value.as_px().ok_or(RuleError::CategoryMismatch {
            expected: TokenCategory::Dimension,
            actual: base.category(),
            context: Some(VISUAL_RHYTHM.into()),
        })?;
        if base_px <= 0.0 {
            return Err(RuleError::InvalidValue {
                message: format!("base spacing `{}` must be positive, got {}", base.name, base.value).into(),
                context: Some(VISUAL_RHYTHM.into()),
            });
        }

        let mut result = ValidationResult::passed();
        for (candidate, size) in dimensions_with_role(candidates, TokenRole::Spacing) {
            let ratio = size.to_px() / base_px;
            let Some(nearest) = self.nearest_ratio(ratio) else { break };
            if (ratio - nearest).abs() <= self.tolerance {
                continue;
            }

            result.push(
                Violation::new(
                    VISUAL_RHYTHM,
                    Some(candidate.name.as_str()),
                    format!("`{}` is {ratio:.2}× the base spacing, off the rhythm scale", candidate.name),
                    Severity::Warning,
                ),
                Some(Correction::new(
                    candidate.name.as_str(),
                    TokenValue::Dimension(size.with_px(base_px * nearest)),
                    format!("snapped to {nearest}× the base spacing"),
                )),
            );
        }
        Ok(result)
    }
}
