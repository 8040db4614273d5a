use super::dimensions_with_role;
use tessera_model::constants::TOUCH_TARGET;
use tessera_model::{Correction, Severity, Token, TokenCategory, TokenRole, TokenValue, ValidationResult, Violation};
use tessera_resolver::{ConstraintValidator, RuleError};

/// Minimum size of interactive elements.
#[derive(Debug, Clone)]
pub struct TouchTargetValidator {
    minimum: f64,
}

impl TouchTargetValidator {
    #[must_use]
    pub const fn new(minimum: f64) -> Self {
        Self { minimum }
    }
}

impl ConstraintValidator for TouchTargetValidator {
    fn category(&self) -> Option<TokenCategory> {
        Some(TokenCategory::Dimension)
    }

    fn validate(&self, _base: &Token, candidates: &[Token]) -> Result<ValidationResult, RuleError> {
        let mut result = ValidationResult::passed();

        for (candidate, size) in dimensions_with_role(candidates, TokenRole::InteractiveSize) {
            if size.to_px() >= self.minimum {
                continue;
            }
            result.push(
                Violation::new(
                    TOUCH_TARGET,
                    Some(candidate.name.as_str()),
                    format!("`{}` is {size}, below the {}px touch target", candidate.name, self.minimum),
                    Severity::Error,
                ),
                Some(Correction::new(
                    candidate.name.as_str(),
                    TokenValue::Dimension(size.with_px(self.minimum)),
                    "raised to the minimum touch target",
                )),
            );
        }
        Ok(result)
    }
}
