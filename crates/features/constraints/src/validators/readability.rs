use super::dimensions_with_role;
use tessera_model::constants::TYPOGRAPHY_READABILITY;
use tessera_model::{Correction, Severity, Token, TokenCategory, TokenRole, TokenValue, ValidationResult, Violation};
use tessera_resolver::{ConstraintValidator, RuleError};

/// Font-size floor. Sizes under `minimum` are errors clamped up to it; sizes
/// between `minimum` and `optimal` only get a note.
#[derive(Debug, Clone)]
pub struct ReadabilityValidator {
    minimum: f64,
    optimal: f64,
}

impl ReadabilityValidator {
    #[must_use]
    pub const fn new(minimum: f64, optimal: f64) -> Self {
        Self { minimum, optimal }
    }
}

impl ConstraintValidator for ReadabilityValidator {
    fn category(&self) -> Option<TokenCategory> {
        Some(TokenCategory::Dimension)
    }

    fn validate(&self, _base: &Token, candidates: &[Token]) -> Result<ValidationResult, RuleError> {
        let mut result = ValidationResult::passed();

        for (candidate, size) in dimensions_with_role(candidates, TokenRole::FontSize) {
            let px = size.to_px();
            if px < self.minimum {
                result.push(
                    Violation::new(
                        TYPOGRAPHY_READABILITY,
                        Some(candidate.name.as_str()),
                        format!("`{}` is {size}, below the {}px minimum", candidate.name, self.minimum),
                        Severity::Error,
                    ),
                    Some(Correction::new(
                        candidate.name.as_str(),
                        TokenValue::Dimension(size.with_px(self.minimum)),
                        "clamped to the readable minimum",
                    )),
                );
            } else if px < self.optimal {
                result.push(
                    Violation::new(
                        TYPOGRAPHY_READABILITY,
                        Some(candidate.name.as_str()),
                        format!("`{}` is {size}, under the {}px optimum for body text", candidate.name, self.optimal),
                        Severity::Info,
                    ),
                    None,
                );
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_model::Dimension;

    fn font(name: &str, dimension: Dimension) -> Token {
        Token::direct(name, TokenValue::Dimension(dimension), TokenRole::FontSize)
    }

    #[test]
    fn small_sizes_are_clamped_in_their_unit() {
        let validator = ReadabilityValidator::new(14.0, 16.0);
        let base = font("font-size-base", Dimension::px(16.0));
        let result = validator
            .validate(&base, &[font("font-size-xs", Dimension::rem(0.5)), font("font-size-sm", Dimension::px(15.0))])
            .unwrap();

        assert!(!result.valid);
        assert_eq!(result.violations.len(), 2);
        assert_eq!(result.violations[1].severity, Severity::Info);
        assert_eq!(result.corrections.len(), 1);
        assert_eq!(result.corrections[0].value, TokenValue::Dimension(Dimension::rem(0.875)));
    }

    #[test]
    fn comfortable_sizes_pass() {
        let validator = ReadabilityValidator::new(14.0, 16.0);
        let base = font("font-size-base", Dimension::px(16.0));
        let result = validator.validate(&base, &[font("font-size-lg", Dimension::px(20.0))]).unwrap();
        assert_eq!(result, ValidationResult::passed());
    }
}
