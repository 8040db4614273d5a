use crate::constants::SYSTEM_ERROR;
use crate::value::TokenValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One failed (or noteworthy) check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub constraint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub message: String,
    pub severity: Severity,
}

impl Violation {
    #[must_use]
    pub fn new(
        constraint: impl Into<String>,
        token: Option<&str>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            constraint: constraint.into(),
            token: token.map(str::to_owned),
            message: message.into(),
            severity,
        }
    }
}

/// A replacement value proposed by a validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    pub token: String,
    pub value: TokenValue,
    pub reason: String,
}

impl Correction {
    #[must_use]
    pub fn new(token: impl Into<String>, value: TokenValue, reason: impl Into<String>) -> Self {
        Self { token: token.into(), value, reason: reason.into() }
    }
}

/// Outcome of running one or more validators.
///
/// `valid` is false as soon as any [`Severity::Error`] violation is recorded;
/// warnings and notes leave it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default)]
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub corrections: Vec<Correction>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::passed()
    }
}

impl ValidationResult {
    #[must_use]
    pub const fn passed() -> Self {
        Self { valid: true, violations: Vec::new(), corrections: Vec::new() }
    }

    /// Invalid result carrying a single `system-error` violation.
    #[must_use]
    pub fn system_error(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            violations: vec![Violation::new(SYSTEM_ERROR, None, message, Severity::Error)],
            corrections: Vec::new(),
        }
    }

    pub fn push(&mut self, violation: Violation, correction: Option<Correction>) {
        if violation.severity == Severity::Error {
            self.valid = false;
        }
        self.violations.push(violation);
        self.corrections.extend(correction);
    }

    /// Folds `other` into `self`, keeping order.
    pub fn merge(&mut self, other: Self) {
        self.valid &= other.valid;
        self.violations.extend(other.violations);
        self.corrections.extend(other.corrections);
    }

    #[must_use]
    pub fn is_system_error(&self) -> bool {
        self.violations.iter().any(|v| v.constraint == SYSTEM_ERROR)
    }

    /// Violations reported for `constraint`.
    pub fn violations_of<'a>(&'a self, constraint: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.constraint == constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_do_not_invalidate() {
        let mut result = ValidationResult::passed();
        result.push(Violation::new("color-harmony", Some("primary"), "off-anchor", Severity::Warning), None);
        assert!(result.valid);

        result.push(Violation::new("contrast-aa", Some("text"), "too low", Severity::Error), None);
        assert!(!result.valid);
    }

    #[test]
    fn merge_is_conjunctive() {
        let mut result = ValidationResult::passed();
        result.merge(ValidationResult::system_error("boom"));
        assert!(!result.valid);
        assert!(result.is_system_error());
        assert_eq!(result.violations_of(SYSTEM_ERROR).count(), 1);
    }
}
