use crate::validation::ValidationResult;
use crate::value::TokenValue;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Why a record is part of a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UpdateOrigin {
    Direct,
    Generated { from: String },
    Affected { by: String },
}

/// One record of a resolution result, ready for a CSS custom property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUpdate {
    pub name: String,
    pub value: TokenValue,
    pub css_variable: String,
    pub origin: UpdateOrigin,
    #[serde(default)]
    pub constraint_corrected: bool,
}

impl TokenUpdate {
    #[must_use]
    pub fn generated_from(&self) -> Option<&str> {
        match &self.origin {
            UpdateOrigin::Generated { from } => Some(from),
            _ => None,
        }
    }

    #[must_use]
    pub fn affected_by(&self) -> Option<&str> {
        match &self.origin {
            UpdateOrigin::Affected { by } => Some(by),
            _ => None,
        }
    }
}

/// Pipeline step where an isolated failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureStage {
    Generation,
    Affecting,
    Validation,
    Correction,
}

impl Display for FailureStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Generation => "generation",
            Self::Affecting => "affecting",
            Self::Validation => "validation",
            Self::Correction => "correction",
        })
    }
}

/// A generator, rule or validator that failed without aborting the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    pub stage: FailureStage,
    pub subject: String,
    pub message: String,
}

impl ItemFailure {
    #[must_use]
    pub fn new(stage: FailureStage, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self { stage, subject: subject.into(), message: message.into() }
    }
}

/// Output of resolving one changed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub token: String,
    pub updates: Vec<TokenUpdate>,
    pub validation: ValidationResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ItemFailure>,
}

impl Resolution {
    #[must_use]
    pub fn empty(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            updates: Vec::new(),
            validation: ValidationResult::passed(),
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TokenUpdate> {
        self.updates.iter().find(|u| u.name == name)
    }

    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<&TokenValue> {
        self.get(name).map(|u| &u.value)
    }
}
