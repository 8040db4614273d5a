use crate::change::ChangeSet;
use crate::update::{ItemFailure, TokenUpdate};
use crate::validation::ValidationResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// What a domain applier produces for one change set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainOutput {
    pub updates: Vec<TokenUpdate>,
    /// Named output forwarded to dependent domains.
    pub semantic: ChangeSet,
    pub validation: ValidationResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ItemFailure>,
}

impl DomainOutput {
    #[must_use]
    pub fn update(&self, name: &str) -> Option<&TokenUpdate> {
        self.updates.iter().find(|u| u.name == name)
    }
}

/// One entry of the customization result tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResult {
    pub domain: String,
    pub version: String,
    /// Served from the per-domain cache.
    pub cached: bool,
    pub output: Arc<DomainOutput>,
}

impl DomainResult {
    #[must_use]
    pub fn updates(&self) -> &[TokenUpdate] {
        &self.output.updates
    }

    #[must_use]
    pub fn semantic(&self) -> &ChangeSet {
        &self.output.semantic
    }

    #[must_use]
    pub fn update(&self, name: &str) -> Option<&TokenUpdate> {
        self.output.update(name)
    }
}

/// Aggregated outcome of `apply_customization`, keyed by domain name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationResult {
    pub run_id: String,
    pub source: String,
    pub domains: BTreeMap<String, DomainResult>,
    /// Dependents that were reached but not applied, with the reason.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub skipped: BTreeMap<String, String>,
}

impl CustomizationResult {
    #[must_use]
    pub fn get(&self, domain: &str) -> Option<&DomainResult> {
        self.domains.get(domain)
    }

    /// `true` when every applied domain passed validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.domains.values().all(|d| d.output.validation.valid)
    }
}
