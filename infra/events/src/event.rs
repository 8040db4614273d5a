use serde::Serialize;
use std::sync::Arc;
use tessera_model::{ApplyOptions, CustomizationResult};

/// Everything the engine tells outbound collaborators (preview, persistence, audit).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EngineEvent {
    #[serde(rename_all = "camelCase")]
    DomainRegistered { domain: String, version: String, dependencies: Vec<String> },
    #[serde(rename_all = "camelCase")]
    TokenResolved { token: String, updates: usize, valid: bool },
    #[serde(rename_all = "camelCase")]
    CycleDetected { token: String, path: Vec<String> },
    CustomizationApplied(Arc<CustomizationApplied>),
}

impl EngineEvent {
    /// Short tag for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DomainRegistered { .. } => "domain-registered",
            Self::TokenResolved { .. } => "token-resolved",
            Self::CycleDetected { .. } => "cycle-detected",
            Self::CustomizationApplied(_) => "customization-applied",
        }
    }
}

/// A finished `apply_customization` run, with the caller's options so that
/// preview and persistence collaborators can honour their skip flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationApplied {
    pub result: Arc<CustomizationResult>,
    pub options: ApplyOptions,
}

impl CustomizationApplied {
    #[must_use]
    pub const fn wants_preview(&self) -> bool {
        !self.options.contains(ApplyOptions::SKIP_PREVIEW)
    }

    #[must_use]
    pub const fn wants_persist(&self) -> bool {
        !self.options.contains(ApplyOptions::SKIP_PERSIST)
    }
}
