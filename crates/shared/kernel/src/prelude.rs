pub use crate::config::load_config;
pub use crate::{run_id, safe_nanoid};
pub use tessera_model::config::{ConstraintConfig, EngineConfig};
pub use tessera_model::constants::*;
pub use tessera_model::{
    ApplyOptions, ChangeSet, Correction, CustomizationResult, Dimension, DomainOutput,
    DomainResult, FailureStage, ItemFailure, Relationship, Resolution, Rgb, Severity, Token,
    TokenCategory, TokenRole, TokenSpec, TokenUpdate, TokenValue, UpdateOrigin,
    ValidationResult, Violation,
};
