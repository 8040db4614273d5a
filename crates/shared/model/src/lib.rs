//! # Engine Models
//!
//! Pure data types shared by every engine crate, with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, no registries, no resolution logic. Just tokens, typed values and
//! the records that flow between the resolver, the domain layer and outbound collaborators.

pub mod change;
pub mod config;
pub mod constants;
pub mod customization;
pub mod options;
pub mod relationship;
pub mod token;
pub mod update;
pub mod validation;
pub mod value;

pub use change::ChangeSet;
pub use config::{ConstraintConfig, EngineConfig};
pub use customization::{CustomizationResult, DomainOutput, DomainResult};
pub use options::ApplyOptions;
pub use relationship::Relationship;
pub use token::{Provenance, Token, TokenCategory, TokenRole, TokenSpec};
pub use update::{FailureStage, ItemFailure, Resolution, TokenUpdate, UpdateOrigin};
pub use validation::{Correction, Severity, ValidationResult, Violation};
pub use value::{Dimension, DimensionUnit, ParseValueError, Rgb, TokenValue};
