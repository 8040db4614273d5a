//! # Resolver
//!
//! The token-level half of the engine: registries for tokens, relationships,
//! generators, affect rules and constraint validators, the dependency graph
//! that guards against cycles, and the [`Resolver`] that turns one token change
//! into an ordered list of [`TokenUpdate`](tessera_model::TokenUpdate) records.
//!
//! ```rust
//! use tessera_model::{Relationship, Rgb, TokenCategory, TokenValue};
//! use tessera_resolver::{Registries, Resolver, generator_fn};
//!
//! let registries = Registries::new();
//! registries.generators.register(
//!     "primary-inverse",
//!     generator_fn(TokenCategory::Color, TokenCategory::Color, |base| {
//!         let rgb = base.as_color().unwrap_or(Rgb::BLACK);
//!         Ok(TokenValue::Color(Rgb::new(255 - rgb.r, 255 - rgb.g, 255 - rgb.b)))
//!     }),
//! );
//! registries
//!     .relationships
//!     .register("primary", Relationship::new("color").generates(["primary-inverse"]))
//!     .unwrap();
//!
//! let resolver = Resolver::new(registries);
//! let resolution = resolver.resolve("primary", TokenValue::Color(Rgb::WHITE)).unwrap();
//! assert_eq!(resolution.value_of("primary-inverse"), Some(&TokenValue::Color(Rgb::BLACK)));
//! ```

pub mod affect;
pub mod catalog;
mod error;
pub mod generator;
pub mod graph;
pub mod registry;
pub mod resolver;
mod rule_error;
pub mod validator;

pub use crate::affect::{AffectRule, AffectRuleRegistry, affect_fn};
pub use crate::catalog::TokenCatalog;
pub use crate::error::{ResolverError, ResolverErrorExt};
pub use crate::generator::{Generator, GeneratorRegistry, generator_fn};
pub use crate::graph::DependencyGraph;
pub use crate::registry::{Registries, RelationshipRegistry};
pub use crate::resolver::Resolver;
pub use crate::rule_error::{RuleError, RuleErrorExt};
pub use crate::validator::{ConstraintValidator, ValidatorRegistry, validator_fn};
