//! # Tessera
//!
//! Facade over the engine crates. An [`Engine`] owns its registries, domains
//! and event bus; create as many as you need, nothing is global.
//!
//! ```rust
//! use tessera::model::{ApplyOptions, ChangeSet, Rgb, TokenValue};
//! use tessera::{Engine, presets};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let engine = Engine::builder().build().unwrap();
//! presets::install_design_system(&engine).unwrap();
//!
//! let changes = ChangeSet::new().with("primary", TokenValue::Color(Rgb::from_hex("#1b365d").unwrap()));
//! let result = engine.apply_customization("color", changes, ApplyOptions::empty()).await.unwrap();
//! assert!(result.get("component").is_some());
//! # });
//! ```

mod engine;
mod error;
pub mod presets;
mod resolver_domain;

pub use crate::engine::{Engine, EngineBuilder, EngineInner};
pub use crate::error::{EngineError, EngineErrorExt};
pub use crate::resolver_domain::ResolverDomain;

pub use tessera_constraints as constraints;
pub use tessera_domains as domains;
pub use tessera_events as events;
pub use tessera_kernel as kernel;
pub use tessera_model as model;
pub use tessera_resolver as resolver;
