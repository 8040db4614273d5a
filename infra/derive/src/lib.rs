#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the engine crates.
//! Every feature and infrastructure crate describes its failures with the same
//! error shape, and this crate removes the boilerplate that shape requires.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! tessera-derive.workspace = true
//! thiserror.workspace = true
//! ```
//!
//! The examples below are `ignore`d because a proc-macro crate cannot use its
//! own macros in doctests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for engine error enums.
///
/// Turns a plain enum into an error type that plugs into the workspace error
/// conventions.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * A `Result<T>` alias in the same module.
/// * An `<ErrorName>Ext` trait adding `.context(..)` to `Result<T, ErrorName>` and,
///   for every variant with a `source` field, to `Result<T, SourceError>`.
/// * `From<SourceError>` for every variant with a `source` field.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * `fn kind(&self) -> &'static str` returning the kebab-case variant name
///   (`CircularDependency` becomes `"circular-dependency"`), used as a stable tag
///   in logs, events and validation reports.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. Context-capable variants declare `context: Option<Cow<'static, str>>`.
/// 3. Variants wrapping another error declare a `source` field (or mark one with
///    `#[source]`/`#[from]`) and must also declare `context`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[tessera_derive::tessera_error]
/// pub enum DomainError {
///     #[error("Unmet dependency{}: {message}", format_context(.context))]
///     UnmetDependency { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Serialization failed{}: {source}", format_context(.context))]
///     Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },
/// }
///
/// fn cache_key(changes: &ChangeSet) -> Result<String> {
///     serde_json::to_string(changes).context("Canonical change-set key")
/// }
/// ```
#[proc_macro_attribute]
pub fn tessera_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
