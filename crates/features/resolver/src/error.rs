use std::borrow::Cow;

/// A specialized [`ResolverError`] enum of this crate.
#[tessera_derive::tessera_error]
pub enum ResolverError {
    /// Registration rejected: empty names, duplicates or overlapping lists.
    #[error("Invalid relationship{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The changed token can reach itself through the dependency graph.
    #[error("Circular dependency{}: {}", format_context(.context), .path.join(" -> "))]
    CircularDependency { token: String, path: Vec<String>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal resolver error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
