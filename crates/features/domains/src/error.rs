use std::borrow::Cow;

#[tessera_derive::tessera_error]
pub enum DomainError {
    #[error("Invalid domain config{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Domain '{domain}' depends on unregistered '{dependency}'{}", format_context(.context))]
    UnmetDependency { domain: String, dependency: String, context: Option<Cow<'static, str>> },

    #[error("Unknown domain '{domain}'{}", format_context(.context))]
    UnknownDomain { domain: String, context: Option<Cow<'static, str>> },

    #[error("Domain '{domain}' did not finish within {timeout_ms}ms{}", format_context(.context))]
    Timeout { domain: String, timeout_ms: u64, context: Option<Cow<'static, str>> },

    #[error("Domain '{domain}' failed to apply{}: {message}", format_context(.context))]
    Apply { domain: String, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Change set serialization error{}: {source}", format_context(.context))]
    Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Domain error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl DomainError {
    /// Failure raised by an applier for `domain`.
    #[must_use]
    pub fn apply(domain: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Apply { domain: domain.into(), message: message.into(), context: None }
    }
}
