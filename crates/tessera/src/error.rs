use std::borrow::Cow;
use tessera_domains::DomainError;
use tessera_events::EventBusError;
use tessera_model::{FailureStage, ItemFailure};
use tessera_resolver::ResolverError;

/// Every failure an engine operation can report.
#[tessera_derive::tessera_error]
pub enum EngineError {
    /// Registration rejected: missing or malformed fields.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Domain '{domain}' depends on unregistered '{dependency}'{}", format_context(.context))]
    UnmetDependency { domain: String, dependency: String, context: Option<Cow<'static, str>> },

    #[error("Unknown domain '{domain}'{}", format_context(.context))]
    UnknownDomain { domain: String, context: Option<Cow<'static, str>> },

    /// Token-level cycle; nothing was resolved.
    #[error("Circular dependency{}: {}", format_context(.context), .path.join(" -> "))]
    CircularDependency { token: String, path: Vec<String>, context: Option<Cow<'static, str>> },

    /// A generator or affect rule failed during resolution.
    #[error("Generator '{subject}' failed{}: {message}", format_context(.context))]
    Generator { subject: String, message: String, context: Option<Cow<'static, str>> },

    /// A validator failed or proposed an unusable correction.
    #[error("Validator '{subject}' failed{}: {message}", format_context(.context))]
    Validator { subject: String, message: String, context: Option<Cow<'static, str>> },

    /// Unexpected failure inside the engine's own orchestration.
    #[error("System error{}: {message}", format_context(.context))]
    System { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Domain '{domain}' did not finish within {timeout_ms}ms{}", format_context(.context))]
    Timeout { domain: String, timeout_ms: u64, context: Option<Cow<'static, str>> },

    #[error("Domain '{domain}' failed to apply{}: {message}", format_context(.context))]
    Apply { domain: String, message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<ResolverError> for EngineError {
    fn from(err: ResolverError) -> Self {
        match err {
            ResolverError::InvalidConfig { message, context } => Self::InvalidConfig { message, context },
            ResolverError::CircularDependency { token, path, context } => {
                Self::CircularDependency { token, path, context }
            },
            ResolverError::Internal { message, context } => Self::System { message, context },
        }
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidConfig { message, context } => Self::InvalidConfig { message, context },
            DomainError::UnmetDependency { domain, dependency, context } => {
                Self::UnmetDependency { domain, dependency, context }
            },
            DomainError::UnknownDomain { domain, context } => Self::UnknownDomain { domain, context },
            DomainError::Timeout { domain, timeout_ms, context } => Self::Timeout { domain, timeout_ms, context },
            DomainError::Apply { domain, message, context } => Self::Apply { domain, message, context },
            DomainError::Serialize { source, context } => {
                Self::System { message: source.to_string().into(), context }
            },
            DomainError::Internal { message, context } => Self::System { message, context },
        }
    }
}

impl From<EventBusError> for EngineError {
    fn from(err: EventBusError) -> Self {
        match err {
            EventBusError::InvalidCapacity { message, context } => Self::InvalidConfig { message, context },
        }
    }
}

impl From<&ItemFailure> for EngineError {
    fn from(failure: &ItemFailure) -> Self {
        let (subject, message) = (failure.subject.clone(), failure.message.clone());
        match failure.stage {
            FailureStage::Generation | FailureStage::Affecting => {
                Self::Generator { subject, message, context: Some(failure.stage.to_string().into()) }
            },
            FailureStage::Validation | FailureStage::Correction => {
                Self::Validator { subject, message, context: Some(failure.stage.to_string().into()) }
            },
        }
    }
}
