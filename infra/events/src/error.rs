use std::borrow::Cow;

/// Errors that can occur while building the event bus.
#[tessera_derive::tessera_error]
pub enum EventBusError {
    /// Capacity must be greater than zero for the broadcast channel.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
