use std::borrow::Cow;

#[tessera_derive::tessera_error]
pub enum GraphError {
    #[error("Circular dependency{}: {message}", format_context(.context))]
    CircularDependency { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid relationship: {message}")]
    InvalidConfig { message: Cow<'static, str> },
}

fn main() {
    let cycle = GraphError::CircularDependency { message: "a -> b -> a".into(), context: None };
    assert_eq!(cycle.kind(), "circular-dependency");

    let tagged: Result<(), GraphError> = Err(cycle);
    let err = tagged.context("resolving a").unwrap_err();
    assert_eq!(err.to_string(), "Circular dependency (resolving a): a -> b -> a");

    let invalid = GraphError::InvalidConfig { message: "empty token".into() };
    assert_eq!(invalid.kind(), "invalid-config");
}
