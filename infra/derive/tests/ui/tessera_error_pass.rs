use std::borrow::Cow;
use tessera_derive::tessera_error;

#[tessera_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err(std::io::Error::other("disk gone")).context("Reading token file")
}

fn main() {
    let err = read().unwrap_err();
    assert!(err.to_string().contains("Reading token file"));

    let internal: DemoError = "unexpected".into();
    assert_eq!(internal.kind(), "internal");
}
