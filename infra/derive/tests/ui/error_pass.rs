use autoims_derive::autoims_error;
use std::borrow::Cow;

#[autoims_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Record not found")]
    NotFound,

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err(std::io::Error::other("disk")).context("reading schema")
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.to_string(), "IO error (reading schema): disk");

    let internal: DemoError = "boom".into();
    assert_eq!(internal.to_string(), "Internal error: boom");
    assert_eq!(DemoError::NotFound.to_string(), "Record not found");
}
