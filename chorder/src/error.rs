use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input error: {0}")]
    Input(String),
    #[error("fetch error: {0}")]
    Fetch(BoxError),
    /// A dump line that fits none of the known line shapes.
    #[error("unrecognized dump line: {0:?}")]
    Format(String),
    #[error("malformed dump structure: {0}")]
    Structure(String),
    #[error("circular dependency detected among {} statements", .remaining.len())]
    Cycle { remaining: Vec<String> },
}

impl From<kdl::KdlError> for Error {
    fn from(err: kdl::KdlError) -> Self {
        Error::Parse(err.to_string())
    }
}

pub fn format_for_tests(err: &Error) -> String {
    let mut rendered = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        rendered.push_str("\ncaused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
