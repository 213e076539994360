#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("id cannot be empty")]
    EmptyId,
    #[error("failed to validate EmailAddress: {0:?} is not a valid email address")]
    InvalidEmailAddress(String),
    #[error("failed to parse request body: {0}")]
    MalformedBody(String),
    #[error("{0} must be a string")]
    NotAString(&'static str),
}
