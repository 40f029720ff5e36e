use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StageError {
    /// Input that cannot act as a record or as a key list.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid stage config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type StageResult<T> = Result<T, StageError>;

impl StageError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        StageError::InvalidArgument(what.into())
    }
}

pub(crate) fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
