use thiserror::Error;

/// Short tag identifying which stage of the pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Lookup,
    Fetch,
    Parse,
    FieldMissing,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Lookup => "lookup",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Parse => "parse",
            ErrorKind::FieldMissing => "field_missing",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way a temperature lookup can fail.
///
/// `Display` keeps the diagnostic detail and is meant for logs. What the
/// caller of the tool gets to see is [`TemperatureError::user_message`].
#[derive(Debug, Error)]
pub enum TemperatureError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("geocoding failed: {0}")]
    Lookup(String),

    #[error("forecast request failed: {0}")]
    Fetch(String),

    #[error("malformed forecast payload: {0}")]
    Parse(String),

    #[error("field `{0}` missing from forecast payload")]
    FieldMissing(&'static str),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl TemperatureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TemperatureError::Validation(_) => ErrorKind::Validation,
            TemperatureError::Lookup(_) => ErrorKind::Lookup,
            TemperatureError::Fetch(_) => ErrorKind::Fetch,
            TemperatureError::Parse(_) => ErrorKind::Parse,
            TemperatureError::FieldMissing(_) => ErrorKind::FieldMissing,
            TemperatureError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Message reported to the tool caller.
    ///
    /// Only validation failures expose their detail; every other kind maps to
    /// a fixed string.
    pub fn user_message(&self) -> String {
        match self {
            TemperatureError::Validation(detail) => format!("invalid input: {detail}"),
            TemperatureError::Lookup(_) => "lookup/parse failure".to_string(),
            TemperatureError::Fetch(_) => "weather fetch failure".to_string(),
            TemperatureError::Parse(_) => "weather data parse failure".to_string(),
            TemperatureError::FieldMissing(_) => "current temperature unavailable".to_string(),
            TemperatureError::Unexpected(_) => "unexpected error".to_string(),
        }
    }
}
