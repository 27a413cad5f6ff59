use thiserror::Error;

/// Why a question-bank request produced no usable payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("question service answered HTTP {0}")]
    Status(u16),
    #[error("question service unreachable: {0}")]
    Transport(String),
    #[error("question payload malformed: {0}")]
    Decode(String),
    #[error("question payload has no usable entries")]
    Empty,
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("session config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("session config field `{field}` is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_read_like_log_lines() {
        assert_eq!(FetchError::Status(503).to_string(), "question service answered HTTP 503");
        let decode: FetchError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(decode, FetchError::Decode(_)));
    }
}
