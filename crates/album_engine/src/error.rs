use thiserror::Error;

use crate::persist::PersistError;
use crate::{FailureKind, FetchError};

/// Failure class of an [`ExportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Network,
    Api,
    Decode,
    Output,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("configuration error: {key}: {message}")]
    Configuration { key: &'static str, message: String },
    #[error("network error: {0}")]
    Network(FetchError),
    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("output error: {0}")]
    Output(#[from] PersistError),
}

impl ExportError {
    pub(crate) fn configuration(key: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            key,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ExportError::Configuration { .. } => ErrorKind::Configuration,
            ExportError::Network(_) => ErrorKind::Network,
            ExportError::Api { .. } => ErrorKind::Api,
            ExportError::Decode(_) => ErrorKind::Decode,
            ExportError::Output(_) => ErrorKind::Output,
        }
    }
}

impl From<FetchError> for ExportError {
    fn from(err: FetchError) -> Self {
        match err.kind {
            FailureKind::Api { code } => ExportError::Api {
                code,
                message: err.message,
            },
            FailureKind::Decode => ExportError::Decode(err.message),
            _ => ExportError::Network(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failures_map_to_error_classes() {
        let api: ExportError = FetchError::new(FailureKind::Api { code: 401 }, "login").into();
        assert_eq!(api.kind(), ErrorKind::Api);
        assert_eq!(api.to_string(), "api error 401: login");

        let decode: ExportError = FetchError::new(FailureKind::Decode, "eof").into();
        assert_eq!(decode.kind(), ErrorKind::Decode);

        let status: ExportError = FetchError::new(FailureKind::HttpStatus(503), "busy").into();
        assert_eq!(status.kind(), ErrorKind::Network);
        assert_eq!(status.to_string(), "network error: http status 503: busy");
    }
}
