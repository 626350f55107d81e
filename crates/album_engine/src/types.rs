use std::fmt;
use std::path::PathBuf;

use album_core::StopReason;

use crate::ErrorKind;

/// Parameters of one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub album_id: String,
    pub last_rank: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    Started {
        album_id: String,
        output_dir: PathBuf,
    },
    FetchingPage {
        page: u32,
        last_rank: i64,
    },
    TargetResolved {
        path: PathBuf,
    },
    PostsWritten {
        page: u32,
        count: usize,
        total: usize,
    },
    Failed {
        kind: ErrorKind,
        message: String,
    },
    Finished {
        output_path: Option<PathBuf>,
        posts_written: usize,
        stop: StopReason,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    /// Well-formed response carrying a non-success `ec` code.
    Api { code: i64 },
    /// Body is not JSON or lacks the status field.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Api { code } => write!(f, "api error {code}"),
            FailureKind::Decode => write!(f, "decode error"),
        }
    }
}
