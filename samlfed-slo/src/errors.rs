use std::{error::Error as StdError, fmt};

use backtrace::Backtrace;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Code {
    #[error(transparent)]
    Any(#[from] anyhow::Error),
    #[error("Not found. {0}")]
    NotFound(String),
    #[error("{service} call failed. {detail}")]
    Service {
        service: &'static str,
        detail: String,
    },
    #[error("Please recheck the input.see: {0}")]
    Validates(#[source] validator::ValidationErrors),
    #[error("Please recheck the input.see: {0}")]
    BadRequest(String),
    #[error("Timed out. {0}")]
    Timeout(String),
}

impl Code {
    /// Stable name for the error kind, logged as the `code` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Any(_) => "internal",
            Self::NotFound(_) => "not_found",
            Self::Service { .. } => "service",
            Self::Validates(_) => "invalid_input",
            Self::BadRequest(_) => "bad_request",
            Self::Timeout(_) => "timeout",
        }
    }
}

pub struct WithBacktrace {
    source: Code,
    backtrace: Backtrace,
}

impl WithBacktrace {
    pub fn code(&self) -> &'static str {
        self.source.code()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.source, Code::NotFound(_))
    }
}

impl fmt::Debug for WithBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithBacktrace")
            .field("source", &self.source)
            .field("backtrace", &self.backtrace)
            .finish()
    }
}

impl fmt::Display for WithBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl StdError for WithBacktrace {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.source)
    }
}

impl From<Code> for WithBacktrace {
    fn from(code: Code) -> Self {
        WithBacktrace {
            source: code,
            backtrace: Backtrace::new(),
        }
    }
}

impl PartialEq for WithBacktrace {
    fn eq(&self, other: &Self) -> bool {
        self.source.code() == other.source.code()
    }
}

#[inline]
pub fn any<E: StdError>(err: E) -> WithBacktrace {
    Code::Any(anyhow::anyhow!("{}", err.to_string())).into()
}

#[inline]
pub fn not_found<S: ToString + ?Sized>(err: &S) -> WithBacktrace {
    Code::NotFound(err.to_string()).into()
}

#[inline]
pub fn service<S: ToString + ?Sized>(
    service: &'static str,
    err: &S,
) -> WithBacktrace {
    Code::Service {
        service,
        detail: err.to_string(),
    }
    .into()
}

#[inline]
pub fn bad_request<S: ToString + ?Sized>(err: &S) -> WithBacktrace {
    Code::BadRequest(err.to_string()).into()
}

#[inline]
pub fn timeout<S: ToString + ?Sized>(err: &S) -> WithBacktrace {
    Code::Timeout(err.to_string()).into()
}
