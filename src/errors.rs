use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreshError {
    #[error("transport error ({target}): {message}")]
    Transport { target: String, message: String },
    #[error("parse error ({target}): {message}")]
    Parse { target: String, message: String },
    #[error("io error ({target}): {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsafe path ({target}): {message}")]
    UnsafePath { target: String, message: String },
}

/// Fieldless discriminant of [`FreshError`], used in run summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Parse,
    Io,
    UnsafePath,
}

impl FreshError {
    pub fn transport(target: impl Into<String>, err: impl fmt::Display) -> Self {
        Self::Transport { target: target.into(), message: format!("{err:#}") }
    }

    pub fn parse(target: impl Into<String>, err: impl fmt::Display) -> Self {
        Self::Parse { target: target.into(), message: err.to_string() }
    }

    pub fn io(target: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { target: target.into(), source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Io { .. } => ErrorKind::Io,
            Self::UnsafePath { .. } => ErrorKind::UnsafePath,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Parse => "parse",
            ErrorKind::Io => "io",
            ErrorKind::UnsafePath => "unsafe-path",
        };
        f.write_str(s)
    }
}
