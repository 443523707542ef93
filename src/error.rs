use std::fmt;

use crate::model::DocumentKind;

#[derive(Debug)]
pub enum Error {
    /// The primary business record does not exist.
    NotFound { kind: DocumentKind, code: String },
    /// Font or template bytes could not be loaded.
    Asset(String),
    /// A record file was not valid JSON for the expected shape.
    Input(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound { kind, code } => {
                write!(f, "{} '{}' not found", kind.label(), code)
            }
            Error::Asset(msg) => write!(f, "Asset error: {msg}"),
            Error::Input(e) => write!(f, "Invalid record: {e}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Input(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Input(e)
    }
}
