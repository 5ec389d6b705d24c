use std::fmt;

use super::LoadError;

/// Error returned by a data source request.
#[derive(Debug)]
pub enum FetchError {
    /// The path is not part of the request surface.
    NotFound(String),
    /// The server answered with a non-2xx status.
    Status { path: String, status: u16 },
    /// The request never produced a response (connect, timeout, ...).
    Transport(reqwest::Error),
    /// The response body was not the expected JSON.
    Decode(reqwest::Error),
    /// The response decoded but its content is malformed.
    Invalid(LoadError),
    /// The gateway answered a path with a different collection.
    Unexpected { path: String },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NotFound(path) => write!(f, "unknown path {}", path),
            FetchError::Status { path, status } => {
                write!(f, "request to {} failed with status {}", path, status)
            }
            FetchError::Transport(e) => write!(f, "network error: {}", e),
            FetchError::Decode(e) => write!(f, "could not decode response: {}", e),
            FetchError::Invalid(e) => write!(f, "malformed data: {}", e),
            FetchError::Unexpected { path } => write!(f, "unexpected payload for {}", path),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport(e) | FetchError::Decode(e) => Some(e),
            FetchError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err)
        } else {
            FetchError::Transport(err)
        }
    }
}

impl From<LoadError> for FetchError {
    fn from(err: LoadError) -> Self {
        FetchError::Invalid(err)
    }
}
