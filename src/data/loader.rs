use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

/// Error raised while reading or validating a dataset.
#[derive(Debug)]
pub enum LoadError {
    /// The dataset file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The dataset is not valid JSON for the expected shape.
    Parse {
        name: String,
        source: serde_json::Error,
    },
    /// The dataset parsed but breaks a content rule.
    Invalid {
        kind: &'static str,
        id: String,
        reason: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            LoadError::Parse { name, source } => write!(f, "failed to parse {}: {}", name, source),
            LoadError::Invalid { kind, id, reason } => {
                write!(f, "invalid {} question {}: {}", kind, id, reason)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
            LoadError::Invalid { .. } => None,
        }
    }
}

/// Parse a JSON array of `T`. `name` only labels errors.
pub fn parse_collection<T: DeserializeOwned>(name: &str, json: &str) -> Result<Vec<T>, LoadError> {
    serde_json::from_str(json).map_err(|source| LoadError::Parse {
        name: name.to_string(),
        source,
    })
}

/// Read and parse a JSON array of `T` from `path`.
pub fn load_collection_from_path<T, P>(path: P) -> Result<Vec<T>, LoadError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_collection(&path.display().to_string(), &json_content)
}
