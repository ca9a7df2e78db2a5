// Errors callers match on. Everything else in the binary is anyhow.

use std::path::PathBuf;

/// Whole-file failures. A missing file is not an error (see `loader::SourceData`).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{}: not valid JSON: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: expected a JSON array of objects", path.display())]
    NotAnArray { path: PathBuf },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dimension {0:?} (expected node, worker or action)")]
pub struct UnknownDimension(pub String);
