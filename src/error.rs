use std::io;

use thiserror::Error;

/**
 * Every failure the repository can produce.
 * Each variant names the operation that failed and the offending path/value,
 *     the underlying cause (if any) is kept as the error source.
 */
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Failed to read file '{path}'. {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse settings file '{path}'. {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to convert settings to JSON. {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid certificate type '{0}'; must be csr or cert")]
    InvalidKind(String),

    #[error("Failed to create path '{path}'. {source}")]
    DirectoryCreate {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to save file '{path}'. {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}
