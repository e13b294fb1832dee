use std::path::PathBuf;

use thiserror::Error;

/// The error taxonomy spanning the repository, object, and reference layers.
///
/// Every variant corresponds to one of the kinds in the error-handling design:
/// callers match on the variant, not on a message string.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository (or any parent up to mount point): {0}")]
    NotARepo(PathBuf),

    #[error("unsupported repositoryformatversion {0}, expected 0")]
    BadVersion(u32),

    #[error("{0} is not empty")]
    NotEmpty(PathBuf),

    #[error("{0} is not a directory")]
    NotADir(PathBuf),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed {kind}: {message}")]
    Malformed { kind: &'static str, message: String },

    #[error("no such ref or object: {0}")]
    NoSuchRef(String),

    #[error("ambiguous name {name}, candidates: {}", candidates.join(", "))]
    Ambiguous { name: String, candidates: Vec<String> },

    #[error("unknown object kind: {0}")]
    UnknownKind(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GitError {
    pub fn malformed(kind: &'static str, message: impl Into<String>) -> Self {
        GitError::Malformed {
            kind,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GitError>;
