use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Filesystem access failed for {path}: {source}")]
    FsAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Cannot read repository {path}: {message}")]
    RepositoryRead { path: PathBuf, message: String },

    #[error("Git command failed: {command}: {stderr}")]
    GitCommandFailed { command: String, stderr: String },

    #[error("Git command produced non-UTF-8 output: {command}")]
    GitOutputUtf8 { command: String },

    #[error("Path is not valid UTF-8: {path:?}")]
    NonUtf8Path { path: PathBuf },

    #[error("Path must be relative to the repository root: {path}")]
    NonRelativePath { path: PathBuf },

    #[error("Path escapes the repository root: {path}")]
    PathEscapesRepository { path: PathBuf },

    #[error("Cannot parse git status output: {message}")]
    StatusParse { message: String },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Cancelled by user")]
    Cancelled,
}

impl FixtureError {
    /// Builds a closure that tags an `io::Error` with the path it happened on.
    pub(crate) fn fs(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| FixtureError::FsAccess { path, source }
    }

    /// The underlying `io::ErrorKind` for filesystem failures.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            FixtureError::FsAccess { source, .. } => Some(source.kind()),
            FixtureError::Walk(err) => err.io_error().map(io::Error::kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FixtureError>;
