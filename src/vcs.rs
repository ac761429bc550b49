use crate::error::{FixtureError, Result};
use crate::status::RepoStatus;
use jiff::Zoned;
use std::path::{Component, Path, PathBuf};

/// Author and committer identity for a fixture commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: Zoned,
}

impl Signature {
    pub fn new(name: impl Into<String>, email: impl Into<String>, when: Zoned) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            when,
        }
    }

    pub fn now(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(name, email, Zoned::now())
    }

    /// Date in the `@<unix seconds> <+hhmm>` form git reads from
    /// `GIT_AUTHOR_DATE` and `GIT_COMMITTER_DATE`.
    pub fn git_date(&self) -> String {
        format!(
            "@{} {}",
            self.when.timestamp().as_second(),
            self.when.strftime("%z")
        )
    }
}

/// Summary of a commit as read back from a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub author_name: String,
    pub author_email: String,
    /// Author time in seconds since the Unix epoch.
    pub timestamp: i64,
    pub summary: String,
}

/// A commit recorded by an in-memory backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub signature: Signature,
    pub message: String,
    pub paths: Vec<PathBuf>,
}

/// The repository operations a fixture needs.
///
/// `files` passed to `stage_and_commit` are relative to `repo`.
pub trait VersionControl {
    fn init_repository(&self, path: &Path) -> Result<()>;

    fn stage_and_commit(
        &self,
        repo: &Path,
        files: &[&Path],
        signature: &Signature,
        message: &str,
    ) -> Result<()>;

    fn status(&self, repo: &Path) -> Result<RepoStatus>;
}

/// Fold `.` and `..` out of a repository-relative path.
///
/// Absolute paths and paths that climb above the repository root are rejected,
/// so the result is the same spelling a working-tree walk would produce.
pub fn clean_relative(relative: &Path) -> Result<PathBuf> {
    let mut cleaned = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => cleaned.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    return Err(FixtureError::PathEscapesRepository {
                        path: relative.to_path_buf(),
                    });
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(FixtureError::NonRelativePath {
                    path: relative.to_path_buf(),
                });
            }
        }
    }
    Ok(cleaned)
}
