use crate::error::{FixtureError, Result};
use crate::status::{Change, FileState, RepoStatus, StatusEntry};
use crate::vcs::{clean_relative, CommitRecord, Signature, VersionControl};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use walkdir::WalkDir;

/// In-memory stand-in for git. Commits snapshot file bytes; status compares
/// the working tree against the last snapshot of each path. A commit that
/// changes nothing fails, as `git commit` does.
#[derive(Debug, Default)]
pub struct InMemoryVcs {
    repos: Mutex<HashMap<PathBuf, FakeRepo>>,
}

#[derive(Debug, Default)]
struct FakeRepo {
    committed: BTreeMap<PathBuf, Vec<u8>>,
    commits: Vec<CommitRecord>,
}

impl InMemoryVcs {
    pub fn new() -> Self {
        Self::default()
    }

    fn repos(&self) -> MutexGuard<'_, HashMap<PathBuf, FakeRepo>> {
        self.repos.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn commits(&self, repo: &Path) -> Result<Vec<CommitRecord>> {
        let repos = self.repos();
        let state = repos.get(repo).ok_or_else(|| not_a_repository(repo))?;
        Ok(state.commits.clone())
    }

    pub fn is_repository(&self, path: &Path) -> bool {
        self.repos().contains_key(path)
    }
}

impl VersionControl for InMemoryVcs {
    fn init_repository(&self, path: &Path) -> Result<()> {
        if !path.is_dir() {
            return Err(FixtureError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        self.repos().entry(path.to_path_buf()).or_default();
        Ok(())
    }

    fn stage_and_commit(
        &self,
        repo: &Path,
        files: &[&Path],
        signature: &Signature,
        message: &str,
    ) -> Result<()> {
        let mut repos = self.repos();
        let state = repos.get_mut(repo).ok_or_else(|| not_a_repository(repo))?;

        let mut changes: Vec<(PathBuf, Option<Vec<u8>>)> = Vec::with_capacity(files.len());
        for file in files {
            let relative = clean_relative(file)?;
            let full = repo.join(&relative);
            let current = match fs::read(&full) {
                Ok(bytes) => Some(bytes),
                // A tracked file gone from disk is staged as a deletion.
                Err(err)
                    if err.kind() == ErrorKind::NotFound
                        && state.committed.contains_key(&relative) =>
                {
                    None
                }
                Err(err) => return Err(FixtureError::fs(&full)(err)),
            };
            if current.as_ref() != state.committed.get(&relative) {
                changes.push((relative, current));
            }
        }

        if changes.is_empty() {
            return Err(FixtureError::GitCommandFailed {
                command: "commit".to_string(),
                stderr: "nothing to commit".to_string(),
            });
        }

        let mut paths = Vec::with_capacity(changes.len());
        for (relative, current) in changes {
            match current {
                Some(bytes) => {
                    state.committed.insert(relative.clone(), bytes);
                }
                None => {
                    state.committed.remove(&relative);
                }
            }
            paths.push(relative);
        }
        state.commits.push(CommitRecord {
            signature: signature.clone(),
            message: message.to_string(),
            paths,
        });
        Ok(())
    }

    fn status(&self, repo: &Path) -> Result<RepoStatus> {
        let repos = self.repos();
        let state = repos.get(repo).ok_or_else(|| not_a_repository(repo))?;

        let mut entries = Vec::new();
        let mut seen = BTreeSet::new();

        let walker = WalkDir::new(repo)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(repo)
                .map_err(|_| FixtureError::PathEscapesRepository {
                    path: entry.path().to_path_buf(),
                })?
                .to_path_buf();

            match state.committed.get(&relative) {
                None => entries.push(StatusEntry::new(relative, [FileState::Untracked])),
                Some(committed) => {
                    let current =
                        fs::read(entry.path()).map_err(FixtureError::fs(entry.path()))?;
                    if &current != committed {
                        entries.push(StatusEntry::new(
                            relative.clone(),
                            [FileState::Unstaged(Change::Modified)],
                        ));
                    }
                    seen.insert(relative);
                }
            }
        }

        for path in state.committed.keys() {
            if !seen.contains(path) {
                entries.push(StatusEntry::new(
                    path.clone(),
                    [FileState::Unstaged(Change::Deleted)],
                ));
            }
        }

        Ok(RepoStatus::from_entries(entries))
    }
}

fn not_a_repository(path: &Path) -> FixtureError {
    FixtureError::NotARepository {
        path: path.to_path_buf(),
    }
}
