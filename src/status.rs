use crate::error::{FixtureError, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Change {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
}

impl Change {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            b'A' => Some(Change::Added),
            b'M' => Some(Change::Modified),
            b'D' => Some(Change::Deleted),
            b'R' => Some(Change::Renamed),
            b'C' => Some(Change::Copied),
            b'T' => Some(Change::TypeChanged),
            _ => None,
        }
    }

    fn code(self) -> char {
        match self {
            Change::Added => 'A',
            Change::Modified => 'M',
            Change::Deleted => 'D',
            Change::Renamed => 'R',
            Change::Copied => 'C',
            Change::TypeChanged => 'T',
        }
    }
}

/// One facet of a path's state; a path can be staged and unstaged at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileState {
    Untracked,
    Ignored,
    Conflicted,
    Staged(Change),
    Unstaged(Change),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Path relative to the repository root.
    pub path: PathBuf,
    /// Source path of a rename or copy.
    pub original_path: Option<PathBuf>,
    pub states: BTreeSet<FileState>,
}

impl StatusEntry {
    pub fn new(path: impl Into<PathBuf>, states: impl IntoIterator<Item = FileState>) -> Self {
        Self {
            path: path.into(),
            original_path: None,
            states: states.into_iter().collect(),
        }
    }

    pub fn is_untracked(&self) -> bool {
        self.states.contains(&FileState::Untracked)
    }

    /// Two-letter code in the style of `git status --short`.
    pub fn short_code(&self) -> String {
        if self.is_untracked() {
            return "??".to_string();
        }
        if self.states.contains(&FileState::Ignored) {
            return "!!".to_string();
        }
        if self.states.contains(&FileState::Conflicted) {
            return "UU".to_string();
        }
        let mut index = ' ';
        let mut worktree = ' ';
        for state in &self.states {
            match state {
                FileState::Staged(change) => index = change.code(),
                FileState::Unstaged(change) => worktree = change.code(),
                _ => {}
            }
        }
        format!("{}{}", index, worktree)
    }
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.original_path {
            Some(original) => write!(
                f,
                "{} {} -> {}",
                self.short_code(),
                original.display(),
                self.path.display()
            ),
            None => write!(f, "{} {}", self.short_code(), self.path.display()),
        }
    }
}

/// Status of a working tree, sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStatus {
    entries: Vec<StatusEntry>,
}

impl RepoStatus {
    pub fn from_entries(mut entries: Vec<StatusEntry>) -> Self {
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Self { entries }
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<StatusEntry> {
        self.entries
    }

    pub fn untracked(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|entry| entry.is_untracked())
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&StatusEntry> {
        let path = path.as_ref();
        self.entries.iter().find(|entry| entry.path == path)
    }

    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const CONFLICT_CODES: &[&[u8; 2]] = &[b"DD", b"AU", b"UD", b"UA", b"DU", b"AA", b"UU"];

/// Parse `git status --porcelain=v1 -z` output.
pub fn parse_porcelain(output: &[u8]) -> Result<RepoStatus> {
    let mut tokens = output.split(|&b| b == 0).filter(|token| !token.is_empty());
    let mut entries = Vec::new();

    while let Some(record) = tokens.next() {
        if record.len() < 4 || record[2] != b' ' {
            return Err(parse_error(format!(
                "malformed record {:?}",
                String::from_utf8_lossy(record)
            )));
        }
        let (x, y) = (record[0], record[1]);
        let path = token_path(&record[3..])?;

        let mut entry = StatusEntry {
            path,
            original_path: None,
            states: BTreeSet::new(),
        };
        match (x, y) {
            (b'?', b'?') => {
                entry.states.insert(FileState::Untracked);
            }
            (b'!', b'!') => {
                entry.states.insert(FileState::Ignored);
            }
            _ if CONFLICT_CODES.contains(&&[x, y]) => {
                entry.states.insert(FileState::Conflicted);
            }
            _ => {
                if x != b' ' {
                    entry
                        .states
                        .insert(FileState::Staged(change_for(x, record)?));
                }
                if y != b' ' {
                    entry
                        .states
                        .insert(FileState::Unstaged(change_for(y, record)?));
                }
                if entry.states.is_empty() {
                    return Err(parse_error("record without a status code".to_string()));
                }
            }
        }

        if matches!(x, b'R' | b'C') || matches!(y, b'R' | b'C') {
            let original = tokens.next().ok_or_else(|| {
                parse_error(format!(
                    "missing original path for {}",
                    entry.path.display()
                ))
            })?;
            entry.original_path = Some(token_path(original)?);
        }

        entries.push(entry);
    }

    Ok(RepoStatus::from_entries(entries))
}

fn change_for(code: u8, record: &[u8]) -> Result<Change> {
    Change::from_code(code).ok_or_else(|| {
        parse_error(format!(
            "unknown status code {:?} in {:?}",
            code as char,
            String::from_utf8_lossy(record)
        ))
    })
}

fn token_path(token: &[u8]) -> Result<PathBuf> {
    let text = std::str::from_utf8(token)
        .map_err(|_| parse_error("path is not valid UTF-8".to_string()))?;
    Ok(PathBuf::from(text))
}

fn parse_error(message: String) -> FixtureError {
    FixtureError::StatusParse { message }
}
