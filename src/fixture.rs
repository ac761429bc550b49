//! Disposable repositories for tests.
//!
//! A [`RepoFixture`] owns a uniquely named directory under the temp root,
//! initializes a repository in it, and removes it again on drop. Removal goes
//! through [`remove_tree`], so read-only files left behind by git do not
//! block teardown.

use crate::config::FixtureConfig;
use crate::error::{FixtureError, Result};
use crate::git_cli::GitCli;
use crate::normalize::remove_tree;
use crate::status::{RepoStatus, StatusEntry};
use crate::system_config::SystemConfig;
use crate::vcs::{clean_relative, Signature, VersionControl};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const FAKE_LINE: &str = "Fake content line.";

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// `num_lines` copies of the fake content line, each terminated.
pub fn fake_content(num_lines: usize) -> String {
    format!("{}{}", FAKE_LINE, LINE_ENDING).repeat(num_lines)
}

pub struct RepoFixture<V: VersionControl = GitCli> {
    repo_path: PathBuf,
    vcs: V,
    config: FixtureConfig,
    cleanup_on_drop: bool,
}

impl RepoFixture<GitCli> {
    /// Create a git-backed fixture using environment configuration.
    pub fn create() -> Result<Self> {
        let system = SystemConfig::from_env();
        Self::create_with(
            GitCli::from_config(&system),
            FixtureConfig::default(),
            &system,
        )
    }
}

impl<V: VersionControl> RepoFixture<V> {
    pub fn create_with(vcs: V, config: FixtureConfig, system: &SystemConfig) -> Result<Self> {
        fs::create_dir_all(&system.temp_root).map_err(FixtureError::fs(&system.temp_root))?;
        let repo_path = tempfile::Builder::new()
            .prefix(&config.dir_prefix)
            .tempdir_in(&system.temp_root)
            .map_err(FixtureError::fs(&system.temp_root))?
            .keep();

        let fixture = Self {
            repo_path,
            vcs,
            config,
            cleanup_on_drop: true,
        };
        fixture.vcs.init_repository(&fixture.repo_path)?;

        debug!("Created fixture repository {}", fixture.repo_path.display());
        Ok(fixture)
    }

    /// Wrap an existing repository directory. It is never removed on drop.
    pub fn attach(path: impl Into<PathBuf>, vcs: V, config: FixtureConfig) -> Result<Self> {
        let repo_path = path.into();
        let metadata = fs::metadata(&repo_path).map_err(FixtureError::fs(&repo_path))?;
        if !metadata.is_dir() {
            return Err(FixtureError::NotADirectory { path: repo_path });
        }

        Ok(Self {
            repo_path,
            vcs,
            config,
            cleanup_on_drop: false,
        })
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    pub fn add_untracked_file(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let path = self.resolve(relative.as_ref())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(FixtureError::fs(parent))?;
        }
        fs::write(&path, content).map_err(FixtureError::fs(&path))?;
        Ok(path)
    }

    pub fn add_untracked_file_lines(
        &self,
        relative: impl AsRef<Path>,
        num_lines: usize,
    ) -> Result<PathBuf> {
        self.add_untracked_file(relative, &fake_content(num_lines))
    }

    /// Write the file, then stage and commit it as the configured author.
    pub fn add_tracked_file(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let relative = relative.as_ref();
        let path = self.add_untracked_file(relative, content)?;
        self.commit_paths(&[relative])?;
        Ok(path)
    }

    pub fn commit_paths(&self, relative: &[&Path]) -> Result<()> {
        let cleaned = relative
            .iter()
            .map(|path| clean_relative(path))
            .collect::<Result<Vec<_>>>()?;
        let cleaned: Vec<&Path> = cleaned.iter().map(PathBuf::as_path).collect();

        let signature = Signature::now(&self.config.author_name, &self.config.author_email);
        self.vcs.stage_and_commit(
            &self.repo_path,
            &cleaned,
            &signature,
            &self.config.commit_message,
        )
    }

    pub fn add_untracked_dir(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.resolve(relative.as_ref())?;
        fs::create_dir_all(&path).map_err(FixtureError::fs(&path))?;
        Ok(path)
    }

    pub fn status(&self) -> Result<RepoStatus> {
        self.vcs.status(&self.repo_path)
    }

    pub fn untracked_files(&self) -> Result<Vec<StatusEntry>> {
        Ok(self
            .status()?
            .into_entries()
            .into_iter()
            .filter(StatusEntry::is_untracked)
            .collect())
    }

    /// Remove the repository directory, clearing restrictive permissions first.
    pub fn delete_repo_directory(&mut self) -> Result<()> {
        remove_tree(&self.repo_path)?;
        self.cleanup_on_drop = false;
        Ok(())
    }

    /// Keep the directory after the fixture goes away and return its path.
    pub fn keep(mut self) -> PathBuf {
        self.cleanup_on_drop = false;
        self.repo_path.clone()
    }

    fn resolve(&self, relative: &Path) -> Result<PathBuf> {
        Ok(self.repo_path.join(clean_relative(relative)?))
    }
}

impl<V: VersionControl> Drop for RepoFixture<V> {
    fn drop(&mut self) {
        if !self.cleanup_on_drop || !self.repo_path.exists() {
            return;
        }
        if let Err(err) = remove_tree(&self.repo_path) {
            warn!(
                "Failed to remove fixture repository {}: {}",
                self.repo_path.display(),
                err
            );
        }
    }
}
