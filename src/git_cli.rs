use crate::command_utils::{check_success, execute_command_with_env, path_arg};
use crate::error::{FixtureError, Result};
use crate::status::{parse_porcelain, RepoStatus};
use crate::system_config::SystemConfig;
use crate::vcs::{CommitInfo, Signature, VersionControl};
use log::debug;
use std::path::Path;
use std::process::Output;

/// `VersionControl` backed by the `git` executable, with `gix` for reads.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(config.git_program.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[&str], envs: &[(&str, String)]) -> Result<Output> {
        let output = execute_command_with_env(&self.program, args, envs)?;
        check_success(&self.program, args, output)
    }

    /// Open the repository whose work tree is exactly `repo`.
    pub fn open(&self, repo: &Path) -> Result<gix::Repository> {
        gix::open(repo).map_err(|err| {
            debug!("gix could not open {}: {}", repo.display(), err);
            FixtureError::NotARepository {
                path: repo.to_path_buf(),
            }
        })
    }

    /// Object id `HEAD` points at, or `None` before the first commit.
    pub fn head_commit_id(&self, repo: &Path) -> Result<Option<String>> {
        let repository = self.open(repo)?;
        let head = repository
            .head()
            .map_err(|err| FixtureError::RepositoryRead {
                path: repo.to_path_buf(),
                message: err.to_string(),
            })?;

        Ok(head.id().map(|id| id.detach().to_string()))
    }

    pub fn last_commit(&self, repo: &Path) -> Result<CommitInfo> {
        let args = [
            "-C",
            path_arg(repo)?,
            "log",
            "-1",
            "--format=%an%x00%ae%x00%at%x00%s",
        ];
        let output = self.run(&args, &[])?;
        let command = format!("{} {}", self.program, args.join(" "));
        let text = String::from_utf8(output.stdout).map_err(|_| FixtureError::GitOutputUtf8 {
            command: command.clone(),
        })?;

        let fields: Vec<&str> = text.trim_end_matches('\n').split('\0').collect();
        let &[author_name, author_email, timestamp, summary] = fields.as_slice() else {
            return Err(FixtureError::GitCommandFailed {
                command,
                stderr: format!("unexpected log output: {:?}", text),
            });
        };
        let timestamp = timestamp
            .parse::<i64>()
            .map_err(|_| FixtureError::GitCommandFailed {
                command,
                stderr: format!("invalid author time: {:?}", timestamp),
            })?;

        Ok(CommitInfo {
            author_name: author_name.to_string(),
            author_email: author_email.to_string(),
            timestamp,
            summary: summary.to_string(),
        })
    }
}

impl VersionControl for GitCli {
    fn init_repository(&self, path: &Path) -> Result<()> {
        self.run(
            &["init", "--quiet", "--initial-branch=main", path_arg(path)?],
            &[],
        )?;
        debug!("Initialized git repository at {}", path.display());
        Ok(())
    }

    fn stage_and_commit(
        &self,
        repo: &Path,
        files: &[&Path],
        signature: &Signature,
        message: &str,
    ) -> Result<()> {
        self.open(repo)?;
        let repo_arg = path_arg(repo)?;

        let mut add_args = vec!["-C", repo_arg, "add", "--"];
        for file in files {
            add_args.push(path_arg(file)?);
        }
        self.run(&add_args, &[])?;

        let date = signature.git_date();
        let envs = [
            ("GIT_AUTHOR_NAME", signature.name.clone()),
            ("GIT_AUTHOR_EMAIL", signature.email.clone()),
            ("GIT_AUTHOR_DATE", date.clone()),
            ("GIT_COMMITTER_NAME", signature.name.clone()),
            ("GIT_COMMITTER_EMAIL", signature.email.clone()),
            ("GIT_COMMITTER_DATE", date),
        ];
        self.run(
            &[
                "-C",
                repo_arg,
                "-c",
                "commit.gpgsign=false",
                "commit",
                "--quiet",
                "-m",
                message,
            ],
            &envs,
        )?;

        debug!(
            "Committed {} path(s) in {} as {} <{}>",
            files.len(),
            repo.display(),
            signature.name,
            signature.email
        );
        Ok(())
    }

    fn status(&self, repo: &Path) -> Result<RepoStatus> {
        self.open(repo)?;
        let output = self.run(
            &[
                "-C",
                path_arg(repo)?,
                "status",
                "--porcelain=v1",
                "-z",
                "--untracked-files=all",
            ],
            &[],
        )?;
        parse_porcelain(&output.stdout)
    }
}
