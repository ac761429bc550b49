use crate::command_utils::execute_command;
use crate::error::{FixtureError, Result};

pub const DEFAULT_AUTHOR_NAME: &str = "FakeUser";
pub const DEFAULT_AUTHOR_EMAIL: &str = "fakeemail";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Adding files";
pub const DEFAULT_DIR_PREFIX: &str = "fakeRepo-";

/// Identity and naming used when a fixture writes to its repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureConfig {
    pub author_name: String,
    pub author_email: String,
    pub commit_message: String,
    pub dir_prefix: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_email: DEFAULT_AUTHOR_EMAIL.to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            dir_prefix: DEFAULT_DIR_PREFIX.to_string(),
        }
    }
}

impl FixtureConfig {
    /// Defaults overlaid with `fixture.*` keys from git config.
    pub fn load(git_program: &str) -> Result<Self> {
        let mut config = Self::default();

        if let Some(name) = get_git_config(git_program, "fixture.author-name")? {
            config.author_name = name;
        }
        if let Some(email) = get_git_config(git_program, "fixture.author-email")? {
            config.author_email = email;
        }
        if let Some(message) = get_git_config(git_program, "fixture.commit-message")? {
            config.commit_message = message;
        }

        Ok(config)
    }
}

fn get_git_config(git_program: &str, key: &str) -> Result<Option<String>> {
    let output = execute_command(git_program, &["config", "--get", key])?;

    if output.status.success() {
        let value = String::from_utf8(output.stdout)
            .map_err(|_| FixtureError::GitOutputUtf8 {
                command: format!("{} config --get {}", git_program, key),
            })?
            .trim()
            .to_string();
        Ok(if value.is_empty() { None } else { Some(value) })
    } else {
        Ok(None)
    }
}
