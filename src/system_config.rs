use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SystemConfig {
    pub git_program: String,
    /// Parent directory for newly created fixture repositories.
    pub temp_root: PathBuf,
}

impl SystemConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let git_program = lookup("REPO_FIXTURE_GIT")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "git".to_string());
        let temp_root = lookup("REPO_FIXTURE_TMPDIR")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        Self {
            git_program,
            temp_root,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
