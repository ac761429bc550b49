#![allow(dead_code)]

use repo_fixture::config::FixtureConfig;
use repo_fixture::system_config::SystemConfig;
use repo_fixture::{GitCli, RepoFixture};
use std::fs;
use std::path::Path;

pub fn system_config(temp_root: &Path) -> SystemConfig {
    SystemConfig {
        git_program: "git".to_string(),
        temp_root: temp_root.to_path_buf(),
    }
}

pub fn git_fixture(temp_root: &Path) -> RepoFixture<GitCli> {
    RepoFixture::create_with(
        GitCli::default(),
        FixtureConfig::default(),
        &system_config(temp_root),
    )
    .expect("Failed to create fixture repository")
}

/// Mark a file or directory read-only.
pub fn restrict(path: &Path) {
    let mut perms = fs::metadata(path).unwrap().permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = if path.is_dir() { 0o555 } else { 0o444 };
        perms.set_mode(mode);
    }
    #[cfg(not(unix))]
    perms.set_readonly(true);
    fs::set_permissions(path, perms).unwrap();
}

#[cfg(unix)]
pub fn mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o7777
}

#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

/// True when the file can be rewritten and carries no special bits.
pub fn is_normal(path: &Path) -> bool {
    #[cfg(unix)]
    {
        let mode = mode(path);
        mode & 0o7000 == 0 && mode & 0o600 == 0o600
    }
    #[cfg(not(unix))]
    {
        !fs::metadata(path).unwrap().permissions().readonly()
    }
}

/// Whether permission bits actually stop this process. They do not for root.
pub fn permissions_enforced(scratch: &Path) -> bool {
    let check_dir = scratch.join("permission-check");
    fs::create_dir_all(&check_dir).unwrap();
    restrict(&check_dir);
    let blocked = fs::write(check_dir.join("check.txt"), "x").is_err();

    let mut perms = fs::metadata(&check_dir).unwrap().permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(0o755);
    }
    #[cfg(not(unix))]
    perms.set_readonly(false);
    fs::set_permissions(&check_dir, perms).unwrap();
    fs::remove_dir_all(&check_dir).unwrap();

    blocked
}
