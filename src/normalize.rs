//! Permission reset for fixture trees.
//!
//! Git marks pack and object files read-only, and some platforms refuse to
//! delete those. Resetting every node to a plain owner-writable state first
//! lets a recursive delete go through.

use crate::error::{FixtureError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Reset every file under `root` to the normal, unrestricted attribute state.
///
/// Directories are reset before they are listed, so a directory that lost its
/// read or search bit is still traversed. Symbolic links are skipped. The
/// root must exist; a missing root or a node vanishing mid-walk is reported as
/// `FsAccess` with the original `io::ErrorKind`.
pub fn normalize_attributes(root: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(root).map_err(FixtureError::fs(root))?;
    if !metadata.is_dir() {
        return Err(FixtureError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];
    let mut directories = 0usize;
    let mut files = 0usize;

    while let Some(dir) = pending.pop() {
        set_normal(&dir, true)?;
        directories += 1;

        for entry in fs::read_dir(&dir).map_err(FixtureError::fs(&dir))? {
            let entry = entry.map_err(FixtureError::fs(&dir))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(FixtureError::fs(&path))?;

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                set_normal(&path, false)?;
                files += 1;
            }
        }
    }

    debug!(
        "Normalized {} directories and {} files under {}",
        directories,
        files,
        root.display()
    );
    Ok(())
}

/// Normalize `root` if it exists, then delete it recursively.
///
/// A missing root is an error, matching a plain recursive delete.
pub fn remove_tree(root: &Path) -> Result<()> {
    if root.exists() {
        normalize_attributes(root)?;
    }
    fs::remove_dir_all(root).map_err(FixtureError::fs(root))?;
    debug!("Removed {}", root.display());
    Ok(())
}

#[cfg(unix)]
fn set_normal(path: &Path, is_dir: bool) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .map_err(FixtureError::fs(path))?
        .permissions();
    perms.set_mode(normal_mode(perms.mode(), is_dir));
    fs::set_permissions(path, perms).map_err(FixtureError::fs(path))
}

#[cfg(not(unix))]
fn set_normal(path: &Path, _is_dir: bool) -> Result<()> {
    let mut perms = fs::metadata(path)
        .map_err(FixtureError::fs(path))?
        .permissions();
    perms.set_readonly(false);
    fs::set_permissions(path, perms).map_err(FixtureError::fs(path))
}

/// Drops setuid/setgid/sticky and grants the owner read and write, plus
/// search on directories. Group and other bits are left as they were.
#[cfg(unix)]
pub(crate) fn normal_mode(mode: u32, is_dir: bool) -> u32 {
    let owner = if is_dir { 0o700 } else { 0o600 };
    (mode & 0o777) | owner
}
