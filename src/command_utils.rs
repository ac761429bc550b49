use crate::error::{FixtureError, Result};
use log::debug;
use std::path::Path;
use std::process::{Command, Output};

/// Execute a command with debug logging
pub fn execute_command(cmd: &str, args: &[&str]) -> Result<Output> {
    execute_command_with_env(cmd, args, &[])
}

/// Execute a command with extra environment variables and debug logging.
///
/// Only spawn failures are errors; a non-zero exit is returned in the `Output`
/// for the caller to interpret.
pub fn execute_command_with_env(
    cmd: &str,
    args: &[&str],
    envs: &[(&str, String)],
) -> Result<Output> {
    debug!("Executing command: {} {}", cmd, args.join(" "));

    let output = Command::new(cmd)
        .args(args)
        .envs(envs.iter().map(|(key, value)| (*key, value.as_str())))
        .output()
        .map_err(|source| FixtureError::FsAccess {
            path: cmd.into(),
            source,
        })?;

    if output.status.success() {
        debug!("Command succeeded: {} {}", cmd, args.join(" "));
    } else {
        debug!(
            "Command failed: {} {} (exit code: {:?})",
            cmd,
            args.join(" "),
            output.status.code()
        );
    }
    if !output.stdout.is_empty() {
        debug!("stdout: {}", String::from_utf8_lossy(&output.stdout).trim());
    }
    if !output.stderr.is_empty() {
        debug!("stderr: {}", String::from_utf8_lossy(&output.stderr).trim());
    }

    Ok(output)
}

/// Turns a failed `Output` into `GitCommandFailed`, passing successes through.
pub fn check_success(cmd: &str, args: &[&str], output: Output) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }
    Err(FixtureError::GitCommandFailed {
        command: format!("{} {}", cmd, args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Borrow a path as `&str` for use as a command argument.
pub fn path_arg(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| FixtureError::NonUtf8Path {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_fs_error() {
        let err = execute_command("definitely-not-a-real-program-4242", &[]).unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_path_arg_round_trips_utf8() {
        assert_eq!(path_arg(Path::new("a/b.txt")).unwrap(), "a/b.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_check_success_reports_stderr() {
        let args = ["-c", "echo boom >&2; exit 3"];
        let output = execute_command("sh", &args).unwrap();
        let err = check_success("sh", &args, output).unwrap_err();
        match err {
            FixtureError::GitCommandFailed { command, stderr } => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_env_is_passed_through() {
        let output = execute_command_with_env(
            "sh",
            &["-c", "printf %s \"$FIXTURE_PROBE\""],
            &[("FIXTURE_PROBE", "hello".to_string())],
        )
        .unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "hello");
    }
}
