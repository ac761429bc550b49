mod common;

use common::{git_fixture, system_config};
use repo_fixture::config::FixtureConfig;
use repo_fixture::{
    Change, FileState, FixtureError, InMemoryVcs, RepoFixture, Signature, VersionControl,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn memory_fixture(temp_root: &Path) -> RepoFixture<InMemoryVcs> {
    RepoFixture::create_with(
        InMemoryVcs::new(),
        FixtureConfig::default(),
        &system_config(temp_root),
    )
    .unwrap()
}

#[test]
fn test_tracked_file_records_commit() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = memory_fixture(temp_dir.path());

    fixture.add_tracked_file("dir/tracked.txt", "content").unwrap();

    let commits = fixture.vcs().commits(fixture.repo_path()).unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].signature.name, "FakeUser");
    assert_eq!(commits[0].signature.email, "fakeemail");
    assert_eq!(commits[0].message, "Adding files");
    assert_eq!(commits[0].paths, vec![PathBuf::from("dir/tracked.txt")]);
    assert!(fixture.status().unwrap().is_clean());
}

#[test]
fn test_untracked_and_modified() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = memory_fixture(temp_dir.path());

    fixture.add_tracked_file("kept.txt", "v1").unwrap();
    fixture.add_untracked_file("kept.txt", "v2").unwrap();
    fixture.add_untracked_file_lines("fresh.txt", 4).unwrap();

    let status = fixture.status().unwrap();
    assert_eq!(status.len(), 2);
    assert!(status
        .get("kept.txt")
        .unwrap()
        .states
        .contains(&FileState::Unstaged(Change::Modified)));

    let untracked = fixture.untracked_files().unwrap();
    assert_eq!(untracked.len(), 1);
    assert_eq!(untracked[0].path, Path::new("fresh.txt"));
}

#[test]
fn test_commit_of_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = memory_fixture(temp_dir.path());

    let err = fixture.commit_paths(&[Path::new("ghost.txt")]).unwrap_err();
    assert!(matches!(err, FixtureError::FsAccess { .. }));
}

#[test]
fn test_delete_and_drop() {
    let temp_dir = TempDir::new().unwrap();
    let mut fixture = memory_fixture(temp_dir.path());
    fixture.add_untracked_file("a.txt", "a").unwrap();
    let path = fixture.repo_path().to_path_buf();

    fixture.delete_repo_directory().unwrap();
    assert!(!path.exists());
    drop(fixture);

    let dropped = {
        let fixture = memory_fixture(temp_dir.path());
        fixture.repo_path().to_path_buf()
    };
    assert!(!dropped.exists());
}

fn assert_dotted_paths_commit_clean<V: VersionControl>(fixture: &RepoFixture<V>) {
    fixture.add_tracked_file("./a.txt", "a").unwrap();
    fixture.add_tracked_file("d/../b.txt", "b").unwrap();

    let status = fixture.status().unwrap();
    assert!(status.is_clean(), "unexpected entries: {:?}", status.entries());
    assert!(fixture.repo_path().join("a.txt").is_file());
    assert!(fixture.repo_path().join("b.txt").is_file());
}

fn assert_unchanged_recommit_fails<V: VersionControl>(fixture: &RepoFixture<V>) {
    fixture.add_tracked_file("same.txt", "unchanged").unwrap();

    let err = fixture.commit_paths(&[Path::new("same.txt")]).unwrap_err();
    assert!(matches!(err, FixtureError::GitCommandFailed { .. }));
}

fn assert_deleted_tracked_file_commits<V: VersionControl>(fixture: &RepoFixture<V>) {
    fixture.add_tracked_file("doomed.txt", "bye").unwrap();
    fixture.add_tracked_file("kept.txt", "stay").unwrap();
    fs::remove_file(fixture.repo_path().join("doomed.txt")).unwrap();

    let status = fixture.status().unwrap();
    assert!(status
        .get("doomed.txt")
        .unwrap()
        .states
        .contains(&FileState::Unstaged(Change::Deleted)));

    fixture.commit_paths(&[Path::new("doomed.txt")]).unwrap();
    assert!(fixture.status().unwrap().is_clean());
}

#[test]
fn test_dotted_paths_commit_clean_in_both_backends() {
    let temp_dir = TempDir::new().unwrap();
    assert_dotted_paths_commit_clean(&memory_fixture(temp_dir.path()));
    assert_dotted_paths_commit_clean(&git_fixture(temp_dir.path()));
}

#[test]
fn test_dotted_paths_passed_straight_to_memory_backend() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = memory_fixture(temp_dir.path());
    fixture.add_untracked_file("a.txt", "a").unwrap();

    let signature = Signature::now("FakeUser", "fakeemail");
    fixture
        .vcs()
        .stage_and_commit(
            fixture.repo_path(),
            &[Path::new("./a.txt")],
            &signature,
            "Adding files",
        )
        .unwrap();

    assert!(fixture.status().unwrap().is_clean());
    let commits = fixture.vcs().commits(fixture.repo_path()).unwrap();
    assert_eq!(commits[0].paths, vec![PathBuf::from("a.txt")]);
}

#[test]
fn test_unchanged_recommit_fails_in_both_backends() {
    let temp_dir = TempDir::new().unwrap();
    assert_unchanged_recommit_fails(&memory_fixture(temp_dir.path()));
    assert_unchanged_recommit_fails(&git_fixture(temp_dir.path()));
}

#[test]
fn test_unchanged_recommit_records_no_commit() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = memory_fixture(temp_dir.path());
    assert_unchanged_recommit_fails(&fixture);
    assert_eq!(fixture.vcs().commits(fixture.repo_path()).unwrap().len(), 1);
}

#[test]
fn test_deleted_tracked_file_commits_in_both_backends() {
    let temp_dir = TempDir::new().unwrap();
    assert_deleted_tracked_file_commits(&memory_fixture(temp_dir.path()));
    assert_deleted_tracked_file_commits(&git_fixture(temp_dir.path()));
}
