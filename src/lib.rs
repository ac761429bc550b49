//! Disposable git repositories for tests, and the permission reset that lets
//! them be torn down reliably.

pub mod command_utils;
pub mod config;
pub mod error;
pub mod fixture;
pub mod git_cli;
pub mod memory_vcs;
pub mod normalize;
pub mod status;
pub mod system_config;
pub mod vcs;

pub use error::{FixtureError, Result};
pub use fixture::RepoFixture;
pub use git_cli::GitCli;
pub use memory_vcs::InMemoryVcs;
pub use normalize::{normalize_attributes, remove_tree};
pub use status::{Change, FileState, RepoStatus, StatusEntry};
pub use vcs::{CommitInfo, CommitRecord, Signature, VersionControl};
