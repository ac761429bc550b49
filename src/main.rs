use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use repo_fixture::config::FixtureConfig;
use repo_fixture::system_config::SystemConfig;
use repo_fixture::{normalize_attributes, remove_tree, FixtureError, GitCli, RepoFixture};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "repo-fixture")]
#[command(about = "Create, populate and tear down disposable git repositories")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new repository under the temp root and print its path
    Create,
    /// Write a file into a repository
    Add {
        /// Repository directory
        repo: PathBuf,
        /// File path relative to the repository root
        path: PathBuf,
        /// Literal file content
        #[arg(long, conflicts_with = "lines")]
        content: Option<String>,
        /// Number of fake content lines to write
        #[arg(long, default_value_t = 1)]
        lines: usize,
        /// Stage and commit the file after writing it
        #[arg(long)]
        tracked: bool,
    },
    /// Create an untracked directory in a repository
    Mkdir {
        /// Repository directory
        repo: PathBuf,
        /// Directory path relative to the repository root
        path: PathBuf,
    },
    /// Show the working tree status of a repository
    Status {
        /// Repository directory
        repo: PathBuf,
        /// Only list untracked files
        #[arg(long)]
        untracked: bool,
    },
    /// Clear restrictive permissions on every file under a directory
    Normalize {
        /// Directory to normalize
        dir: PathBuf,
    },
    /// Normalize and remove a repository directory
    #[command(alias = "rm")]
    Delete {
        /// Repository directory
        repo: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let system = SystemConfig::from_env();
    let git = GitCli::from_config(&system);

    match cli.command {
        Commands::Create => {
            let config = FixtureConfig::load(git.program())?;
            let fixture = RepoFixture::create_with(git, config, &system)?;
            println!("{}", fixture.keep().display());
        }
        Commands::Add {
            repo,
            path,
            content,
            lines,
            tracked,
        } => {
            let config = FixtureConfig::load(git.program())?;
            let fixture = RepoFixture::attach(repo, git, config)?;
            let written = match (content, tracked) {
                (Some(content), true) => fixture.add_tracked_file(&path, &content)?,
                (Some(content), false) => fixture.add_untracked_file(&path, &content)?,
                (None, true) => {
                    let text = repo_fixture::fixture::fake_content(lines);
                    fixture.add_tracked_file(&path, &text)?
                }
                (None, false) => fixture.add_untracked_file_lines(&path, lines)?,
            };
            println!("{}", written.display());
        }
        Commands::Mkdir { repo, path } => {
            let fixture = RepoFixture::attach(repo, git, FixtureConfig::default())?;
            println!("{}", fixture.add_untracked_dir(&path)?.display());
        }
        Commands::Status { repo, untracked } => {
            let fixture = RepoFixture::attach(repo, git, FixtureConfig::default())?;
            let entries = if untracked {
                fixture.untracked_files()?
            } else {
                fixture.status()?.into_entries()
            };
            for entry in entries {
                println!("{}", entry);
            }
        }
        Commands::Normalize { dir } => {
            normalize_attributes(&dir)?;
            println!("Normalized {}", dir.display());
        }
        Commands::Delete { repo, yes } => {
            if !yes {
                let confirm = Confirm::new()
                    .with_prompt(format!(
                        "This will permanently delete {}. Continue?",
                        repo.display()
                    ))
                    .default(false)
                    .interact()?;
                if !confirm {
                    bail!(FixtureError::Cancelled);
                }
            }
            remove_tree(&repo)?;
            println!("Deleted {}", repo.display());
        }
    }

    Ok(())
}
