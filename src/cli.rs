use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Subcommand chosen to execute; the interactive menu runs without one
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Switches the active profile, applying its git identity and SSH key
    Switch {
        /// Name of the profile to switch to
        name: String,
    },
    /// Adds a new profile
    Add {
        /// Unique profile name
        name: String,
        /// Git username (user.name)
        username: String,
        /// Git email (user.email)
        email: String,
        /// Default branch for new repositories
        #[arg(long, default_value = "main")]
        branch: String,
        /// Private key to register with the SSH agent on switch
        #[arg(long)]
        ssh_key: Option<PathBuf>,
        /// Push automatically after commit (caller policy)
        #[arg(long)]
        auto_push: bool,
        /// Sign commits (caller policy)
        #[arg(long)]
        sign_commits: bool,
    },
    /// Updates fields of an existing profile; the name itself is immutable
    Update {
        /// Name of the profile to update
        name: String,
        /// New git username
        #[arg(long)]
        username: Option<String>,
        /// New git email
        #[arg(long)]
        email: Option<String>,
        /// New default branch
        #[arg(long)]
        branch: Option<String>,
        /// New SSH key path
        #[arg(long)]
        ssh_key: Option<PathBuf>,
    },
    /// Removes a profile
    Remove {
        /// Name of the profile to remove
        name: String,
    },
    /// Displays the active profile and what git config reports
    Current,
    /// Displays all stored profiles
    List,
    /// Exports the whole profile store to a JSON file
    Export {
        /// Destination file
        file: PathBuf,
    },
    /// Replaces the profile store with the contents of a JSON file
    Import {
        /// Source file
        file: PathBuf,
    },
    /// Tests SSH authentication against github.com
    TestSsh,
}
