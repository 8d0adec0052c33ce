use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Administer criteria, rounds, teams and users of the judging platform.
#[derive(Parser, Debug)]
#[command(name = "judging", version, about)]
pub(crate) struct Cli {
    /// Configuration file (defaults to `config/admin` when present)
    #[arg(long, global = true, env = "JUDGING_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Check that the stack is up: containers, backend health, frontend
    Smoke,
    /// Manage scoring criteria
    #[command(subcommand)]
    Criteria(CriteriaCommand),
    /// Manage judging rounds
    #[command(subcommand)]
    Round(RoundCommand),
    /// Manage teams
    #[command(subcommand)]
    Team(TeamCommand),
    /// Inspect user accounts
    #[command(subcommand)]
    User(UserCommand),
}

#[derive(Subcommand, Debug)]
pub(crate) enum CriteriaCommand {
    /// Create a criterion from a JSON or TOML draft
    Create { file: PathBuf },
    /// Update a criterion from a complete draft
    ///
    /// The draft replaces every stored field, so omitted fields are cleared.
    Update { id: String, file: PathBuf },
    Show { id: String },
}

#[derive(Subcommand, Debug)]
pub(crate) enum RoundCommand {
    /// Create a round from a draft listing its criteria ids
    Create { file: PathBuf },
    /// Update a round from a complete draft
    ///
    /// The draft replaces every stored field, so omitted fields are cleared.
    /// An empty `criteria` list keeps the current selection.
    Update { id: String, file: PathBuf },
    Show { id: String },
}

#[derive(Subcommand, Debug)]
pub(crate) enum TeamCommand {
    /// Create a team from a draft listing its members
    Create { file: PathBuf },
    /// Update a team from a complete draft
    ///
    /// The draft replaces every stored field and the whole member list.
    Update { id: String, file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub(crate) enum UserCommand {
    Show { id: String },
}
