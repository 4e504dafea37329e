// modgrab/src/cli.rs
//! Defines the command-line argument structure using clap.
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use modgrab_common::config::{
    Config, DEFAULT_REQUESTS_PER_MINUTE, DEFAULT_WORKERS,
};
use modgrab_common::error::{ModError, Result};
use modgrab_core::Mod;
use std::path::PathBuf;

pub mod fetch;
pub mod resolve;

use crate::cli::fetch::FetchArgs;
use crate::cli::resolve::ResolveArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "modgrab", bin_name = "modgrab")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the dependency graph and download the mod set
    Fetch(FetchArgs),
    /// Resolve the dependency graph without downloading anything
    Resolve(ResolveArgs),
}

impl Command {
    pub async fn run(&self) -> Result<()> {
        match self {
            Self::Fetch(command) => command.run().await,
            Self::Resolve(command) => command.run().await,
        }
    }
}

/// Options shared by every command that resolves a mod set.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Mod slugs, project ids, or modrinth.com project URLs
    #[arg(required = true)]
    pub mods: Vec<String>,

    /// Target game version, e.g. 1.20.1
    #[arg(long, short = 'g')]
    pub game_version: String,

    /// Target mod loader, e.g. fabric
    #[arg(long, short = 'l')]
    pub loader: String,

    /// Only require client-side support
    #[arg(long, conflicts_with = "server_only")]
    pub client_only: bool,

    /// Only require server-side support
    #[arg(long)]
    pub server_only: bool,

    /// Resolve optional dependencies as well
    #[arg(long)]
    pub allow_optional: bool,

    /// Concurrent worker count
    #[arg(long, short = 'j', default_value_t = DEFAULT_WORKERS)]
    pub jobs: usize,

    /// Ceiling on outbound registry requests per minute
    #[arg(long, default_value_t = DEFAULT_REQUESTS_PER_MINUTE)]
    pub rpm: u32,

    /// Write the finalized dependency graph as JSON
    #[arg(long, value_name = "PATH")]
    pub graph: Option<PathBuf>,
}

impl TargetArgs {
    pub fn to_config(&self) -> Config {
        let mut config = Config::new(&self.game_version, &self.loader);
        config.require_client = !self.server_only;
        config.require_server = !self.client_only;
        config.allow_optional = self.allow_optional;
        config.workers = self.jobs;
        config.requests_per_minute = self.rpm;
        config
    }

    /// Builds the seed set. A malformed identifier is fatal for that entry
    /// only; the run continues with the rest.
    pub fn seed_mods(&self) -> Result<Vec<Mod>> {
        let mut seeds = Vec::new();
        for input in &self.mods {
            match Mod::new(input) {
                Ok(m) => seeds.push(m),
                Err(e) => eprintln!("{} {}", "Warning:".yellow().bold(), e),
            }
        }
        if seeds.is_empty() {
            return Err(ModError::Config(
                "no valid mod identifiers were given".into(),
            ));
        }
        Ok(seeds)
    }
}
