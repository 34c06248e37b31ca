//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Inspect and clean up SageMaker Studio domains, apps and kernel sessions
#[derive(Parser)]
#[command(
    name = "studioctl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Ignore and do not update the result cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Answer yes to prompts; bulk terminate selects every matching app
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List domains across regions, with profiles and spaces of chosen domains
    Domains(commands::domains::DomainsArgs),

    /// List or bulk-terminate the apps of a region
    #[command(subcommand)]
    Apps(commands::apps::AppsCommand),

    /// Show live kernel sessions of a user profile or shared space
    Sessions(commands::sessions::SessionsArgs),

    /// Delete one app
    Terminate(commands::terminate::TerminateArgs),

    /// Manage the result cache
    #[command(subcommand)]
    Cache(commands::cache::CacheCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            no_cache,
            yes,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes, no_cache },
        })?;

        match command {
            Command::Domains(args) => commands::domains::run(&app, args).await,
            Command::Apps(cmd) => commands::apps::run(&app, cmd).await,
            Command::Sessions(args) => commands::sessions::run(&app, args).await,
            Command::Terminate(args) => commands::terminate::run(&app, args).await,
            Command::Cache(cmd) => commands::cache::run(&app, cmd),
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
