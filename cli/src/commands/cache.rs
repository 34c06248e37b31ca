//! `studioctl cache`: manage the on-disk result cache.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ResultCache;
use crate::infra::cache::DiskCache;

/// Cache subcommands.
#[derive(Subcommand)]
pub enum CacheCommand {
    /// Remove every cached listing
    Clear,
}

/// Run the cache command.
///
/// `clear` always targets the disk cache, even under `--no-cache`.
///
/// # Errors
///
/// Returns an error if an entry cannot be removed.
pub fn run(app: &AppContext, cmd: CacheCommand) -> Result<ExitCode> {
    match cmd {
        CacheCommand::Clear => {
            let removed = DiskCache::new()?.clear()?;
            tracing::info!(removed, "cache cleared");
            app.renderer().render_cache_cleared(removed)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
