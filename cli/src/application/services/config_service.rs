//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::StudioConfig;

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<StudioConfig> {
    store.load()
}

/// Validate and persist one setting, returning the updated config.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the file cannot be
/// read or written. The file is left untouched on validation errors.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<StudioConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}
