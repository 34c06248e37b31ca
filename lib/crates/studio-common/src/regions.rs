//! Region identifiers.

use thiserror::Error;

/// Regions scanned when the configuration does not name any.
pub const DEFAULT_REGIONS: &[&str] = &["us-east-1", "us-east-2", "us-west-1", "us-west-2"];

/// A region identifier that does not look like `xx-name-N`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid region '{0}': expected an identifier like us-east-1")]
pub struct RegionError(pub String);

/// Checks the shape of a region identifier (`us-east-1`, `us-gov-west-1`).
///
/// Only the shape is checked; whether the service is offered there is left to
/// the control plane.
pub fn validate_region(region: &str) -> Result<(), RegionError> {
    let parts: Vec<&str> = region.split('-').collect();
    let shape_ok = (3..=4).contains(&parts.len())
        && parts[0].len() == 2
        && parts[0].chars().all(|c| c.is_ascii_lowercase())
        && parts[1..parts.len() - 1]
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_lowercase()))
        && parts
            .last()
            .is_some_and(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));

    if shape_ok {
        Ok(())
    } else {
        Err(RegionError(region.to_string()))
    }
}
