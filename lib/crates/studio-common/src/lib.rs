pub mod regions;
pub mod types;

pub use regions::{DEFAULT_REGIONS, RegionError, validate_region};
pub use types::*;
