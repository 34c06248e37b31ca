//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod app_inventory;
pub mod app_terminate;
pub mod cached;
pub mod config_service;
pub mod paging;
pub mod resource_inventory;
pub mod retry;
pub mod session_poller;
