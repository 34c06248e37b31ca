//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: AWS SDK calls, notebook
//! runtime HTTP, the on-disk result cache and the YAML config file.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod cache;
pub mod config;
pub mod jupyter;
pub mod sagemaker;
