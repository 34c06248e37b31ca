//! Integration tests for studioctl
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them reach AWS: they cover argument parsing and the commands
//! that only touch local files.

mod cli_tests;
