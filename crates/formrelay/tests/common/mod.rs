//! Shared test utilities for formrelay integration tests.
//!
//! This module provides:
//! - `TestHarness` wiring real in-memory stores to recording fakes
//! - Builders for settings
//! - Fakes for uploaders, accounts, notifications, downloads and launches

pub mod builders;
pub mod fakes;
pub mod harness;

pub use builders::*;
pub use fakes::*;
pub use harness::TestHarness;
