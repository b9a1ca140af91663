//! Common test utilities for API integration tests
//!
//! This module provides shared test infrastructure for integration tests:
//! an in-memory application harness, seed data builders and environment
//! fixtures for configuration tests.

#![allow(unused_imports)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
