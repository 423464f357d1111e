// Copyright 2026 Vantage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Vantage — headless verification harness for the IAM admin console.
//!
//! Drives Chromium through the login → admin-permissions flow with the
//! backend mocked at the CDP network layer, and captures screenshot evidence.
//! The library exposes the building blocks (fixture token, route mocks,
//! browser lifecycle, bounded waits) for integration testing; the `vantage`
//! binary wires them into the full scenario.

pub mod browser;
pub mod cli;
pub mod error;
pub mod mock;
pub mod scenario;
pub mod token;
pub mod wait;

pub use error::{Error, Result};
pub use scenario::{run, Outcome, VerifyConfig};
pub use token::FixtureToken;
