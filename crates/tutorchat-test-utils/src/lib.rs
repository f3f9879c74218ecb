// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tutorchat integration tests.
//!
//! Provides a scripted [`MockGateway`], a recording [`MockNavigation`], and
//! fixture builders shared by the unit and integration suites.

pub mod fixtures;
pub mod mock_gateway;
pub mod mock_navigation;

pub use mock_gateway::MockGateway;
pub use mock_navigation::MockNavigation;
