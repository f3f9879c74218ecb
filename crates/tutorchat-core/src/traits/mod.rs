// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits at the engine's external seams.

pub mod gateway;
pub mod navigation;

pub use gateway::MessagingGateway;
pub use navigation::NavigationAdapter;
