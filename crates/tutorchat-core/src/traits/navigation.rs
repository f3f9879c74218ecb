// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Navigation adapter trait for the routing/URL boundary.

use crate::types::{CounterpartId, RouteState};

/// Adapter for the host's routing layer.
///
/// The selection binder reads route inputs through this trait and mirrors
/// the active selection back into the URL. It never performs network I/O.
pub trait NavigationAdapter: Send + Sync {
    /// Current navigation inputs: the route-style counterpart segment and
    /// the `chatId` query parameter.
    fn route(&self) -> RouteState;

    /// Rewrites the URL to the canonical query-parameter form.
    ///
    /// Replace semantics: the current history entry is replaced, never
    /// pushed, so the engine's own writes add no back/forward steps.
    /// `None` removes the parameter. Any route-style path segment is
    /// dropped, leaving only the `chatId` convention in the URL.
    fn replace_query(&self, selection: Option<&CounterpartId>);
}
