// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock navigation adapter with recorded URL replacements.

use std::sync::Mutex;

use tutorchat_core::traits::NavigationAdapter;
use tutorchat_core::types::{CounterpartId, RouteState};

/// A mock routing layer for testing the selection binder.
///
/// Starts from a configurable [`RouteState`] and records every
/// `replace_query` call. Replacements update the held state the way a real
/// router would: the query parameter is rewritten and any route-style path
/// segment is dropped.
#[derive(Default)]
pub struct MockNavigation {
    state: Mutex<RouteState>,
    replacements: Mutex<Vec<Option<CounterpartId>>>,
}

impl MockNavigation {
    /// A navigation surface with no route inputs (plain `/messages` visit).
    pub fn new() -> Self {
        Self::default()
    }

    /// A navigation surface entered via `/messages/{counterpart}`.
    pub fn with_route_param(counterpart: &str) -> Self {
        Self {
            state: Mutex::new(RouteState {
                route_param: Some(CounterpartId(counterpart.into())),
                query_param: None,
            }),
            replacements: Mutex::new(Vec::new()),
        }
    }

    /// A navigation surface entered via `/messages?chatId={counterpart}`.
    pub fn with_query_param(counterpart: &str) -> Self {
        Self {
            state: Mutex::new(RouteState {
                route_param: None,
                query_param: Some(CounterpartId(counterpart.into())),
            }),
            replacements: Mutex::new(Vec::new()),
        }
    }

    /// Every `replace_query` argument, in call order.
    pub fn replacements(&self) -> Vec<Option<CounterpartId>> {
        self.replacements.lock().expect("lock poisoned").clone()
    }

    /// The `chatId` query parameter currently in the URL.
    pub fn current_query(&self) -> Option<CounterpartId> {
        self.state.lock().expect("lock poisoned").query_param.clone()
    }

    /// The route-style path segment currently in the URL.
    pub fn current_route_param(&self) -> Option<CounterpartId> {
        self.state.lock().expect("lock poisoned").route_param.clone()
    }
}

impl NavigationAdapter for MockNavigation {
    fn route(&self) -> RouteState {
        self.state.lock().expect("lock poisoned").clone()
    }

    fn replace_query(&self, selection: Option<&CounterpartId>) {
        let mut state = self.state.lock().expect("lock poisoned");
        state.query_param = selection.cloned();
        state.route_param = None;
        self.replacements
            .lock()
            .expect("lock poisoned")
            .push(selection.cloned());
    }
}
