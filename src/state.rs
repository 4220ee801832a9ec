// ABOUTME: Explicit request lifecycle state shared by all screens
// ABOUTME: RequestTracker enforces the at-most-one-in-flight convention uniformly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use crate::errors::ApiResult;

/// Lifecycle of one screen-owned request.
///
/// Transitions happen only when a request starts or when the gateway
/// resolves or rejects it; screens bind their trigger controls to this
/// instead of re-implementing a disabled-button flag each time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    /// No request has been started, or the last one was acknowledged
    #[default]
    Idle,
    /// A request is outstanding; starting another is refused
    InFlight,
    /// The last request resolved
    Success,
    /// The last request was rejected
    Failed,
}

/// Per-screen request tracker.
#[derive(Debug, Default)]
pub struct RequestTracker {
    state: RequestState,
}

impl RequestTracker {
    /// Fresh tracker in the idle state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RequestState {
        self.state
    }

    /// True while a request is outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.state == RequestState::InFlight
    }

    /// Attempt to start a request. Returns false, leaving the state
    /// untouched, when one is already outstanding.
    pub fn begin(&mut self) -> bool {
        if self.is_in_flight() {
            return false;
        }
        self.state = RequestState::InFlight;
        true
    }

    /// Record the outcome of the outstanding request.
    pub fn settle<T>(&mut self, outcome: &ApiResult<T>) {
        self.state = if outcome.is_ok() {
            RequestState::Success
        } else {
            RequestState::Failed
        };
    }

    /// Return to idle, e.g. after the screen has shown the failure.
    pub fn reset(&mut self) {
        self.state = RequestState::Idle;
    }
}
