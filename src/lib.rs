// ABOUTME: Platewise client SDK: typed API operations, session state, and payload normalization
// ABOUTME: The presentation-independent layer the mobile screens bind to
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! Client SDK for the Platewise meal-tracking backend.
//!
//! Screens talk to the backend through [`PlatewiseClient`], which wraps a
//! single [`Gateway`] (one best-effort HTTP call per operation, uniform
//! logging and error normalization) and a [`SessionManager`] (the one
//! owner of persisted tokens). Loose backend payloads for meals and
//! weekly plans are converted into the canonical [`Meal`] and
//! [`WeeklyPlan`] types by the [`normalizer`] module, which never fails:
//! unresolvable fields degrade to defaults instead of aborting a render.

/// Typed API operations and the launch-route decision
pub mod client;
/// Backend origin and timeout configuration
pub mod config;
/// Error taxonomy shared by every operation
pub mod errors;
/// Shared HTTP request gateway
pub mod gateway;
/// Tracing subscriber setup helper
pub mod logging;
/// Canonical UI-facing data model
pub mod models;
/// Backend payload shape normalization
pub mod normalizer;
/// Session persistence and subscription
pub mod session;
/// Request lifecycle tracking for screens
pub mod state;

pub use client::{LaunchRoute, PlatewiseClient, RecommendOutcome, SignupOutcome, WeeklyPlanPage};
pub use config::ClientConfig;
pub use errors::{ApiError, ApiResult};
pub use gateway::Gateway;
pub use logging::init_logging;
pub use models::{CartItem, DayTotals, MacroBreakdown, Meal, SectionMap, SignupProfile, WeeklyPlan};
pub use normalizer::{classify_plan, normalize_meal, normalize_plan, normalize_sections, PlanKind};
pub use session::{FileTokenStore, MemoryTokenStore, Session, SessionManager, TokenStore};
pub use state::{RequestState, RequestTracker};
