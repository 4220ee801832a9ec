// ABOUTME: Typed API operations over the gateway: OTP auth, weekly plans, recommendations, cart
// ABOUTME: Persists tokens through the session manager and decides the app-launch route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use crate::config::ClientConfig;
use crate::errors::{ApiError, ApiResult};
use crate::gateway::Gateway;
use crate::models::{CartItem, SignupProfile, WeeklyPlan};
use crate::normalizer::normalize_plan;
use crate::session::{Session, SessionManager, TokenStore};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Endpoint paths, one block so a backend change is a one-line edit
mod paths {
    pub const LOGIN: &str = "/users/login";
    pub const SIGNUP: &str = "/users/signup";
    pub const VERIFY_OTP: &str = "/users/verify-otp";
    pub const GET_WEEKLY: &str = "/users/getWeekly";
    pub const RECOMMEND_MEALS: &str = "/users/recommend-meals";
    pub const CART: &str = "/cart";
    pub const CHECKOUT: &str = "/cart/checkout";
}

/// Where the app should land on launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchRoute {
    /// No session: show login
    Login,
    /// Logged in but the registration wizard is unfinished
    Onboarding,
    /// Logged in and onboarded: home dashboard
    Home,
}

/// Outcome of a signup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    /// Backend confirmation message, shown to the user
    pub message: String,
    /// Validity window of the OTP that was just sent, when reported
    pub otp_expires_in_seconds: Option<u64>,
}

/// Weekly-plan screen payload.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyPlanPage {
    /// Backend user id, when reported
    pub user_id: Option<String>,
    /// Display name for the greeting, when reported
    pub name: Option<String>,
    /// Normalized plan; empty when the backend sent none
    pub plan: WeeklyPlan,
}

/// Outcome of a meal recommendation request.
///
/// An HTTP 200 with `success: false` is not a transport failure; the
/// screen decides how to present it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendOutcome {
    /// Whether the backend produced a plan
    pub success: bool,
    /// Backend message, shown to the user either way
    pub message: String,
    /// Normalized plan; empty when none was returned
    pub plan: WeeklyPlan,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignupResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    otp_expires_in_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtpResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    onboarded: Option<bool>,
}

/// Client for the Platewise backend.
///
/// One instance per app; screens call the typed operations and bind to
/// the session manager for auth state.
pub struct PlatewiseClient {
    gateway: Gateway,
    session: SessionManager,
}

impl PlatewiseClient {
    /// Build a client over the given token store.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> ApiResult<Self> {
        Ok(Self {
            gateway: Gateway::new(config)?,
            session: SessionManager::new(store),
        })
    }

    /// Session state provider shared by every screen.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Bearer token for authenticated calls, failing fast before any
    /// network I/O when no session is held.
    fn bearer(&self) -> ApiResult<String> {
        let session = self.session.current();
        session
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Session("not logged in".into()))
    }

    /// Request an OTP for an existing account.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures; a 404 means the phone number is not
    /// registered.
    pub async fn request_otp(&self, phone_number: &str) -> ApiResult<()> {
        info!("requesting login OTP");
        self.gateway
            .post(
                paths::LOGIN,
                None,
                Some(&json!({ "phoneNumber": phone_number })),
            )
            .await?;
        Ok(())
    }

    /// Create an account from the registration wizard payload and trigger
    /// the first OTP.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures and [`ApiError::Parse`] when the
    /// success shape is malformed.
    pub async fn sign_up(&self, profile: &SignupProfile) -> ApiResult<SignupOutcome> {
        info!("submitting signup profile");
        let body = serde_json::to_value(profile).map_err(|e| ApiError::Parse {
            endpoint: "signup request",
            source: e,
        })?;
        let value = self.gateway.post(paths::SIGNUP, None, Some(&body)).await?;
        let response: SignupResponse =
            serde_json::from_value(value).map_err(|e| ApiError::Parse {
                endpoint: "signup",
                source: e,
            })?;
        Ok(SignupOutcome {
            message: response.message,
            otp_expires_in_seconds: response.otp_expires_in_seconds,
        })
    }

    /// Verify the OTP and persist the issued tokens.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures (a 400 means a wrong or expired code),
    /// [`ApiError::Parse`] when tokens are missing from the response, and
    /// [`ApiError::Session`] when persisting fails.
    pub async fn verify_otp(&self, phone_number: &str, otp: &str) -> ApiResult<()> {
        let value = self
            .gateway
            .post(
                paths::VERIFY_OTP,
                None,
                Some(&json!({ "phoneNumber": phone_number, "otp": otp })),
            )
            .await?;
        let response: VerifyOtpResponse =
            serde_json::from_value(value).map_err(|e| ApiError::Parse {
                endpoint: "verify-otp",
                source: e,
            })?;

        let onboarded = response
            .onboarded
            .unwrap_or_else(|| self.session.current().onboarded);
        self.session
            .save(Session {
                access_token: Some(response.access_token),
                refresh_token: Some(response.refresh_token),
                onboarded,
            })
            .await?;
        info!("OTP verified, session established");
        Ok(())
    }

    /// Drop the persisted session.
    ///
    /// # Errors
    ///
    /// Propagates token store failures.
    pub async fn logout(&self) -> ApiResult<()> {
        info!("logging out");
        self.session.clear().await
    }

    /// App-launch redirect decision, from the persisted session.
    ///
    /// # Errors
    ///
    /// Propagates token store failures.
    pub async fn launch_route(&self) -> ApiResult<LaunchRoute> {
        let session = self.session.load().await?;
        let route = if !session.is_logged_in() {
            LaunchRoute::Login
        } else if !session.onboarded {
            LaunchRoute::Onboarding
        } else {
            LaunchRoute::Home
        };
        debug!(?route, "launch route decided");
        Ok(route)
    }

    /// Fetch the user's weekly plan.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures; 404 (no plan yet) and 401 surface to
    /// the screen. An absent `weeklyPlan` in a 2xx body is not an error:
    /// the page carries an empty plan.
    pub async fn get_weekly_plan(&self) -> ApiResult<WeeklyPlanPage> {
        let bearer = self.bearer()?;
        let value = self.gateway.get(paths::GET_WEEKLY, Some(&bearer)).await?;

        let page = WeeklyPlanPage {
            user_id: value
                .get("userId")
                .and_then(Value::as_str)
                .map(str::to_string),
            name: value
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            plan: normalize_plan(&value),
        };
        debug!(meals = page.plan.meal_count(), "weekly plan normalized");
        Ok(page)
    }

    /// Ask the backend to generate a fresh weekly recommendation.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn recommend_meals(&self) -> ApiResult<RecommendOutcome> {
        let bearer = self.bearer()?;
        let value = self
            .gateway
            .post(paths::RECOMMEND_MEALS, Some(&bearer), None)
            .await?;

        let success = value
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let plan = normalize_plan(&value);
        info!(success, meals = plan.meal_count(), "recommendation received");
        Ok(RecommendOutcome {
            success,
            message,
            plan,
        })
    }

    /// Fetch the cart contents.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures and [`ApiError::Parse`] when items are
    /// malformed.
    pub async fn get_cart(&self) -> ApiResult<Vec<CartItem>> {
        let bearer = self.bearer()?;
        let value = self.gateway.get(paths::CART, Some(&bearer)).await?;

        // The cart endpoint has returned both a bare array and an object
        // wrapping one under `items`.
        let items = if value.is_array() {
            value
        } else {
            value
                .get("items")
                .or_else(|| value.get("cart"))
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new()))
        };
        serde_json::from_value(items).map_err(|e| ApiError::Parse {
            endpoint: "cart",
            source: e,
        })
    }

    /// Place the order; the backend clears the cart on success.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn checkout(&self) -> ApiResult<String> {
        let bearer = self.bearer()?;
        let value = self.gateway.post(paths::CHECKOUT, Some(&bearer), None).await?;
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Order placed")
            .to_string();
        info!(%message, "checkout completed");
        Ok(message)
    }
}
