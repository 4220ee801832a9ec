// ABOUTME: Tracing subscriber setup for embedders and examples
// ABOUTME: EnvFilter-driven level selection with a compact formatter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global tracing subscriber.
///
/// `RUST_LOG` overrides `default_level`. Library code only emits events;
/// calling this is the embedding application's choice.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a subscriber is
/// already installed.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init()?;
    Ok(())
}
