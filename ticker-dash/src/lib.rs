#![forbid(unsafe_code)]
#![warn(unused, clippy::cloned_instead_of_copied)]

//! # Ticker-Dash
//! Terminal dashboard for a single ticker. On every tick the [`RefreshController`] loads
//! (cached) daily history, samples the latest one-minute bar, recomputes EMA10, RSI(14) and
//! Bollinger(20, 2) over the merged series and hands the chart changes to a
//! [`ChartRenderer`](render::ChartRenderer): a full rebuild the first time, a
//! [`ChartPatch`](patch::ChartPatch) afterwards.
//!
//! Ticks fire on a user-selected [`RefreshSpeed`] or on demand.

/// Keyboard handling and tick polling.
pub mod app;

/// Trace data for the price and RSI charts.
pub mod chart;

/// Environment configuration.
pub mod config;

/// Refresh pipeline state machine.
pub mod controller;

/// File-backed `tracing` setup.
pub mod logging;

/// Column diffs between chart renders.
pub mod patch;

/// Refresh speeds and tick scheduling.
pub mod refresh;

/// Renderer abstraction and retained chart store.
pub mod render;

/// Ratatui widgets.
pub mod ui;

pub use config::DashConfig;
pub use controller::{Phase, RefreshController, TickOutcome};
pub use refresh::RefreshSpeed;
