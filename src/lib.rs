//! Regional energy balance, capacity expansion and price outlook.
//!
//! The calculators ([`balance`], [`recommend`], [`price`], [`demand`]) are
//! pure functions of the region profile table. Weather, climate and
//! electricity-sales data come from [`sources`], each behind a caching
//! [`gateway`] that falls back to deterministic simulated data.

#[cfg(feature = "api")]
pub mod api;
pub mod balance;
pub mod config;
pub mod demand;
pub mod engine;
pub mod error;
pub mod forecast;
/// Caching, retrying, deduplicating access to remote data.
pub mod gateway;
pub mod io;
pub mod price;
pub mod profile;
pub mod recommend;
pub mod report;
pub mod sources;
pub mod telemetry;
