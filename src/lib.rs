//! Solcast Daily Library
//!
//! Fetches (or reuses a cached) Solcast rooftop PV forecast and turns it
//! into per-day energy totals. The binary is a thin wrapper around
//! [`app::run`]; the modules are public for integration tests.

pub mod aggregate;
pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod report;
pub mod timezone;
