//! Prospector app: operator facade over the core state machine and the
//! effect engine, plus logging setup for the binary.
mod client;
pub mod logging;

pub use client::DashboardClient;
