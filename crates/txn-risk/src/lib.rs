//! Deterministic risk scoring for payment transactions.
//!
//! The [`scoring`] module holds the pure evaluator. [`batch`], [`config`] and
//! [`telemetry`] are the plumbing the CLI and HTTP service build on.

pub mod batch;
pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
