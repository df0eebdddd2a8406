//! Middleware for observability.
//!
//! This module provides request audit logging with identity attribution
//! and latency tracking.

pub mod audit;

pub use audit::{audit_log, AuditContext};
