//! HTTP surface for the rental booking core.
//!
//! Thin axum handlers over the repositories in `lendly_db`, plus the
//! booking service that orchestrates the availability ledger, the
//! payment gateway, and the event bus.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
