#![feature(int_roundings)]

//! Domain logic for the rental booking and escrow core.
//!
//! This crate has zero internal dependencies so the availability and
//! escrow rules can be exercised by the DB/API layers and by unit tests
//! without a running database.

pub mod availability;
pub mod error;
pub mod escrow;
pub mod pricing;
pub mod types;
