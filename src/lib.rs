//! Repfinder library
//!
//! Exposes the service modules for use in integration tests.

pub mod cache;
pub mod cli;
pub mod data;
pub mod error;
pub mod refresh;
pub mod server;
