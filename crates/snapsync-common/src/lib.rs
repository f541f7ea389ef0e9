//! # snapsync-common
//!
//! Shared types, configuration, error handling, and utilities used across all SnapSync
//! Admin crates. No database access and no HTTP routing, just primitives and contracts.

pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod pagination;
pub mod validation;
