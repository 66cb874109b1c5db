//! StoreRate Backend Library
//!
//! Role-based store-rating platform: users browse and rate stores, owners
//! see aggregates for their store, admins manage the platform. Exposes all
//! modules for use by the binary and the integration tests.

pub mod api;
pub mod auth;
pub mod db;
pub mod middleware;
pub mod models;
pub mod validation;
