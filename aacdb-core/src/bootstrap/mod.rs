//! Bootstrap module for provisioning the shelter database
//!
//! This module handles:
//! - Configuration loading
//! - Administrative connection setup
//! - The idempotent provisioning pass (user, collection, indexes)
//! - Read-only inspection of what is already provisioned

pub mod check;
pub mod config;
pub mod database;
pub mod runner;

pub use check::{inspect, Inspection};
pub use config::load_config;
pub use database::connect;
pub use runner::Bootstrapper;
