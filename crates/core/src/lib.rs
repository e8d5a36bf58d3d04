//! Core types for ocdtracker
//!
//! This crate contains the domain entities, validation rules, pagination and
//! identity types, and environment-driven configuration shared across all
//! other crates.

mod account;
mod config;
pub mod constants;
pub mod env_config;
mod error;
mod identity;
mod ocdlog;
mod pagination;

pub use account::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use identity::*;
pub use ocdlog::*;
pub use pagination::*;
