//! Storage backend trait abstraction
//!
//! Async repository traits per entity, implemented by `PgStorage` and by
//! in-memory doubles in tests.

pub mod account;
pub mod ocdlog;

pub use account::AccountStore;
pub use ocdlog::LogStore;
