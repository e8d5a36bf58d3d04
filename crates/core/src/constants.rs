//! Shared constants for ocdtracker.
//!
//! Centralizes defaults that the HTTP, storage and CLI crates all need.

/// Page size used when the caller does not supply a usable `limit`.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Offset used when the caller does not supply a usable `offset`.
pub const DEFAULT_PAGE_OFFSET: u32 = 0;

/// Maximum number of log entries returned by a single page (DoS protection).
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Startup connection: attempts before giving up.
pub const DB_CONNECT_MAX_ATTEMPTS: u32 = 10;

/// Startup connection: fixed delay between attempts, in seconds.
pub const DB_CONNECT_RETRY_DELAY_SECS: u64 = 5;

/// Upper bound on a single request, after which its future is dropped.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default HTTP listen port.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Highest accepted `notification_interval`, in hours.
pub const MAX_NOTIFICATION_INTERVAL: i32 = 24;

/// Highest accepted `anxiety_level`.
pub const MAX_ANXIETY_LEVEL: i32 = 10;
