pub(crate) mod migrate;
pub(crate) mod serve;
pub(crate) mod stats;

use anyhow::Result;
use ocdtracker_core::DatabaseConfig;
use ocdtracker_storage::PgStorage;

/// Connect with the configured retry policy, without touching the schema.
pub(crate) async fn connect() -> Result<PgStorage> {
    let config = DatabaseConfig::from_env()?;
    Ok(PgStorage::connect(&config).await?)
}
