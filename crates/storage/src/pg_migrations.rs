//! PostgreSQL schema migrations for ocdtracker storage.

use sqlx::PgPool;

/// Run all PostgreSQL migrations. Every step is idempotent.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS account (
            id TEXT PRIMARY KEY,
            email TEXT,
            display_name TEXT,
            photo_url TEXT,
            wake_time TEXT,
            sleep_time TEXT,
            notification_interval INTEGER
                CHECK (notification_interval BETWEEN 0 AND 24),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // gen_random_uuid() is built in from PostgreSQL 13.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ocdlog (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            account_id TEXT NOT NULL REFERENCES account (id),
            ruminate_minutes INTEGER CHECK (ruminate_minutes >= 0),
            anxiety_level INTEGER CHECK (anxiety_level BETWEEN 0 AND 10),
            notes TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_ocdlog_account_created ON ocdlog (account_id, created_at)",
    )
    .execute(pool)
    .await?;

    tracing::debug!("PostgreSQL migrations applied");
    Ok(())
}
