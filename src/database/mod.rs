use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use tracing::info;

use crate::config::AppConfig;

#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    /// Builds the connection pool for the waitlist database.
    /// Connections are established lazily on first use, so startup only
    /// depends on valid configuration, not on backend reachability.
    pub fn init(config: &AppConfig) -> Self {
        info!("{:<20} - Initializing the DB pool", "init_db");
        // NOTE: Tests sometimes fail if there is more than 1 max connection. This fixes it.
        let max_cons = if cfg!(test) { 1 } else { 5 };

        let con_opts = config.db_config.connection_options();

        let db = PgPoolOptions::new()
            .max_connections(max_cons)
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy_with(con_opts);

        Self { db }
    }

    /// Creates the database named in `config` and runs the migrations on it.
    /// Used by the integration tests to get a clean, isolated database per run.
    pub async fn configure_for_test(config: &AppConfig) -> Result<()> {
        let db_config = &config.db_config;
        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;

        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;

        // Pool only used to migrate the DB
        let db_pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_millis(1000))
            .connect_with(db_config.connection_options())
            .await
            .map_err(|ex| Error::FailToCreatePool(format!("Test Config: {}", ex)))?;
        sqlx::migrate!("./migrations").run(&db_pool).await?;

        Ok(())
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create db pool: {0}")]
    FailToCreatePool(String),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("sqlx migration error: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
}
