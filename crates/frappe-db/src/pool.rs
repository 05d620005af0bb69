//! # Shop Database Handle
//!
//! Opens the SQLite store the coffee shop runs on and hands out the
//! inventory and menu repositories.
//!
//! ```text
//! DbConfig ──► Database::new ──► SqlitePool ──┬──► db.inventory()
//!              (pragmas, migrate)             └──► db.menu()
//! ```
//!
//! Every connection has `foreign_keys` on; menu ingredient lines rely on it.
//! A file store also gets WAL with NORMAL sync. `:memory:` keeps one
//! connection alive for the lifetime of the pool, since closing it would
//! throw the data away.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::inventory::InventoryRepository;
use crate::repository::menu::MenuRepository;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the shop's data lives and how many connections may reach it.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/frappuccino/shop.db").max_connections(8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DbConfig {
    /// Store file, or [`IN_MEMORY_PATH`]
    pub database_path: PathBuf,

    /// Pool ceiling (5)
    pub max_connections: u32,

    /// Connections held open while the shop is quiet (1)
    pub min_connections: u32,

    /// How long a request waits for a free connection (30s)
    pub connect_timeout: Duration,

    /// File stores only; idle connections above the floor close after this (10m)
    pub idle_timeout: Duration,

    /// Bring the schema up to date in [`Database::new`] (on)
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed store at `path`, created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Private throwaway store; two pools never see each other's rows.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
                .foreign_keys(true);
            return Ok(options);
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.database_path)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // ON DELETE CASCADE / RESTRICT on menu ingredients depend on this
            .foreign_keys(true)
            .create_if_missing(true);
        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open shop store. Clones share one pool.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./frappuccino.db")).await?;
/// let milk = db.inventory().retrieve_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects, applies the pragmas from the module docs and, unless
    /// disabled, migrates the schema.
    ///
    /// ## Returns
    /// * `Err(DbError::ConnectionFailed)` - File can't be opened or created
    /// * `Err(DbError::MigrationFailed)` - Schema couldn't be brought up to date
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening shop database");

        let connect_options = config.connect_options()?;


        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout);

        pool_options = if config.is_in_memory() {
            pool_options.idle_timeout(None).max_lifetime(None)
        } else {
            pool_options.idle_timeout(Some(config.idle_timeout))
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            in_memory = config.is_in_memory(),
            max_connections = config.max_connections,
            "Pool ready"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations; already-applied ones are skipped.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        info!("Schema up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.pool.clone())
    }

    pub fn menu(&self) -> MenuRepository {
        MenuRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repositories handed out earlier fail from now on.
    pub async fn close(&self) {
        info!("Closing shop database");
        self.pool.close().await;
    }

    /// `SELECT 1` succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_closed_database_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_in_memory_enforces_foreign_keys() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_pools_are_isolated() {
        let first = Database::new(DbConfig::in_memory()).await.unwrap();
        let second = Database::new(DbConfig::in_memory()).await.unwrap();

        sqlx::query("INSERT INTO inventory (name, quantity, unit) VALUES ('Milk', 1, 'l')")
            .execute(first.pool())
            .await
            .unwrap();

        assert_eq!(first.inventory().count().await.unwrap(), 1);
        assert_eq!(second.inventory().count().await.unwrap(), 0);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
