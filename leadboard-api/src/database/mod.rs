pub mod leads;
pub mod migrations;
pub mod users;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

use shared_types::{Lead, SourceTable};

pub type DbConnection = Arc<Mutex<Connection>>;

#[derive(Clone)]
pub struct AsyncDbConnection {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl AsyncDbConnection {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn lock(&self) -> PooledConnection<SqliteConnectionManager> {
        self.pool
            .get()
            .expect("Failed to get DB connection from pool")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Change-feed event published after every successful mutation, consumed by
/// the realtime sync bridge.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub table: SourceTable,
    pub lead: Lead,
}

pub struct Database {
    pub connection: DbConnection,
    pub async_connection: AsyncDbConnection,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Database {
    /// Create a new database connection and run migrations
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        // Ensure directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create sync connection first and run migrations
        let sync_conn = Connection::open(db_path)?;
        let sync_mutex = Arc::new(Mutex::new(sync_conn));

        // Run migrations on sync connection before opening async connections
        {
            let conn = sync_mutex
                .lock()
                .map_err(|_| anyhow::anyhow!("Database connection poisoned during init"))?;
            migrations::run_migrations(&conn)?;
        }

        // Now open pooled connections - they will see the migrated schema
        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(8).build(manager)?;

        let (changes, _) = broadcast::channel(64);

        Ok(Database {
            connection: sync_mutex,
            async_connection: AsyncDbConnection::new(pool),
            changes,
        })
    }

    pub fn subscribe_changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// Dropped silently when nobody is subscribed.
    pub(crate) fn publish_change(&self, event: ChangeEvent) {
        let _ = self.changes.send(event);
    }
}

pub fn default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("leadboard").join("leadboard.sqlite3")
    } else {
        PathBuf::from("leadboard.sqlite3")
    }
}
