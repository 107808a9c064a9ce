pub mod models;
pub mod repositories;

use crate::config::BooklyPaths;
use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub(crate) const MIGRATIONS: &str = r#"
    PRAGMA journal_mode = WAL;
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS profiles (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        phone TEXT,
        avatar TEXT,
        bio TEXT,
        account_type TEXT NOT NULL DEFAULT 'USER',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS books (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        author TEXT,
        isbn TEXT UNIQUE,
        cover_image TEXT,
        description TEXT,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS bookstores (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        profile_id TEXT,
        created_at TEXT NOT NULL,
        FOREIGN KEY (profile_id) REFERENCES profiles(id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS secondhand_stores (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        profile_id TEXT,
        created_at TEXT NOT NULL,
        FOREIGN KEY (profile_id) REFERENCES profiles(id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS listings (
        id TEXT PRIMARY KEY,
        profile_id TEXT NOT NULL,
        book_id TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'ACTIVE',
        price REAL,
        transaction_type TEXT NOT NULL,
        condition TEXT NOT NULL DEFAULT 'GOOD',
        created_at TEXT NOT NULL,
        FOREIGN KEY (profile_id) REFERENCES profiles(id) ON DELETE CASCADE,
        FOREIGN KEY (book_id) REFERENCES books(id)
    );

    CREATE TABLE IF NOT EXISTS reviews (
        id TEXT PRIMARY KEY,
        profile_id TEXT NOT NULL,
        rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
        comment TEXT,
        book_id TEXT,
        listing_id TEXT,
        bookstore_id TEXT,
        secondhand_store_id TEXT,
        created_at TEXT NOT NULL,
        CHECK (
            (book_id IS NOT NULL) + (listing_id IS NOT NULL)
            + (bookstore_id IS NOT NULL) + (secondhand_store_id IS NOT NULL) <= 1
        ),
        FOREIGN KEY (profile_id) REFERENCES profiles(id) ON DELETE CASCADE,
        FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE SET NULL,
        FOREIGN KEY (listing_id) REFERENCES listings(id) ON DELETE SET NULL,
        FOREIGN KEY (bookstore_id) REFERENCES bookstores(id) ON DELETE SET NULL,
        FOREIGN KEY (secondhand_store_id) REFERENCES secondhand_stores(id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS favorites (
        id TEXT PRIMARY KEY,
        profile_id TEXT NOT NULL,
        book_id TEXT,
        listing_id TEXT,
        bookstore_id TEXT,
        secondhand_store_id TEXT,
        created_at TEXT NOT NULL,
        FOREIGN KEY (profile_id) REFERENCES profiles(id) ON DELETE CASCADE,
        FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE,
        FOREIGN KEY (listing_id) REFERENCES listings(id) ON DELETE CASCADE,
        FOREIGN KEY (bookstore_id) REFERENCES bookstores(id) ON DELETE CASCADE,
        FOREIGN KEY (secondhand_store_id) REFERENCES secondhand_stores(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS wishlist_items (
        id TEXT PRIMARY KEY,
        profile_id TEXT NOT NULL,
        notes TEXT,
        book_id TEXT,
        listing_id TEXT,
        title TEXT,
        author TEXT,
        isbn TEXT,
        created_at TEXT NOT NULL,
        FOREIGN KEY (profile_id) REFERENCES profiles(id) ON DELETE CASCADE,
        FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE SET NULL,
        FOREIGN KEY (listing_id) REFERENCES listings(id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS friendships (
        id TEXT PRIMARY KEY,
        profile_id TEXT NOT NULL,
        friend_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE (profile_id, friend_id),
        CHECK (profile_id <> friend_id),
        FOREIGN KEY (profile_id) REFERENCES profiles(id) ON DELETE CASCADE,
        FOREIGN KEY (friend_id) REFERENCES profiles(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_listings_profile ON listings(profile_id, created_at);
    CREATE INDEX IF NOT EXISTS idx_reviews_profile ON reviews(profile_id, created_at);
    CREATE INDEX IF NOT EXISTS idx_favorites_profile ON favorites(profile_id, created_at);
    CREATE INDEX IF NOT EXISTS idx_wishlist_profile ON wishlist_items(profile_id, created_at);
    CREATE INDEX IF NOT EXISTS idx_friendships_profile ON friendships(profile_id, created_at);
    CREATE INDEX IF NOT EXISTS idx_friendships_friend ON friendships(friend_id, created_at);
"#;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    newly_created: bool,
}

impl Database {
    pub fn connect(paths: &BooklyPaths) -> Result<Self> {
        let newly_created = !paths.db_path.exists();
        let conn = Connection::open(&paths.db_path)
            .with_context(|| format!("failed to open database at {}", paths.db_path.display()))?;
        Ok(Self::from_connection(conn, newly_created))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn, true))
    }

    pub fn from_connection(conn: Connection, newly_created: bool) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            newly_created,
        }
    }

    /// Applies the schema. Returns whether the database file was created by
    /// this process.
    pub fn ensure_migrations(&self) -> Result<bool> {
        self.with_conn(|conn| {
            conn.execute_batch(MIGRATIONS)?;
            Ok(())
        })?;
        Ok(self.newly_created)
    }

    pub fn with_repositories<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(repositories::SqliteRepositories<'_>) -> Result<T>,
    {
        self.with_conn(|conn| {
            let repos = repositories::SqliteRepositories::new(conn);
            f(repos)
        })
    }

    /// Runs `f` against the repositories on the blocking thread pool so async
    /// callers never hold the connection lock on a runtime worker.
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(repositories::SqliteRepositories<'_>) -> Result<T> + Send + 'static,
    {
        let database = self.clone();
        tokio::task::spawn_blocking(move || database.with_repositories(f))
            .await
            .context("database task failed to complete")?
    }

    fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|_| anyhow!("database mutex poisoned"))?;
        f(&guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let db = Database::open_in_memory().expect("in-memory db");
        assert!(db.ensure_migrations().expect("first run"));
        db.ensure_migrations().expect("second run");
        let tables: i64 = db
            .with_repositories(|repos| {
                Ok(repos.conn().query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('profiles', 'listings', 'friendships')",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(tables, 3);
    }

    #[tokio::test]
    async fn run_executes_on_blocking_pool() {
        let db = Database::open_in_memory().expect("in-memory db");
        db.ensure_migrations().unwrap();
        let count: i64 = db
            .run(|repos| Ok(repos.conn().query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
