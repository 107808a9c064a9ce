use crate::database::models::StoreRecord;
use anyhow::Result;
use rusqlite::{params, Connection};

pub(super) struct SqliteStoreRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> SqliteStoreRepository<'conn> {
    fn insert(&self, table: &str, record: &StoreRecord) -> Result<()> {
        let sql = format!(
            "INSERT INTO {table} (id, name, profile_id, created_at) VALUES (?1, ?2, ?3, ?4)"
        );
        self.conn.execute(
            &sql,
            params![record.id, record.name, record.profile_id, record.created_at],
        )?;
        Ok(())
    }
}

impl<'conn> super::StoreRepository for SqliteStoreRepository<'conn> {
    fn create_bookstore(&self, record: &StoreRecord) -> Result<()> {
        self.insert("bookstores", record)
    }

    fn create_secondhand_store(&self, record: &StoreRecord) -> Result<()> {
        self.insert("secondhand_stores", record)
    }
}
