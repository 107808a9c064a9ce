use crate::database::models::BookRecord;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

pub(super) struct SqliteBookRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> super::BookRepository for SqliteBookRepository<'conn> {
    fn create(&self, record: &BookRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO books (id, title, author, isbn, cover_image, description, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.id,
                record.title,
                record.author,
                record.isbn,
                record.cover_image,
                record.description,
                record.created_at
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<BookRecord>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT id, title, author, isbn, cover_image, description, created_at
                FROM books
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(BookRecord {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        author: row.get(2)?,
                        isbn: row.get(3)?,
                        cover_image: row.get(4)?,
                        description: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}
