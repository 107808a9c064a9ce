use super::{sql_limit, sql_offset, Page};
use crate::database::models::{BookRef, ListingRef, WishlistItem, WishlistItemRecord};
use crate::pagination::PageRequest;
use anyhow::Result;
use rusqlite::{params, Connection};

pub(super) struct SqliteWishlistRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> super::WishlistRepository for SqliteWishlistRepository<'conn> {
    fn create(&self, record: &WishlistItemRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO wishlist_items (id, profile_id, notes, book_id, listing_id, title, author, isbn, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                record.id,
                record.profile_id,
                record.notes,
                record.book_id,
                record.listing_id,
                record.title,
                record.author,
                record.isbn,
                record.created_at
            ],
        )?;
        Ok(())
    }

    fn page_for_profile(
        &self,
        profile_id: &str,
        request: PageRequest,
    ) -> Result<Page<WishlistItem>> {
        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM wishlist_items WHERE profile_id = ?1",
            params![profile_id],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT w.id, w.created_at, w.notes, w.book_id, w.listing_id, w.title, w.author, w.isbn,
                   b.id, b.title, l.id
            FROM wishlist_items w
            LEFT JOIN books b ON b.id = w.book_id
            LEFT JOIN listings l ON l.id = w.listing_id
            WHERE w.profile_id = ?1
            ORDER BY w.created_at DESC, w.id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )?;
        let rows = stmt.query_map(
            params![profile_id, sql_limit(request), sql_offset(request)],
            |row| {
                let book = match row.get::<_, Option<String>>(8)? {
                    Some(id) => Some(BookRef {
                        id,
                        title: row.get(9)?,
                    }),
                    None => None,
                };
                Ok(WishlistItem {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    notes: row.get(2)?,
                    book_id: row.get(3)?,
                    listing_id: row.get(4)?,
                    title: row.get(5)?,
                    author: row.get(6)?,
                    isbn: row.get(7)?,
                    book,
                    listing: row.get::<_, Option<String>>(10)?.map(|id| ListingRef { id }),
                })
            },
        )?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok((items, total as u64))
    }
}
