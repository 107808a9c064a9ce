use super::{sql_limit, sql_offset, Page};
use crate::database::models::{BookSummary, ListingItem, ListingRecord, ListingStatus};
use crate::pagination::PageRequest;
use anyhow::Result;
use rusqlite::{params, Connection};

pub(super) struct SqliteListingRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> super::ListingRepository for SqliteListingRepository<'conn> {
    fn create(&self, record: &ListingRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO listings (id, profile_id, book_id, status, price, transaction_type, condition, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id,
                record.profile_id,
                record.book_id,
                record.status,
                record.price,
                record.transaction_type,
                record.condition,
                record.created_at
            ],
        )?;
        Ok(())
    }

    fn page_for_profile(
        &self,
        profile_id: &str,
        status: Option<ListingStatus>,
        request: PageRequest,
    ) -> Result<Page<ListingItem>> {
        let total: i64 = self.conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM listings
            WHERE profile_id = ?1 AND (?2 IS NULL OR status = ?2)
            "#,
            params![profile_id, status],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT l.id, l.status, l.price, l.transaction_type, l.created_at,
                   b.id, b.title, b.author, b.cover_image
            FROM listings l
            LEFT JOIN books b ON b.id = l.book_id
            WHERE l.profile_id = ?1 AND (?2 IS NULL OR l.status = ?2)
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT ?3 OFFSET ?4
            "#,
        )?;
        let rows = stmt.query_map(
            params![profile_id, status, sql_limit(request), sql_offset(request)],
            |row| {
                let book = match row.get::<_, Option<String>>(5)? {
                    Some(id) => Some(BookSummary {
                        id,
                        title: row.get(6)?,
                        author: row.get(7)?,
                        cover_image: row.get(8)?,
                    }),
                    None => None,
                };
                Ok(ListingItem {
                    id: row.get(0)?,
                    status: row.get(1)?,
                    price: row.get(2)?,
                    transaction_type: row.get(3)?,
                    created_at: row.get(4)?,
                    book,
                })
            },
        )?;

        let mut listings = Vec::new();
        for row in rows {
            listings.push(row?);
        }
        Ok((listings, total as u64))
    }
}
