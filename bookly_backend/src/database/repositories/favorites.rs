use super::{sql_limit, sql_offset, Page};
use crate::database::models::{BookRef, FavoriteItem, FavoriteRecord, ListingRef, StoreRef};
use crate::pagination::PageRequest;
use anyhow::Result;
use rusqlite::{params, Connection};

pub(super) struct SqliteFavoriteRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> super::FavoriteRepository for SqliteFavoriteRepository<'conn> {
    fn create(&self, record: &FavoriteRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO favorites (id, profile_id, book_id, listing_id, bookstore_id, secondhand_store_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.id,
                record.profile_id,
                record.book_id,
                record.listing_id,
                record.bookstore_id,
                record.secondhand_store_id,
                record.created_at
            ],
        )?;
        Ok(())
    }

    fn page_for_profile(
        &self,
        profile_id: &str,
        request: PageRequest,
    ) -> Result<Page<FavoriteItem>> {
        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM favorites WHERE profile_id = ?1",
            params![profile_id],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT f.id, f.created_at, f.book_id, f.listing_id, f.bookstore_id, f.secondhand_store_id,
                   b.title, bs.name, ss.name, l.id
            FROM favorites f
            LEFT JOIN books b ON b.id = f.book_id
            LEFT JOIN listings l ON l.id = f.listing_id
            LEFT JOIN bookstores bs ON bs.id = f.bookstore_id
            LEFT JOIN secondhand_stores ss ON ss.id = f.secondhand_store_id
            WHERE f.profile_id = ?1
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )?;
        let rows = stmt.query_map(
            params![profile_id, sql_limit(request), sql_offset(request)],
            |row| {
                let book_id: Option<String> = row.get(2)?;
                let listing_id: Option<String> = row.get(3)?;
                let bookstore_id: Option<String> = row.get(4)?;
                let secondhand_store_id: Option<String> = row.get(5)?;
                let book_title: Option<String> = row.get(6)?;
                let bookstore_name: Option<String> = row.get(7)?;
                let secondhand_store_name: Option<String> = row.get(8)?;
                let joined_listing: Option<String> = row.get(9)?;

                Ok(FavoriteItem {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    book: book_id
                        .clone()
                        .zip(book_title)
                        .map(|(id, title)| BookRef { id, title }),
                    listing: joined_listing.map(|id| ListingRef { id }),
                    bookstore: bookstore_id
                        .clone()
                        .zip(bookstore_name)
                        .map(|(id, name)| StoreRef { id, name }),
                    secondhand_store: secondhand_store_id
                        .clone()
                        .zip(secondhand_store_name)
                        .map(|(id, name)| StoreRef { id, name }),
                    book_id,
                    listing_id,
                    bookstore_id,
                    secondhand_store_id,
                })
            },
        )?;

        let mut favorites = Vec::new();
        for row in rows {
            favorites.push(row?);
        }
        Ok((favorites, total as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::{FavoriteRepository, ListingRepository, SqliteRepositories};
    use crate::database::models::{FavoriteRecord, ListingStatus};
    use crate::pagination::PageRequest;

    #[test]
    fn favorites_keep_raw_keys_and_embeds() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        repos.profiles().create(&profile("p1", "Ana")).unwrap();
        repos.profiles().create(&profile("p2", "Bia")).unwrap();
        repos.books().create(&book("b1", "Vidas Secas")).unwrap();
        repos
            .listings()
            .create(&listing("l1", "p2", "b1", ListingStatus::Active, 1))
            .unwrap();

        for (id, book_id, listing_id, at) in [
            ("f1", Some("b1"), None, "2024-06-01T00:00:00.000Z"),
            ("f2", None, Some("l1"), "2024-06-02T00:00:00.000Z"),
        ] {
            repos
                .favorites()
                .create(&FavoriteRecord {
                    id: id.into(),
                    profile_id: "p1".into(),
                    book_id: book_id.map(Into::into),
                    listing_id: listing_id.map(Into::into),
                    bookstore_id: None,
                    secondhand_store_id: None,
                    created_at: at.into(),
                })
                .unwrap();
        }

        let (items, total) = repos
            .favorites()
            .page_for_profile("p1", PageRequest::of(1, 1).unwrap())
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "f2");
        assert_eq!(items[0].listing_id.as_deref(), Some("l1"));
        assert_eq!(items[0].listing.as_ref().map(|l| l.id.as_str()), Some("l1"));
        assert!(items[0].book.is_none());

        let (items, _) = repos
            .favorites()
            .page_for_profile("p1", PageRequest::of(2, 1).unwrap())
            .unwrap();
        assert_eq!(items[0].book.as_ref().map(|b| b.title.as_str()), Some("Vidas Secas"));
    }
}
