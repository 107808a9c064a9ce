use super::{sql_limit, sql_offset, Page};
use crate::database::models::{BookRef, ListingRef, ReviewItem, ReviewRecord, StoreRef};
use crate::pagination::PageRequest;
use anyhow::Result;
use rusqlite::{params, Connection};

pub(super) struct SqliteReviewRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> super::ReviewRepository for SqliteReviewRepository<'conn> {
    fn create(&self, record: &ReviewRecord) -> Result<()> {
        if !(1..=5).contains(&record.rating) {
            anyhow::bail!("review rating must be between 1 and 5 (got {})", record.rating);
        }
        self.conn.execute(
            r#"
            INSERT INTO reviews (id, profile_id, rating, comment, book_id, listing_id, bookstore_id, secondhand_store_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                record.id,
                record.profile_id,
                record.rating,
                record.comment,
                record.book_id,
                record.listing_id,
                record.bookstore_id,
                record.secondhand_store_id,
                record.created_at
            ],
        )?;
        Ok(())
    }

    fn page_for_profile(&self, profile_id: &str, request: PageRequest) -> Result<Page<ReviewItem>> {
        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE profile_id = ?1",
            params![profile_id],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT r.id, r.rating, r.comment, r.created_at,
                   b.id, b.title,
                   l.id,
                   bs.id, bs.name,
                   ss.id, ss.name
            FROM reviews r
            LEFT JOIN books b ON b.id = r.book_id
            LEFT JOIN listings l ON l.id = r.listing_id
            LEFT JOIN bookstores bs ON bs.id = r.bookstore_id
            LEFT JOIN secondhand_stores ss ON ss.id = r.secondhand_store_id
            WHERE r.profile_id = ?1
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )?;
        let rows = stmt.query_map(
            params![profile_id, sql_limit(request), sql_offset(request)],
            |row| {
                let book = match row.get::<_, Option<String>>(4)? {
                    Some(id) => Some(BookRef {
                        id,
                        title: row.get(5)?,
                    }),
                    None => None,
                };
                let listing = row.get::<_, Option<String>>(6)?.map(|id| ListingRef { id });
                let bookstore = match row.get::<_, Option<String>>(7)? {
                    Some(id) => Some(StoreRef {
                        id,
                        name: row.get(8)?,
                    }),
                    None => None,
                };
                let secondhand_store = match row.get::<_, Option<String>>(9)? {
                    Some(id) => Some(StoreRef {
                        id,
                        name: row.get(10)?,
                    }),
                    None => None,
                };
                Ok(ReviewItem {
                    id: row.get(0)?,
                    rating: row.get(1)?,
                    comment: row.get(2)?,
                    created_at: row.get(3)?,
                    book,
                    listing,
                    bookstore,
                    secondhand_store,
                })
            },
        )?;

        let mut reviews = Vec::new();
        for row in rows {
            reviews.push(row?);
        }
        Ok((reviews, total as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::{ReviewRepository, SqliteRepositories, StoreRepository};
    use crate::database::models::{ReviewRecord, StoreRecord};
    use crate::pagination::PageRequest;

    fn review(id: &str, rating: u8) -> ReviewRecord {
        ReviewRecord {
            id: id.into(),
            profile_id: "p1".into(),
            rating,
            comment: None,
            book_id: None,
            listing_id: None,
            bookstore_id: None,
            secondhand_store_id: None,
            created_at: format!("2024-05-01T00:00:0{}.000Z", rating),
        }
    }

    #[test]
    fn reviews_embed_their_single_subject() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        repos.profiles().create(&profile("p1", "Ana")).unwrap();
        repos
            .stores()
            .create_bookstore(&StoreRecord {
                id: "s1".into(),
                name: "Livraria Santos".into(),
                profile_id: None,
                created_at: "2024-01-01T00:00:00.000Z".into(),
            })
            .unwrap();

        let mut on_store = review("r1", 5);
        on_store.bookstore_id = Some("s1".into());
        repos.reviews().create(&on_store).unwrap();
        repos.reviews().create(&review("r2", 3)).unwrap();

        let (items, total) = repos
            .reviews()
            .page_for_profile("p1", PageRequest::default())
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(items[0].id, "r1");
        assert_eq!(items[0].bookstore.as_ref().map(|s| s.name.as_str()), Some("Livraria Santos"));
        assert!(items[0].book.is_none());
        assert!(items[1].bookstore.is_none());
    }

    #[test]
    fn invalid_reviews_are_rejected() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        repos.profiles().create(&profile("p1", "Ana")).unwrap();
        assert!(repos.reviews().create(&review("r0", 0)).is_err());

        repos.books().create(&book("b1", "Grande Sertão")).unwrap();
        let mut two_subjects = review("r1", 4);
        two_subjects.book_id = Some("b1".into());
        two_subjects.bookstore_id = Some("s1".into());
        assert!(repos.reviews().create(&two_subjects).is_err());
    }
}
