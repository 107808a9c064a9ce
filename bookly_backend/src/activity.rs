//! Profile-scoped listing, review, favorite and wishlist pages.
//!
//! Each query pages in the database (`LIMIT`/`OFFSET`) and counts under the
//! same predicate, so `total` is exact and filtered.

use crate::database::models::{FavoriteItem, ListingItem, ListingStatus, ReviewItem, WishlistItem};
use crate::database::repositories::{
    FavoriteRepository, ListingRepository, ReviewRepository, WishlistRepository,
};
use crate::database::Database;
use crate::pagination::{PageRequest, PaginatedResult};
use anyhow::Result;

#[derive(Clone)]
pub struct ActivityService {
    database: Database,
}

impl ActivityService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub async fn get_my_listings(
        &self,
        profile_id: &str,
        request: PageRequest,
        status: Option<ListingStatus>,
    ) -> Result<PaginatedResult<ListingItem>> {
        let profile = profile_id.to_string();
        let (items, total) = self
            .database
            .run(move |repos| repos.listings().page_for_profile(&profile, status, request))
            .await?;
        tracing::debug!(
            profile_id,
            ?status,
            page = request.page(),
            returned = items.len(),
            total,
            "listings page"
        );
        Ok(PaginatedResult::new(items, total, request))
    }

    pub async fn get_my_reviews(
        &self,
        profile_id: &str,
        request: PageRequest,
    ) -> Result<PaginatedResult<ReviewItem>> {
        let profile = profile_id.to_string();
        let (items, total) = self
            .database
            .run(move |repos| repos.reviews().page_for_profile(&profile, request))
            .await?;
        tracing::debug!(profile_id, page = request.page(), total, "reviews page");
        Ok(PaginatedResult::new(items, total, request))
    }

    pub async fn get_my_favorites(
        &self,
        profile_id: &str,
        request: PageRequest,
    ) -> Result<PaginatedResult<FavoriteItem>> {
        let profile = profile_id.to_string();
        let (items, total) = self
            .database
            .run(move |repos| repos.favorites().page_for_profile(&profile, request))
            .await?;
        tracing::debug!(profile_id, page = request.page(), total, "favorites page");
        Ok(PaginatedResult::new(items, total, request))
    }

    pub async fn get_my_wishlist(
        &self,
        profile_id: &str,
        request: PageRequest,
    ) -> Result<PaginatedResult<WishlistItem>> {
        let profile = profile_id.to_string();
        let (items, total) = self
            .database
            .run(move |repos| repos.wishlist().page_for_profile(&profile, request))
            .await?;
        tracing::debug!(profile_id, page = request.page(), total, "wishlist page");
        Ok(PaginatedResult::new(items, total, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{
        AccountType, BookCondition, BookRecord, ListingRecord, ProfileRecord, TransactionType,
        WishlistItemRecord,
    };
    use crate::database::repositories::{BookRepository, ProfileRepository};

    fn setup() -> (Database, ActivityService) {
        let db = Database::open_in_memory().expect("in-memory db");
        db.ensure_migrations().expect("migrations");
        db.with_repositories(|repos| {
            repos.profiles().create(&ProfileRecord {
                id: "p1".into(),
                user_id: "auth-p1".into(),
                email: "ana@example.com".into(),
                name: "Ana".into(),
                phone: None,
                avatar: None,
                bio: None,
                account_type: AccountType::User,
                created_at: "2024-01-01T00:00:00.000Z".into(),
                updated_at: "2024-01-01T00:00:00.000Z".into(),
            })?;
            repos.books().create(&BookRecord {
                id: "b1".into(),
                title: "O Cortiço".into(),
                author: Some("Aluísio Azevedo".into()),
                isbn: None,
                cover_image: Some("https://covers/cortico.jpg".into()),
                description: None,
                created_at: "2024-01-01T00:00:00.000Z".into(),
            })
        })
        .unwrap();
        let service = ActivityService::new(db.clone());
        (db, service)
    }

    #[tokio::test]
    async fn listings_are_newest_first_with_book_embedded() {
        let (db, service) = setup();
        db.with_repositories(|repos| {
            for day in 1..=3 {
                repos.listings().create(&ListingRecord {
                    id: format!("l{day}"),
                    profile_id: "p1".into(),
                    book_id: "b1".into(),
                    status: ListingStatus::Active,
                    price: None,
                    transaction_type: TransactionType::Exchange,
                    condition: BookCondition::LikeNew,
                    created_at: format!("2024-03-0{day}T12:00:00.000Z"),
                })?;
            }
            Ok(())
        })
        .unwrap();

        let page = service
            .get_my_listings("p1", PageRequest::default(), None)
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        let ids: Vec<_> = page.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["l3", "l2", "l1"]);
        let book = page.items[0].book.as_ref().expect("book embedded");
        assert_eq!(book.cover_image.as_deref(), Some("https://covers/cortico.jpg"));
        assert_eq!(page.items[0].price, None);
    }

    #[tokio::test]
    async fn wishlist_supports_freeform_entries() {
        let (db, service) = setup();
        db.with_repositories(|repos| {
            repos.wishlist().create(&WishlistItemRecord {
                id: "w1".into(),
                profile_id: "p1".into(),
                notes: Some("any edition".into()),
                book_id: None,
                listing_id: None,
                title: Some("Macunaíma".into()),
                author: Some("Mário de Andrade".into()),
                isbn: None,
                created_at: "2024-04-01T00:00:00.000Z".into(),
            })?;
            repos.wishlist().create(&WishlistItemRecord {
                id: "w2".into(),
                profile_id: "p1".into(),
                notes: None,
                book_id: Some("b1".into()),
                listing_id: None,
                title: None,
                author: None,
                isbn: None,
                created_at: "2024-04-02T00:00:00.000Z".into(),
            })
        })
        .unwrap();

        let page = service
            .get_my_wishlist("p1", PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].book.as_ref().map(|b| b.title.as_str()), Some("O Cortiço"));
        assert_eq!(page.items[1].title.as_deref(), Some("Macunaíma"));
        assert!(page.items[1].book.is_none());
    }

    #[tokio::test]
    async fn empty_profile_yields_empty_page() {
        let (_db, service) = setup();
        let page = service
            .get_my_favorites("p1", PageRequest::default())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!((page.page, page.page_size), (1, 10));
    }

    #[tokio::test]
    async fn backend_failures_propagate_from_every_query() {
        let (db, service) = setup();
        db.with_repositories(|repos| {
            repos.conn().execute_batch(
                "DROP TABLE listings; DROP TABLE reviews; DROP TABLE favorites; DROP TABLE wishlist_items;",
            )?;
            Ok(())
        })
        .unwrap();

        let request = PageRequest::default();
        let listings = service.get_my_listings("p1", request, None).await;
        assert!(listings
            .unwrap_err()
            .to_string()
            .contains("no such table: listings"));
        assert!(service.get_my_reviews("p1", request).await.is_err());
        assert!(service.get_my_favorites("p1", request).await.is_err());
        assert!(service.get_my_wishlist("p1", request).await.is_err());
    }
}
