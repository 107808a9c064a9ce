mod books;
mod favorites;
mod friendships;
mod listings;
mod profiles;
mod reviews;
mod stores;
mod wishlist;

use super::models::{
    BookRecord, FavoriteItem, FavoriteRecord, FriendshipRecord, FriendshipRow, ListingItem,
    ListingRecord, ListingStatus, ProfileChanges, ProfileRecord, ReviewItem, ReviewRecord,
    StoreRecord, WishlistItem, WishlistItemRecord,
};
use crate::pagination::PageRequest;
use anyhow::Result;
use rusqlite::Connection;

/// One page of rows plus the exact number of rows matching the same filter.
pub type Page<T> = (Vec<T>, u64);

pub trait ProfileRepository {
    fn create(&self, record: &ProfileRecord) -> Result<()>;
    fn get(&self, id: &str) -> Result<Option<ProfileRecord>>;
    fn get_by_email(&self, email: &str) -> Result<Option<ProfileRecord>>;
    fn get_by_user_id(&self, user_id: &str) -> Result<Option<ProfileRecord>>;
    /// Returns `None` when no profile has the given id.
    fn update(&self, id: &str, changes: &ProfileChanges) -> Result<Option<ProfileRecord>>;
}

pub trait BookRepository {
    fn create(&self, record: &BookRecord) -> Result<()>;
    fn get(&self, id: &str) -> Result<Option<BookRecord>>;
}

pub trait StoreRepository {
    fn create_bookstore(&self, record: &StoreRecord) -> Result<()>;
    fn create_secondhand_store(&self, record: &StoreRecord) -> Result<()>;
}

pub trait ListingRepository {
    fn create(&self, record: &ListingRecord) -> Result<()>;
    fn page_for_profile(
        &self,
        profile_id: &str,
        status: Option<ListingStatus>,
        request: PageRequest,
    ) -> Result<Page<ListingItem>>;
}

pub trait ReviewRepository {
    fn create(&self, record: &ReviewRecord) -> Result<()>;
    fn page_for_profile(&self, profile_id: &str, request: PageRequest) -> Result<Page<ReviewItem>>;
}

pub trait FavoriteRepository {
    fn create(&self, record: &FavoriteRecord) -> Result<()>;
    fn page_for_profile(&self, profile_id: &str, request: PageRequest)
        -> Result<Page<FavoriteItem>>;
}

pub trait WishlistRepository {
    fn create(&self, record: &WishlistItemRecord) -> Result<()>;
    fn page_for_profile(&self, profile_id: &str, request: PageRequest)
        -> Result<Page<WishlistItem>>;
}

pub trait FriendshipRepository {
    fn create(&self, record: &FriendshipRecord) -> Result<()>;
    /// Edges where `profile_id` is the initiator, embedding the friend.
    fn list_initiated(&self, profile_id: &str, limit: Option<usize>) -> Result<Vec<FriendshipRow>>;
    /// Edges where `profile_id` is the recipient, embedding the initiator.
    fn list_received(&self, profile_id: &str, limit: Option<usize>) -> Result<Vec<FriendshipRow>>;
}

pub struct SqliteRepositories<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRepositories<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn profiles(&self) -> impl ProfileRepository + '_ {
        profiles::SqliteProfileRepository { conn: self.conn }
    }

    pub fn books(&self) -> impl BookRepository + '_ {
        books::SqliteBookRepository { conn: self.conn }
    }

    pub fn stores(&self) -> impl StoreRepository + '_ {
        stores::SqliteStoreRepository { conn: self.conn }
    }

    pub fn listings(&self) -> impl ListingRepository + '_ {
        listings::SqliteListingRepository { conn: self.conn }
    }

    pub fn reviews(&self) -> impl ReviewRepository + '_ {
        reviews::SqliteReviewRepository { conn: self.conn }
    }

    pub fn favorites(&self) -> impl FavoriteRepository + '_ {
        favorites::SqliteFavoriteRepository { conn: self.conn }
    }

    pub fn wishlist(&self) -> impl WishlistRepository + '_ {
        wishlist::SqliteWishlistRepository { conn: self.conn }
    }

    pub fn friendships(&self) -> impl FriendshipRepository + '_ {
        friendships::SqliteFriendshipRepository { conn: self.conn }
    }

    pub fn conn(&self) -> &'conn Connection {
        self.conn
    }
}

fn sql_limit(request: PageRequest) -> i64 {
    i64::try_from(request.limit()).unwrap_or(i64::MAX)
}

fn sql_offset(request: PageRequest) -> i64 {
    i64::try_from(request.offset()).unwrap_or(i64::MAX)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::database::models::{AccountType, BookCondition, TransactionType};
    use crate::database::MIGRATIONS;

    pub(crate) use super::{BookRepository, ListingRepository, ProfileRepository};

    pub(crate) fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory db");
        conn.execute_batch(MIGRATIONS).expect("migrations");
        conn
    }

    pub(crate) fn profile(id: &str, name: &str) -> ProfileRecord {
        ProfileRecord {
            id: id.into(),
            user_id: format!("auth-{id}"),
            email: format!("{id}@example.com"),
            name: name.into(),
            phone: None,
            avatar: None,
            bio: None,
            account_type: AccountType::User,
            created_at: "2024-01-01T00:00:00.000Z".into(),
            updated_at: "2024-01-01T00:00:00.000Z".into(),
        }
    }

    pub(crate) fn book(id: &str, title: &str) -> BookRecord {
        BookRecord {
            id: id.into(),
            title: title.into(),
            author: Some("Author".into()),
            isbn: None,
            cover_image: None,
            description: None,
            created_at: "2024-01-01T00:00:00.000Z".into(),
        }
    }

    pub(crate) fn listing(id: &str, profile_id: &str, book_id: &str, status: ListingStatus, minute: u32) -> ListingRecord {
        ListingRecord {
            id: id.into(),
            profile_id: profile_id.into(),
            book_id: book_id.into(),
            status,
            price: Some(10.0),
            transaction_type: TransactionType::Sale,
            condition: BookCondition::Good,
            created_at: format!("2024-02-01T10:{minute:02}:00.000Z"),
        }
    }
}
