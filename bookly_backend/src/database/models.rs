use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Stores a fieldless enum as its upper-case name in a TEXT column.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw {
                    $($text => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|err: UnknownVariant| FromSqlError::Other(Box::new(err)))
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    User,
    Bookstore,
    SecondhandStore,
}

text_enum!(AccountType, "account type", {
    User => "USER",
    Bookstore => "BOOKSTORE",
    SecondhandStore => "SECONDHAND_STORE",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Active,
    Sold,
    Rented,
    Inactive,
}

text_enum!(ListingStatus, "listing status", {
    Active => "ACTIVE",
    Sold => "SOLD",
    Rented => "RENTED",
    Inactive => "INACTIVE",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Sale,
    Exchange,
    Rental,
}

text_enum!(TransactionType, "transaction type", {
    Sale => "SALE",
    Exchange => "EXCHANGE",
    Rental => "RENTAL",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookCondition {
    New,
    LikeNew,
    Good,
    Acceptable,
    Poor,
}

text_enum!(BookCondition, "book condition", {
    New => "NEW",
    LikeNew => "LIKE_NEW",
    Good => "GOOD",
    Acceptable => "ACCEPTABLE",
    Poor => "POOR",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub account_type: AccountType,
    pub created_at: String,
    pub updated_at: String,
}

/// Column changes for a profile update. `None`/`Undefined` columns are left
/// as stored; `updated_at` is always written.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: crate::patch::Patch<String>,
    pub avatar: crate::patch::Patch<String>,
    pub bio: crate::patch::Patch<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub cover_image: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

/// Shared shape of `bookstores` and `secondhand_stores` rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: String,
    pub name: String,
    pub profile_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: String,
    pub profile_id: String,
    pub book_id: String,
    pub status: ListingStatus,
    pub price: Option<f64>,
    pub transaction_type: TransactionType,
    pub condition: BookCondition,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: String,
    pub profile_id: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub book_id: Option<String>,
    pub listing_id: Option<String>,
    pub bookstore_id: Option<String>,
    pub secondhand_store_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: String,
    pub profile_id: String,
    pub book_id: Option<String>,
    pub listing_id: Option<String>,
    pub bookstore_id: Option<String>,
    pub secondhand_store_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItemRecord {
    pub id: String,
    pub profile_id: String,
    pub notes: Option<String>,
    pub book_id: Option<String>,
    pub listing_id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendshipRecord {
    pub id: String,
    pub profile_id: String,
    pub friend_id: String,
    pub created_at: String,
}

// Read shapes with joined relations embedded inline.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingItem {
    pub id: String,
    pub status: ListingStatus,
    pub price: Option<f64>,
    pub transaction_type: TransactionType,
    pub created_at: String,
    pub book: Option<BookSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: String,
    pub book: Option<BookRef>,
    pub listing: Option<ListingRef>,
    pub bookstore: Option<StoreRef>,
    pub secondhand_store: Option<StoreRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub id: String,
    pub created_at: String,
    pub book_id: Option<String>,
    pub listing_id: Option<String>,
    pub bookstore_id: Option<String>,
    pub secondhand_store_id: Option<String>,
    pub book: Option<BookRef>,
    pub listing: Option<ListingRef>,
    pub bookstore: Option<StoreRef>,
    pub secondhand_store: Option<StoreRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: String,
    pub created_at: String,
    pub notes: Option<String>,
    pub book_id: Option<String>,
    pub listing_id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub book: Option<BookRef>,
    pub listing: Option<ListingRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// One stored friendship edge with the profile on the other end embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendshipRow {
    pub id: String,
    pub created_at: String,
    pub counterpart: ProfileSummary,
}
