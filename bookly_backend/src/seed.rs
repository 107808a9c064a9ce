//! Demo data for local development: a reader, a bookstore and a secondhand
//! store trading a handful of books.

use crate::database::models::{
    AccountType, BookCondition, BookRecord, FavoriteRecord, FriendshipRecord, ListingRecord,
    ListingStatus, ProfileRecord, ReviewRecord, StoreRecord, TransactionType,
};
use crate::database::repositories::{
    BookRepository, FavoriteRepository, FriendshipRepository, ListingRepository,
    ProfileRepository, ReviewRepository, StoreRepository,
};
use crate::database::Database;
use crate::utils::now_utc_iso;
use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

pub const READER_EMAIL: &str = "joao.silva@email.com";
pub const BOOKSTORE_EMAIL: &str = "maria.santos@livraria.com";
pub const SECONDHAND_EMAIL: &str = "pedro.costa@sebo.com";

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedSummary {
    pub skipped: bool,
    pub profiles: usize,
    pub books: usize,
    pub listings: usize,
    pub reviews: usize,
    pub friendships: usize,
    pub favorites: usize,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn profile(
    user_id: &str,
    email: &str,
    name: &str,
    phone: &str,
    bio: &str,
    account_type: AccountType,
    now: &str,
) -> ProfileRecord {
    ProfileRecord {
        id: new_id(),
        user_id: user_id.into(),
        email: email.into(),
        name: name.into(),
        phone: Some(phone.into()),
        avatar: None,
        bio: Some(bio.into()),
        account_type,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn book(title: &str, author: &str, isbn: &str, description: &str, now: &str) -> BookRecord {
    BookRecord {
        id: new_id(),
        title: title.into(),
        author: Some(author.into()),
        isbn: Some(isbn.into()),
        cover_image: None,
        description: Some(description.into()),
        created_at: now.into(),
    }
}

/// Inserts the demo data set in one transaction. Re-running is a no-op once
/// the reader profile exists.
pub fn seed_demo_data(database: &Database) -> Result<SeedSummary> {
    database.with_repositories(|repos| {
        if repos.profiles().get_by_email(READER_EMAIL)?.is_some() {
            tracing::info!("demo data already present, skipping seed");
            return Ok(SeedSummary {
                skipped: true,
                ..Default::default()
            });
        }

        let now = now_utc_iso();
        let tx = repos.conn().unchecked_transaction()?;

        let joao = profile(
            "auth-user-1",
            READER_EMAIL,
            "João Silva",
            "(11) 99999-1111",
            "Apaixonado por livros de ficção e tecnologia.",
            AccountType::User,
            &now,
        );
        let maria = profile(
            "auth-user-2",
            BOOKSTORE_EMAIL,
            "Maria Santos",
            "(11) 88888-2222",
            "Proprietária da Livraria Santos há 15 anos.",
            AccountType::Bookstore,
            &now,
        );
        let pedro = profile(
            "auth-user-3",
            SECONDHAND_EMAIL,
            "Pedro Costa",
            "(11) 77777-3333",
            "Proprietário do Sebo Costa, especializado em livros raros.",
            AccountType::SecondhandStore,
            &now,
        );
        for record in [&joao, &maria, &pedro] {
            repos.profiles().create(record)?;
        }

        repos.stores().create_bookstore(&StoreRecord {
            id: new_id(),
            name: "Livraria Santos".into(),
            profile_id: Some(maria.id.clone()),
            created_at: now.clone(),
        })?;
        repos.stores().create_secondhand_store(&StoreRecord {
            id: new_id(),
            name: "Sebo Costa".into(),
            profile_id: Some(pedro.id.clone()),
            created_at: now.clone(),
        })?;

        let books = [
            book(
                "O Senhor dos Anéis",
                "J.R.R. Tolkien",
                "9788535902775",
                "Uma das maiores obras de fantasia da literatura mundial.",
                &now,
            ),
            book(
                "Clean Code",
                "Robert C. Martin",
                "9788573025639",
                "Um guia para escrever código limpo e legível.",
                &now,
            ),
            book(
                "1984",
                "George Orwell",
                "9788535909552",
                "Um clássico da literatura distópica.",
                &now,
            ),
        ];
        for record in &books {
            repos.books().create(record)?;
        }

        let listings = [
            (&joao, &books[0], BookCondition::LikeNew, Some(45.0), TransactionType::Sale),
            (&maria, &books[1], BookCondition::New, Some(89.90), TransactionType::Sale),
            (&pedro, &books[2], BookCondition::Good, Some(0.0), TransactionType::Exchange),
        ]
        .map(|(owner, book, condition, price, transaction_type)| ListingRecord {
            id: new_id(),
            profile_id: owner.id.clone(),
            book_id: book.id.clone(),
            status: ListingStatus::Active,
            price,
            transaction_type,
            condition,
            created_at: now.clone(),
        });
        for record in &listings {
            repos.listings().create(record)?;
        }

        let reviews = [
            (&joao, &listings[1], 5, "Excelente atendimento! O livro chegou em perfeito estado."),
            (&maria, &listings[2], 4, "Sebo muito organizado, encontrei livros raros."),
        ];
        for (author, listing, rating, comment) in reviews {
            repos.reviews().create(&ReviewRecord {
                id: new_id(),
                profile_id: author.id.clone(),
                rating,
                comment: Some(comment.into()),
                book_id: None,
                listing_id: Some(listing.id.clone()),
                bookstore_id: None,
                secondhand_store_id: None,
                created_at: now.clone(),
            })?;
        }

        for friend in [&maria, &pedro] {
            repos.friendships().create(&FriendshipRecord {
                id: new_id(),
                profile_id: joao.id.clone(),
                friend_id: friend.id.clone(),
                created_at: now.clone(),
            })?;
        }

        for (owner, listing) in [(&joao, &listings[1]), (&maria, &listings[2])] {
            repos.favorites().create(&FavoriteRecord {
                id: new_id(),
                profile_id: owner.id.clone(),
                book_id: None,
                listing_id: Some(listing.id.clone()),
                bookstore_id: None,
                secondhand_store_id: None,
                created_at: now.clone(),
            })?;
        }

        tx.commit()?;

        let summary = SeedSummary {
            skipped: false,
            profiles: 3,
            books: books.len(),
            listings: listings.len(),
            reviews: reviews.len(),
            friendships: 2,
            favorites: 2,
        };
        tracing::info!(?summary, "seeded demo data");
        Ok(summary)
    })
}
