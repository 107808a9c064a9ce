//! Friend lists built from directed friendship edges.
//!
//! A friendship is stored once, as `profile_id -> friend_id`, but is
//! symmetric for both people. Listing a profile's friends therefore reads the
//! edges it initiated and the edges it received, normalises both into one
//! shape and paginates the merged list in memory. No single range query can
//! express that union, so this is the one query whose cost grows with the
//! full friend count rather than the page size; `friend_fetch_limit` bounds
//! each direction when that matters.

use crate::config::PaginationConfig;
use crate::database::models::{FriendshipRow, ProfileSummary};
use crate::database::repositories::FriendshipRepository;
use crate::database::Database;
use crate::pagination::{paginate_in_memory, PageRequest, PaginatedResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

pub type FriendProfile = ProfileSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendItem {
    /// Id of the underlying friendship edge.
    pub id: String,
    pub created_at: String,
    pub profile: FriendProfile,
}

/// A stored edge tagged with the side the queried profile sits on. The tag
/// only lives until [`FriendshipEdge::into_item`].
#[derive(Debug, Clone)]
enum FriendshipEdge {
    Initiated(FriendshipRow),
    Received(FriendshipRow),
}

impl FriendshipEdge {
    fn into_item(self) -> FriendItem {
        let row = match self {
            FriendshipEdge::Initiated(row) | FriendshipEdge::Received(row) => row,
        };
        FriendItem {
            id: row.id,
            created_at: row.created_at,
            profile: row.counterpart,
        }
    }
}

fn newest_first(a: &FriendItem, b: &FriendItem) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Erases edge direction, keeps one item per counterpart (the most recent
/// edge when a pair is stored both ways) and sorts newest first.
fn merge_edges(initiated: Vec<FriendshipRow>, received: Vec<FriendshipRow>) -> Vec<FriendItem> {
    let edges = initiated
        .into_iter()
        .map(FriendshipEdge::Initiated)
        .chain(received.into_iter().map(FriendshipEdge::Received));

    let mut by_counterpart: HashMap<String, FriendItem> = HashMap::new();
    for edge in edges {
        let item = edge.into_item();
        match by_counterpart.get(&item.profile.id) {
            Some(existing) if newest_first(existing, &item) != Ordering::Greater => {}
            _ => {
                by_counterpart.insert(item.profile.id.clone(), item);
            }
        }
    }

    let mut merged: Vec<FriendItem> = by_counterpart.into_values().collect();
    merged.sort_by(newest_first);
    merged
}

#[derive(Clone)]
pub struct FriendService {
    database: Database,
    fetch_limit: Option<usize>,
}

impl FriendService {
    pub fn new(database: Database, pagination: PaginationConfig) -> Self {
        Self {
            database,
            fetch_limit: pagination.friend_fetch_limit,
        }
    }

    pub async fn get_my_friends(
        &self,
        profile_id: &str,
        request: PageRequest,
    ) -> Result<PaginatedResult<FriendItem>> {
        let limit = self.fetch_limit;
        let initiator = profile_id.to_string();
        let recipient = profile_id.to_string();

        let (initiated, received) = tokio::try_join!(
            self.database
                .run(move |repos| repos.friendships().list_initiated(&initiator, limit)),
            self.database
                .run(move |repos| repos.friendships().list_received(&recipient, limit)),
        )?;

        if let Some(cap) = limit {
            if initiated.len() >= cap || received.len() >= cap {
                tracing::warn!(
                    profile_id,
                    cap,
                    initiated = initiated.len(),
                    received = received.len(),
                    "friend fetch cap reached; total is a lower bound"
                );
            }
        }

        let merged = merge_edges(initiated, received);
        tracing::debug!(profile_id, total = merged.len(), page = request.page(), "friends merged");
        Ok(paginate_in_memory(merged, request))
    }
}
