use crate::database::models::{FriendshipRecord, FriendshipRow, ProfileSummary};
use anyhow::Result;
use rusqlite::{params, Connection};

pub(super) struct SqliteFriendshipRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> SqliteFriendshipRepository<'conn> {
    /// `anchor` is the column holding the queried profile, `counterpart` the
    /// column whose profile gets embedded. An INNER JOIN drops edges whose
    /// counterpart profile no longer exists.
    fn list_edges(
        &self,
        anchor: &str,
        counterpart: &str,
        profile_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<FriendshipRow>> {
        let sql = format!(
            r#"
            SELECT f.id, f.created_at, p.id, p.name, p.avatar
            FROM friendships f
            JOIN profiles p ON p.id = f.{counterpart}
            WHERE f.{anchor} = ?1
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT ?2
            "#
        );
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![profile_id, limit], |row| {
            Ok(FriendshipRow {
                id: row.get(0)?,
                created_at: row.get(1)?,
                counterpart: ProfileSummary {
                    id: row.get(2)?,
                    name: row.get(3)?,
                    avatar: row.get(4)?,
                },
            })
        })?;

        let mut edges = Vec::new();
        for row in rows {
            edges.push(row?);
        }
        Ok(edges)
    }
}

impl<'conn> super::FriendshipRepository for SqliteFriendshipRepository<'conn> {
    fn create(&self, record: &FriendshipRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO friendships (id, profile_id, friend_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.id,
                record.profile_id,
                record.friend_id,
                record.created_at
            ],
        )?;
        Ok(())
    }

    fn list_initiated(&self, profile_id: &str, limit: Option<usize>) -> Result<Vec<FriendshipRow>> {
        self.list_edges("profile_id", "friend_id", profile_id, limit)
    }

    fn list_received(&self, profile_id: &str, limit: Option<usize>) -> Result<Vec<FriendshipRow>> {
        self.list_edges("friend_id", "profile_id", profile_id, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::{FriendshipRepository, SqliteRepositories};
    use crate::database::models::FriendshipRecord;

    fn edge(id: &str, from: &str, to: &str, at: &str) -> FriendshipRecord {
        FriendshipRecord {
            id: id.into(),
            profile_id: from.into(),
            friend_id: to.into(),
            created_at: at.into(),
        }
    }

    #[test]
    fn each_direction_embeds_the_other_side() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        for (id, name) in [("a", "Ana"), ("b", "Bia"), ("c", "Caio")] {
            repos.profiles().create(&profile(id, name)).unwrap();
        }
        repos
            .friendships()
            .create(&edge("f1", "a", "b", "2024-01-02T00:00:00.000Z"))
            .unwrap();
        repos
            .friendships()
            .create(&edge("f2", "c", "a", "2024-01-03T00:00:00.000Z"))
            .unwrap();

        let initiated = repos.friendships().list_initiated("a", None).unwrap();
        assert_eq!(initiated.len(), 1);
        assert_eq!(initiated[0].counterpart.name, "Bia");

        let received = repos.friendships().list_received("a", None).unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].counterpart.id, "c");

        assert_eq!(repos.friendships().list_received("b", Some(1)).unwrap()[0].id, "f1");
    }

    #[test]
    fn self_friendship_is_rejected() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        repos.profiles().create(&profile("a", "Ana")).unwrap();
        assert!(repos
            .friendships()
            .create(&edge("f1", "a", "a", "2024-01-02T00:00:00.000Z"))
            .is_err());
    }
}
