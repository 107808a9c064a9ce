use crate::database::models::{ProfileChanges, ProfileRecord};
use crate::patch::Patch;
use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

pub(super) struct SqliteProfileRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

const PROFILE_COLUMNS: &str =
    "id, user_id, email, name, phone, avatar, bio, account_type, created_at, updated_at";

fn map_profile(row: &Row<'_>) -> rusqlite::Result<ProfileRecord> {
    Ok(ProfileRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        email: row.get(2)?,
        name: row.get(3)?,
        phone: row.get(4)?,
        avatar: row.get(5)?,
        bio: row.get(6)?,
        account_type: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl<'conn> SqliteProfileRepository<'conn> {
    fn find_by(&self, column: &str, value: &str) -> Result<Option<ProfileRecord>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE {column} = ?1");
        let row = self
            .conn
            .query_row(&sql, params![value], map_profile)
            .optional()?;
        Ok(row)
    }
}

impl<'conn> super::ProfileRepository for SqliteProfileRepository<'conn> {
    fn create(&self, record: &ProfileRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO profiles (id, user_id, email, name, phone, avatar, bio, account_type, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                record.id,
                record.user_id,
                record.email,
                record.name,
                record.phone,
                record.avatar,
                record.bio,
                record.account_type,
                record.created_at,
                record.updated_at
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<ProfileRecord>> {
        self.find_by("id", id)
    }

    fn get_by_email(&self, email: &str) -> Result<Option<ProfileRecord>> {
        self.find_by("email", email)
    }

    fn get_by_user_id(&self, user_id: &str) -> Result<Option<ProfileRecord>> {
        self.find_by("user_id", user_id)
    }

    fn update(&self, id: &str, changes: &ProfileChanges) -> Result<Option<ProfileRecord>> {
        let mut assignments = vec!["updated_at = ?1".to_string()];
        let mut values = vec![Value::Text(changes.updated_at.clone())];

        if let Some(name) = &changes.name {
            values.push(Value::Text(name.clone()));
            assignments.push(format!("name = ?{}", values.len()));
        }
        for (column, patch) in [
            ("phone", &changes.phone),
            ("avatar", &changes.avatar),
            ("bio", &changes.bio),
        ] {
            match patch {
                Patch::Undefined => continue,
                Patch::Null => values.push(Value::Null),
                Patch::Value(text) => values.push(Value::Text(text.clone())),
            }
            assignments.push(format!("{column} = ?{}", values.len()));
        }

        values.push(Value::Text(id.to_string()));
        let sql = format!(
            "UPDATE profiles SET {} WHERE id = ?{}",
            assignments.join(", "),
            values.len()
        );
        let updated = self.conn.execute(&sql, params_from_iter(values))?;
        if updated == 0 {
            return Ok(None);
        }
        self.find_by("id", id)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::{ProfileRepository, SqliteRepositories};
    use crate::database::models::ProfileChanges;
    use crate::patch::Patch;

    #[test]
    fn lookups_by_alternate_keys() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        repos.profiles().create(&profile("p1", "Ana")).unwrap();

        let by_email = repos.profiles().get_by_email("p1@example.com").unwrap();
        assert_eq!(by_email.map(|p| p.id), Some("p1".to_string()));
        let by_user = repos.profiles().get_by_user_id("auth-p1").unwrap();
        assert_eq!(by_user.map(|p| p.name), Some("Ana".to_string()));
        assert!(repos.profiles().get_by_email("missing@x.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        repos.profiles().create(&profile("p1", "Ana")).unwrap();
        let mut clash = profile("p2", "Bia");
        clash.email = "p1@example.com".into();
        assert!(repos.profiles().create(&clash).is_err());
    }

    #[test]
    fn update_touches_only_supplied_columns() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        let mut record = profile("p1", "Ana");
        record.phone = Some("555-0101".into());
        record.bio = Some("reader".into());
        repos.profiles().create(&record).unwrap();

        let changes = ProfileChanges {
            phone: Patch::Null,
            avatar: Patch::Value("https://img/ana.png".into()),
            updated_at: "2024-03-01T00:00:00.000Z".into(),
            ..Default::default()
        };
        let updated = repos.profiles().update("p1", &changes).unwrap().unwrap();
        assert_eq!(updated.phone, None);
        assert_eq!(updated.avatar.as_deref(), Some("https://img/ana.png"));
        assert_eq!(updated.bio.as_deref(), Some("reader"));
        assert_eq!(updated.name, "Ana");
        assert_eq!(updated.updated_at, "2024-03-01T00:00:00.000Z");

        assert!(repos.profiles().update("nope", &changes).unwrap().is_none());
    }
}
