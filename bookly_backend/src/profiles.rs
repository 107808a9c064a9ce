use crate::database::models::{ProfileChanges, ProfileRecord};
use crate::database::repositories::ProfileRepository;
use crate::database::Database;
use crate::patch::Patch;
use crate::utils::now_utc_iso;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("profile {0} not found")]
    NotFound(String),
    #[error("profile name may not be empty")]
    NameRequired,
}

/// Editable profile fields. A missing key leaves the column alone, an
/// explicit `null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileInput {
    #[serde(default, skip_serializing_if = "Patch::is_undefined")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_undefined")]
    pub phone: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_undefined")]
    pub avatar: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_undefined")]
    pub bio: Patch<String>,
}

impl UpdateProfileInput {
    fn into_changes(self) -> Result<ProfileChanges, ProfileError> {
        let name = match self.name {
            Patch::Undefined => None,
            Patch::Null => return Err(ProfileError::NameRequired),
            Patch::Value(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(ProfileError::NameRequired);
                }
                Some(trimmed.to_string())
            }
        };
        Ok(ProfileChanges {
            name,
            phone: self.phone,
            avatar: self.avatar,
            bio: self.bio,
            updated_at: now_utc_iso(),
        })
    }
}

#[derive(Clone)]
pub struct ProfileService {
    database: Database,
}

impl ProfileService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub async fn get_profile(&self, id: &str) -> Result<Option<ProfileRecord>> {
        let id = id.to_string();
        self.database.run(move |repos| repos.profiles().get(&id)).await
    }

    pub async fn get_profile_by_email(&self, email: &str) -> Result<Option<ProfileRecord>> {
        let email = email.trim().to_string();
        self.database
            .run(move |repos| repos.profiles().get_by_email(&email))
            .await
    }

    pub async fn get_profile_by_user_id(&self, user_id: &str) -> Result<Option<ProfileRecord>> {
        let user_id = user_id.to_string();
        self.database
            .run(move |repos| repos.profiles().get_by_user_id(&user_id))
            .await
    }

    pub async fn update_profile(
        &self,
        id: &str,
        input: UpdateProfileInput,
    ) -> Result<ProfileRecord> {
        let changes = input.into_changes()?;
        let profile_id = id.to_string();
        let updated = self
            .database
            .run(move |repos| repos.profiles().update(&profile_id, &changes))
            .await?;
        match updated {
            Some(profile) => {
                tracing::info!(profile_id = %profile.id, "profile updated");
                Ok(profile)
            }
            None => Err(ProfileError::NotFound(id.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::AccountType;

    async fn setup() -> ProfileService {
        let db = Database::open_in_memory().expect("in-memory db");
        db.ensure_migrations().expect("migrations");
        db.with_repositories(|repos| {
            repos.profiles().create(&ProfileRecord {
                id: "p1".into(),
                user_id: "auth-user-1".into(),
                email: "joao.silva@email.com".into(),
                name: "João Silva".into(),
                phone: Some("(11) 99999-1111".into()),
                avatar: Some("https://img/joao.png".into()),
                bio: Some("Leitor".into()),
                account_type: AccountType::User,
                created_at: "2024-01-01T00:00:00.000Z".into(),
                updated_at: "2024-01-01T00:00:00.000Z".into(),
            })
        })
        .unwrap();
        ProfileService::new(db)
    }

    #[tokio::test]
    async fn null_clears_while_missing_keeps() {
        let service = setup().await;
        let input: UpdateProfileInput = serde_json::from_str(r#"{ "phone": null }"#).unwrap();
        let updated = service.update_profile("p1", input).await.unwrap();
        assert_eq!(updated.phone, None);
        assert_eq!(updated.name, "João Silva");
        assert_eq!(updated.avatar.as_deref(), Some("https://img/joao.png"));
        assert_eq!(updated.bio.as_deref(), Some("Leitor"));
        assert!(updated.updated_at > "2024-01-01T00:00:00.000Z".to_string());
    }

    #[tokio::test]
    async fn name_cannot_be_cleared() {
        let service = setup().await;
        let err = service
            .update_profile(
                "p1",
                UpdateProfileInput {
                    name: Patch::Null,
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<ProfileError>(), Some(&ProfileError::NameRequired));
    }

    #[tokio::test]
    async fn unknown_profile_fails_update_but_not_lookup() {
        let service = setup().await;
        let err = service
            .update_profile("missing", UpdateProfileInput::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProfileError>(),
            Some(&ProfileError::NotFound("missing".into()))
        );
        assert!(service
            .get_profile_by_email("missing@x.com")
            .await
            .unwrap()
            .is_none());
    }
}
