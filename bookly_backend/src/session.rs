//! Maps an authenticated session onto the profile that scopes every other
//! query. Verifying the session itself is the auth provider's job; this
//! module trusts the subject and email it is handed.

use crate::database::models::{AccountType, ProfileRecord};
use crate::database::repositories::{ProfileRepository, SqliteRepositories};
use crate::database::Database;
use crate::utils::now_utc_iso;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session identity requires a user id and an email")]
    IncompleteIdentity,
    #[error("email {0} is already bound to another account")]
    EmailClaimed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Subject identifier issued by the auth provider.
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl SessionIdentity {
    fn validate(&self) -> Result<(), SessionError> {
        if self.user_id.trim().is_empty() || self.email.trim().is_empty() {
            return Err(SessionError::IncompleteIdentity);
        }
        Ok(())
    }

    fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                self.email
                    .trim()
                    .split('@')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
    }
}

/// The subject is the only sign-in key. An email row owned by another
/// subject is a conflict, never a match.
fn resolve_subject(
    repos: &SqliteRepositories<'_>,
    identity: &SessionIdentity,
) -> Result<Option<ProfileRecord>> {
    let profiles = repos.profiles();
    if let Some(profile) = profiles.get_by_user_id(&identity.user_id)? {
        return Ok(Some(profile));
    }
    let email = identity.email.trim();
    match profiles.get_by_email(email)? {
        Some(profile) if profile.user_id != identity.user_id => {
            tracing::warn!(
                user_id = %identity.user_id,
                profile_id = %profile.id,
                "session email belongs to a different subject"
            );
            Err(SessionError::EmailClaimed(email.to_string()).into())
        }
        other => Ok(other),
    }
}

#[derive(Clone)]
pub struct SessionService {
    database: Database,
}

impl SessionService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Looks the profile up by auth subject.
    pub async fn resolve(&self, identity: &SessionIdentity) -> Result<Option<ProfileRecord>> {
        identity.validate()?;
        let identity = identity.clone();
        self.database
            .run(move |repos| resolve_subject(&repos, &identity))
            .await
    }

    /// Resolves the session's profile, creating a `USER` profile on first
    /// sign-in. Lookup and insert share one transaction under the
    /// connection lock, so concurrent first sign-ins converge on one row.
    pub async fn ensure_profile(&self, identity: &SessionIdentity) -> Result<ProfileRecord> {
        identity.validate()?;
        let identity = identity.clone();
        self.database
            .run(move |repos| {
                let tx = repos.conn().unchecked_transaction()?;
                if let Some(profile) = resolve_subject(&repos, &identity)? {
                    return Ok(profile);
                }

                let now = now_utc_iso();
                let record = ProfileRecord {
                    id: Uuid::new_v4().to_string(),
                    user_id: identity.user_id.clone(),
                    email: identity.email.trim().to_string(),
                    name: identity.display_name(),
                    phone: None,
                    avatar: None,
                    bio: None,
                    account_type: AccountType::User,
                    created_at: now.clone(),
                    updated_at: now,
                };
                repos.profiles().create(&record)?;
                tx.commit()?;
                tracing::info!(profile_id = %record.id, user_id = %record.user_id, "provisioned profile");
                Ok(record)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SessionService {
        let db = Database::open_in_memory().expect("in-memory db");
        db.ensure_migrations().expect("migrations");
        SessionService::new(db)
    }

    fn identity() -> SessionIdentity {
        SessionIdentity {
            user_id: "auth-user-9".into(),
            email: "leitora@example.com".into(),
            name: None,
        }
    }

    #[tokio::test]
    async fn first_sign_in_provisions_exactly_one_profile() {
        let service = service();
        assert!(service.resolve(&identity()).await.unwrap().is_none());

        let created = service.ensure_profile(&identity()).await.unwrap();
        assert_eq!(created.name, "leitora");
        assert_eq!(created.account_type, AccountType::User);

        let again = service.ensure_profile(&identity()).await.unwrap();
        assert_eq!(again.id, created.id);
    }

    #[tokio::test]
    async fn email_owned_by_another_subject_is_refused() {
        let service = service();
        let created = service.ensure_profile(&identity()).await.unwrap();
        let intruder = SessionIdentity {
            user_id: "auth-user-other".into(),
            ..identity()
        };

        let err = service.ensure_profile(&intruder).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<SessionError>(),
            Some(&SessionError::EmailClaimed("leitora@example.com".into()))
        );
        assert!(service.resolve(&intruder).await.is_err());

        let owner = service.resolve(&identity()).await.unwrap().unwrap();
        assert_eq!(owner.id, created.id);
        assert_eq!(owner.user_id, "auth-user-9");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_sign_ins_share_one_profile() {
        for round in 0..20 {
            let service = service();
            let id = SessionIdentity {
                user_id: format!("auth-race-{round}"),
                email: format!("race{round}@example.com"),
                name: None,
            };
            let (first, second) =
                tokio::join!(service.ensure_profile(&id), service.ensure_profile(&id));
            assert_eq!(first.unwrap().id, second.unwrap().id);
        }
    }

    #[tokio::test]
    async fn blank_identity_is_rejected() {
        let service = service();
        let blank = SessionIdentity {
            user_id: " ".into(),
            ..identity()
        };
        assert!(service.ensure_profile(&blank).await.is_err());
    }
}
