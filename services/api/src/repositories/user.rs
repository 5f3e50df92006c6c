//! User repository: accounts and password hashing

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::Utc;
use common::{Collection, DatabaseError, DocumentStore, Filter};
use std::collections::HashMap;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        PersonRef,
        user::{NewUser, Role, User},
    },
};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    users: Collection<User>,
}

impl UserRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            users: store.collection(),
        }
    }

    /// Create a new user with the `student` role
    pub async fn create(&self, new_user: NewUser) -> ApiResult<User> {
        let email = new_user.email.trim().to_lowercase();
        info!("Creating new user: {}", email);

        let salt = SaltString::generate(&mut rand::thread_rng());
        let password_hash = Argon2::default()
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| {
                error!("Failed to hash password: {}", e);
                ApiError::InternalServerError
            })?
            .to_string();

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.trim().to_string(),
            email,
            password_hash,
            role: Role::Student,
            created_at: now,
            updated_at: now,
        };

        match self.users.insert(&user).await {
            Ok(()) => Ok(user),
            Err(DatabaseError::Duplicate(_)) => {
                Err(ApiError::Conflict("Email already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let filter = Filter::new().eq("email", email.trim().to_lowercase());
        Ok(self.users.find_one(&filter).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        Ok(self.users.get(id).await?)
    }

    /// Verify a user's password
    pub fn verify_password(&self, user: &User, password: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            error!("Failed to parse password hash for {}: {}", user.id, e);
            ApiError::InternalServerError
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Change a user's role
    pub async fn set_role(&self, id: Uuid, role: Role) -> ApiResult<Option<User>> {
        let Some(mut user) = self.users.get(id).await? else {
            return Ok(None);
        };
        user.role = role;
        user.updated_at = Utc::now();
        self.users.replace(&user).await?;
        Ok(Some(user))
    }

    pub async fn person(&self, id: Uuid) -> ApiResult<Option<PersonRef>> {
        Ok(self.users.get(id).await?.map(|user| user.person()))
    }

    /// Resolve many user ids at once; unknown ids are left out
    pub async fn people(
        &self,
        ids: impl IntoIterator<Item = Uuid>,
    ) -> ApiResult<HashMap<Uuid, PersonRef>> {
        let mut wanted: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
        wanted.sort();
        wanted.dedup();
        if wanted.is_empty() {
            return Ok(HashMap::new());
        }

        let filter = Filter::new().any_of("id", wanted);
        let users = self.users.find(&filter, &Default::default()).await?;
        Ok(users
            .into_iter()
            .map(|user| (user.id, user.person()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: " Jane Doe ".into(),
            email: email.into(),
            password: "Secret1".into(),
        }
    }

    #[tokio::test]
    async fn test_create_normalises_and_hashes() -> ApiResult<()> {
        let repo = UserRepository::new(&DocumentStore::in_memory());
        let user = repo.create(new_user("Jane@Example.COM")).await?;

        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.role, Role::Student);
        assert_ne!(user.password_hash, "Secret1");
        assert!(repo.verify_password(&user, "Secret1")?);
        assert!(!repo.verify_password(&user, "secret1")?);

        let found = repo.find_by_email("JANE@example.com").await?;
        assert_eq!(found.map(|u| u.id), Some(user.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() -> ApiResult<()> {
        let repo = UserRepository::new(&DocumentStore::in_memory());
        repo.create(new_user("jane@example.com")).await?;
        let err = repo.create(new_user("JANE@example.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(msg) if msg == "Email already registered"));
        Ok(())
    }

    #[tokio::test]
    async fn test_people_resolves_known_ids() -> ApiResult<()> {
        let repo = UserRepository::new(&DocumentStore::in_memory());
        let jane = repo.create(new_user("jane@example.com")).await?;
        let people = repo.people([jane.id, jane.id, Uuid::new_v4()]).await?;
        assert_eq!(people.len(), 1);
        assert_eq!(people[&jane.id].email, "jane@example.com");
        Ok(())
    }
}
