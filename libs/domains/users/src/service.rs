use std::sync::Arc;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserQuery};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new user; the nickname must not be taken
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;
        let input = input.normalized();

        if self
            .repository
            .get_by_nickname(&input.nickname)
            .await?
            .is_some()
        {
            return Err(UserError::DuplicateNickname(input.nickname));
        }

        // The unique index still rejects a concurrent insert of the same nickname
        self.repository.create(input).await
    }

    /// Onboard a user: update the profile if the nickname exists, create otherwise
    pub async fn onboard_user(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;
        let input = input.normalized();

        if let Some(existing) = self.repository.get_by_nickname(&input.nickname).await? {
            return self.update_profile(&existing.id, &input).await;
        }

        match self.repository.create(input.clone()).await {
            Err(UserError::DuplicateNickname(nickname)) => {
                // Lost a race with a concurrent onboarding of the same nickname
                let existing = self
                    .repository
                    .get_by_nickname(&nickname)
                    .await?
                    .ok_or(UserError::DuplicateNickname(nickname))?;
                self.update_profile(&existing.id, &input).await
            }
            result => result,
        }
    }

    async fn update_profile(&self, id: &str, input: &CreateUser) -> UserResult<User> {
        let user = self
            .repository
            .update(id, input.profile_update())
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        tracing::info!(user_id = %user.id, "Onboarding updated existing user");
        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: &str) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    /// List users in insertion order
    pub async fn list_users(&self, query: UserQuery) -> UserResult<Vec<User>> {
        self.repository.list(query).await
    }

    /// Partially update a user
    pub async fn update_user(&self, id: &str, input: UpdateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;
        let input = input.normalized();

        if self.repository.get_by_id(id).await?.is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }

        if let Some(ref nickname) = input.nickname {
            if let Some(other) = self.repository.get_by_nickname(nickname).await? {
                if other.id != id {
                    return Err(UserError::DuplicateNickname(nickname.clone()));
                }
            }
        }

        self.repository
            .update(id, input)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    /// Delete a user
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
