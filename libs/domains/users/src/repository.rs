use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserQuery, new_user_id};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by ID
    async fn get_by_id(&self, id: &str) -> UserResult<Option<User>>;

    /// Get a user by exact (case-sensitive) nickname
    async fn get_by_nickname(&self, nickname: &str) -> UserResult<Option<User>>;

    /// List users in insertion order
    async fn list(&self, query: UserQuery) -> UserResult<Vec<User>>;

    /// Create a new user; a taken nickname yields `DuplicateNickname`
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    /// Apply a partial update; `None` when no user has this ID
    async fn update(&self, id: &str, input: UpdateUser) -> UserResult<Option<User>>;

    /// Delete a user by ID; `false` when nothing was deleted
    async fn delete(&self, id: &str) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Users are kept in insertion order. Uniqueness checks and inserts happen
/// under one write lock.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

fn nickname_taken(users: &[User], nickname: &str, except_id: Option<&str>) -> bool {
    users
        .iter()
        .any(|u| u.nickname == nickname && Some(u.id.as_str()) != except_id)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_nickname(&self, nickname: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.nickname == nickname).cloned())
    }

    async fn list(&self, query: UserQuery) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        Ok(users
            .iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if nickname_taken(&users, &input.nickname, None) {
            return Err(UserError::DuplicateNickname(input.nickname));
        }

        let now = Utc::now();
        let user = User {
            id: new_user_id(),
            nickname: input.nickname,
            gender: input.gender.parse().ok(),
            genre: input.genre,
            favorite_movie: input.favorite_movie,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());

        tracing::info!(user_id = %user.id, nickname = %user.nickname, "Created user");
        Ok(user)
    }

    async fn update(&self, id: &str, input: UpdateUser) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        if let Some(ref nickname) = input.nickname {
            if nickname_taken(&users, nickname, Some(id)) {
                return Err(UserError::DuplicateNickname(nickname.clone()));
            }
        }

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(nickname) = input.nickname {
            user.nickname = nickname;
        }
        if let Some(gender) = input.gender {
            user.gender = gender.parse().ok();
        }
        if let Some(genre) = input.genre {
            user.genre = genre;
        }
        if let Some(favorite_movie) = input.favorite_movie {
            user.favorite_movie = favorite_movie;
        }
        user.updated_at = Utc::now();

        tracing::info!(user_id = %id, "Updated user");
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: &str) -> UserResult<bool> {
        let mut users = self.users.write().await;

        let before = users.len();
        users.retain(|u| u.id != id);

        if users.len() < before {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn create_input(nickname: &str) -> CreateUser {
        CreateUser {
            nickname: nickname.to_string(),
            gender: "여성".to_string(),
            genre: vec!["드라마".to_string()],
            favorite_movie: "기생충".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let user = repo.create(create_input("지은")).await.unwrap();
        assert_eq!(user.id.len(), 21);
        assert_eq!(user.gender, Some(Gender::Female));

        let fetched = repo.get_by_id(&user.id).await.unwrap();
        assert_eq!(fetched, Some(user.clone()));

        let by_nickname = repo.get_by_nickname("지은").await.unwrap();
        assert_eq!(by_nickname.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_duplicate_nickname_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(create_input("지은")).await.unwrap();

        let result = repo.create(create_input("지은")).await;
        assert!(matches!(result, Err(UserError::DuplicateNickname(n)) if n == "지은"));
    }

    #[tokio::test]
    async fn test_nickname_lookup_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(create_input("Alice")).await.unwrap();

        assert!(repo.get_by_nickname("alice").await.unwrap().is_none());
        assert!(repo.create(create_input("alice")).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_paginated() {
        let repo = InMemoryUserRepository::new();
        for nickname in ["user1", "user2", "user3", "user4"] {
            repo.create(create_input(nickname)).await.unwrap();
        }

        let all = repo.list(UserQuery::default()).await.unwrap();
        let nicknames: Vec<_> = all.iter().map(|u| u.nickname.as_str()).collect();
        assert_eq!(nicknames, vec!["user1", "user2", "user3", "user4"]);

        let page = repo.list(UserQuery { skip: 1, limit: 2 }).await.unwrap();
        let nicknames: Vec<_> = page.iter().map(|u| u.nickname.as_str()).collect();
        assert_eq!(nicknames, vec!["user2", "user3"]);
    }

    #[tokio::test]
    async fn test_update_applies_only_given_fields() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(create_input("지은")).await.unwrap();

        let updated = repo
            .update(
                &user.id,
                UpdateUser {
                    favorite_movie: Some("올드보이".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.favorite_movie, "올드보이");
        assert_eq!(updated.nickname, user.nickname);
        assert_eq!(updated.gender, user.gender);
        assert_eq!(updated.genre, user.genre);
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_none() {
        let repo = InMemoryUserRepository::new();
        let result = repo.update("missing", UpdateUser::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_to_taken_nickname_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(create_input("지은")).await.unwrap();
        let other = repo.create(create_input("민수")).await.unwrap();

        let result = repo
            .update(
                &other.id,
                UpdateUser {
                    nickname: Some("지은".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::DuplicateNickname(_))));

        // Keeping one's own nickname is fine
        let result = repo
            .update(
                &other.id,
                UpdateUser {
                    nickname: Some("민수".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(result.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(create_input("지은")).await.unwrap();

        assert!(repo.delete(&user.id).await.unwrap());
        assert!(!repo.delete(&user.id).await.unwrap());
        assert!(repo.get_by_id(&user.id).await.unwrap().is_none());
    }
}
