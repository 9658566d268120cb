use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{CreateUser, UpdateUser, User, UserQuery},
    repository::UserRepository,
};

/// SeaORM-backed repository; works against SQLite and PostgreSQL
#[derive(Debug, Clone)]
pub struct SqlUserRepository {
    db: DatabaseConnection,
}

impl SqlUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// SQL backends bind OFFSET/LIMIT as signed 64-bit integers
fn clamp_to_i64(value: u64) -> u64 {
    value.min(i64::MAX as u64)
}

/// Unique-index violations on write become `DuplicateNickname`
fn map_write_error(err: DbErr, nickname: &str) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            UserError::DuplicateNickname(nickname.to_string())
        }
        _ => UserError::Internal(format!("Database error: {}", err)),
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn get_by_id(&self, id: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn get_by_nickname(&self, nickname: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Nickname.eq(nickname))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, query: UserQuery) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::CreatedAt)
            .order_by_asc(entity::Column::Id)
            .offset(clamp_to_i64(query.skip))
            .limit(clamp_to_i64(query.limit))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let nickname = input.nickname.clone();
        let active_model: entity::ActiveModel = input.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, &nickname))?;

        tracing::info!(user_id = %model.id, nickname = %model.nickname, "Created user");
        Ok(model.into())
    }

    async fn update(&self, id: &str, input: UpdateUser) -> UserResult<Option<User>> {
        let Some(model) = entity::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let nickname = input
            .nickname
            .clone()
            .unwrap_or_else(|| model.nickname.clone());

        let mut active_model = model.into_active_model();
        active_model.apply_update(input);

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => UserError::NotFound(id.to_string()),
                other => map_write_error(other, &nickname),
            });

        match updated {
            Ok(model) => {
                tracing::info!(user_id = %id, "Updated user");
                Ok(Some(model.into()))
            }
            // Deleted between the read and the write
            Err(UserError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn delete(&self, id: &str) -> UserResult<bool> {
        let result = entity::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
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

    #[test]
    fn test_clamp_to_i64() {
        assert_eq!(clamp_to_i64(0), 0);
        assert_eq!(clamp_to_i64(100), 100);
        assert_eq!(clamp_to_i64(i64::MAX as u64), i64::MAX as u64);
        assert_eq!(clamp_to_i64(u64::MAX), i64::MAX as u64);
    }
}
