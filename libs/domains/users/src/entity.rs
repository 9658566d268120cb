use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::genre;
use crate::models::{CreateUser, UpdateUser, User, new_user_id};

/// Sea-ORM Entity for the users table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub nickname: String,
    pub gender: Option<String>,
    /// JSON-encoded genre list
    #[sea_orm(column_type = "Text", nullable)]
    pub genre: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub favorite_movie: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub const TAG: &'static str = "users";
}

// Conversion from Sea-ORM Model to domain User
impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            nickname: model.nickname,
            gender: model.gender.as_deref().and_then(|g| g.parse().ok()),
            genre: genre::decode(model.genre.as_deref()),
            favorite_movie: model.favorite_movie,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// Conversion from domain CreateUser to Sea-ORM ActiveModel
impl From<CreateUser> for ActiveModel {
    fn from(input: CreateUser) -> Self {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        ActiveModel {
            id: Set(new_user_id()),
            nickname: Set(input.nickname),
            gender: Set(Some(input.gender)),
            genre: Set(Some(genre::encode(&input.genre))),
            favorite_movie: Set(input.favorite_movie),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

impl ActiveModel {
    /// Sets only the fields present in the update and bumps `updated_at`
    pub fn apply_update(&mut self, input: UpdateUser) {
        if let Some(nickname) = input.nickname {
            self.nickname = Set(nickname);
        }
        if let Some(gender) = input.gender {
            self.gender = Set(Some(gender));
        }
        if let Some(genre) = input.genre {
            self.genre = Set(Some(genre::encode(&genre)));
        }
        if let Some(favorite_movie) = input.favorite_movie {
            self.favorite_movie = Set(favorite_movie);
        }
        self.updated_at = Set(chrono::Utc::now().into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn model(gender: Option<&str>, genre: Option<&str>) -> Model {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        Model {
            id: new_user_id(),
            nickname: "민수".to_string(),
            gender: gender.map(str::to_string),
            genre: genre.map(str::to_string),
            favorite_movie: "어바웃타임".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_user_decodes_genre() {
        let user: User = model(Some("여성"), Some(r#"["로맨스","코미디"]"#)).into();
        assert_eq!(user.gender, Some(Gender::Female));
        assert_eq!(user.genre, vec!["로맨스", "코미디"]);
    }

    #[test]
    fn test_corrupted_row_reads_back_safely() {
        let user: User = model(Some("male"), Some("{broken")).into();
        assert_eq!(user.gender, None);
        assert!(user.genre.is_empty());

        let user: User = model(None, None).into();
        assert_eq!(user.gender, None);
        assert!(user.genre.is_empty());
    }

    #[test]
    fn test_create_to_active_model_encodes_genre() {
        let active: ActiveModel = CreateUser {
            nickname: "민수".to_string(),
            gender: "남성".to_string(),
            genre: vec!["로맨스".to_string()],
            favorite_movie: "어바웃타임".to_string(),
        }
        .into();

        assert_eq!(active.genre, Set(Some(r#"["로맨스"]"#.to_string())));
        assert_eq!(active.gender, Set(Some("남성".to_string())));
    }

    #[test]
    fn test_apply_update_touches_only_given_fields() {
        let mut active: ActiveModel = model(Some("남성"), Some(r#"["SF"]"#)).into();
        active.apply_update(UpdateUser {
            favorite_movie: Some("인셉션".to_string()),
            ..Default::default()
        });

        assert_eq!(active.favorite_movie, Set("인셉션".to_string()));
        assert!(!active.nickname.is_set());
        assert!(!active.genre.is_set());
        assert!(active.updated_at.is_set());
    }
}
