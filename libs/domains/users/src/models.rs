use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

pub const NICKNAME_MIN_CHARS: usize = 2;
pub const NICKNAME_MAX_CHARS: usize = 10;

/// Gender, serialized as the Korean tokens used by the client app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    #[serde(rename = "남성")]
    Male,
    #[serde(rename = "여성")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "남성",
            Gender::Female => "여성",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "남성" => Ok(Gender::Male),
            "여성" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Generates a 21-character URL-safe user id
pub fn new_user_id() -> String {
    nanoid::nanoid!()
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier (21 characters)
    #[schema(example = "V1StGXR8_Z5jdHi6B-myT")]
    pub id: String,
    /// Unique nickname, 2-10 characters
    #[schema(example = "민수")]
    pub nickname: String,
    /// `null` for rows stored without a recognised gender
    pub gender: Option<Gender>,
    /// Favourite genres in the order given
    #[schema(example = json!(["로맨스", "코미디"]))]
    pub genre: Vec<String>,
    #[schema(example = "어바웃타임")]
    pub favorite_movie: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(custom(function = "validate_nickname"))]
    #[schema(example = "민수")]
    pub nickname: String,
    #[validate(custom(function = "validate_gender"))]
    #[schema(example = "남성")]
    pub gender: String,
    #[validate(custom(function = "validate_genre"))]
    #[schema(example = json!(["로맨스", "코미디"]))]
    pub genre: Vec<String>,
    #[validate(custom(function = "validate_favorite_movie"))]
    #[schema(example = "어바웃타임")]
    pub favorite_movie: String,
}

impl CreateUser {
    /// Trims the free-text fields
    pub fn normalized(mut self) -> Self {
        self.nickname = self.nickname.trim().to_string();
        self.favorite_movie = self.favorite_movie.trim().to_string();
        self
    }

    /// Partial update carrying everything except the nickname
    pub fn profile_update(&self) -> UpdateUser {
        UpdateUser {
            nickname: None,
            gender: Some(self.gender.clone()),
            genre: Some(self.genre.clone()),
            favorite_movie: Some(self.favorite_movie.clone()),
        }
    }
}

/// DTO for updating an existing user; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(custom(function = "validate_nickname"))]
    pub nickname: Option<String>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(custom(function = "validate_genre"))]
    pub genre: Option<Vec<String>>,
    #[validate(custom(function = "validate_favorite_movie"))]
    pub favorite_movie: Option<String>,
}

impl UpdateUser {
    /// Trims the free-text fields
    pub fn normalized(mut self) -> Self {
        self.nickname = self.nickname.map(|n| n.trim().to_string());
        self.favorite_movie = self.favorite_movie.map(|m| m.trim().to_string());
        self
    }
}

/// Pagination for listing users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Number of users to skip
    #[serde(default)]
    pub skip: u64,
    /// Maximum number of users to return
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("nickname must not be blank")));
    }

    let len = trimmed.chars().count();
    if !(NICKNAME_MIN_CHARS..=NICKNAME_MAX_CHARS).contains(&len) {
        let mut err = ValidationError::new("length").with_message(Cow::Owned(format!(
            "nickname must be between {} and {} characters",
            NICKNAME_MIN_CHARS, NICKNAME_MAX_CHARS
        )));
        err.add_param(Cow::Borrowed("min"), &NICKNAME_MIN_CHARS);
        err.add_param(Cow::Borrowed("max"), &NICKNAME_MAX_CHARS);
        err.add_param(Cow::Borrowed("value"), &trimmed);
        return Err(err);
    }

    Ok(())
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    gender.parse::<Gender>().map(|_| ()).map_err(|_| {
        ValidationError::new("gender").with_message(Cow::Borrowed("gender must be 남성 or 여성"))
    })
}

fn validate_genre(genre: &[String]) -> Result<(), ValidationError> {
    if genre.iter().any(|g| !g.trim().is_empty()) {
        Ok(())
    } else {
        Err(ValidationError::new("genre")
            .with_message(Cow::Borrowed("genre must contain at least one entry")))
    }
}

fn validate_favorite_movie(movie: &str) -> Result<(), ValidationError> {
    if movie.trim().is_empty() {
        Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("favorite_movie must not be blank")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(nickname: &str) -> CreateUser {
        CreateUser {
            nickname: nickname.to_string(),
            gender: "남성".to_string(),
            genre: vec!["로맨스".to_string(), "코미디".to_string()],
            favorite_movie: "어바웃타임".to_string(),
        }
    }

    fn field_codes(errors: &validator::ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .get(field)
            .map(|errs| errs.iter().map(|e| e.code.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_gender_round_trip() {
        for gender in [Gender::Male, Gender::Female] {
            assert_eq!(gender.to_string().parse::<Gender>().unwrap(), gender);
        }
        assert!("male".parse::<Gender>().is_err());
        assert!("".parse::<Gender>().is_err());
    }

    #[test]
    fn test_gender_serializes_as_korean_token() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"여성\"");
    }

    #[test]
    fn test_nickname_length_bounds() {
        assert!(create("가").validate().is_err());
        assert!(create("가나").validate().is_ok());
        assert!(create("가나다라마바사아자차").validate().is_ok());
        assert!(create("가나다라마바사아자차카").validate().is_err());
        assert!(create("ab").validate().is_ok());
        assert!(create("abcdefghijk").validate().is_err());
    }

    #[test]
    fn test_nickname_is_measured_after_trimming() {
        assert!(create("  a  ").validate().is_err());
        assert!(create("  민수  ").validate().is_ok());
        assert_eq!(create("  민수  ").normalized().nickname, "민수");
    }

    #[test]
    fn test_blank_nickname_uses_required_code() {
        let errors = create("   ").validate().unwrap_err();
        assert_eq!(field_codes(&errors, "nickname"), vec!["required"]);

        let errors = create("a").validate().unwrap_err();
        assert_eq!(field_codes(&errors, "nickname"), vec!["length"]);
    }

    #[test]
    fn test_gender_must_be_known_token() {
        let mut input = create("민수");
        input.gender = "male".to_string();
        let errors = input.validate().unwrap_err();
        assert_eq!(field_codes(&errors, "gender"), vec!["gender"]);

        input.gender = String::new();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_genre_needs_a_non_blank_entry() {
        let mut input = create("민수");
        input.genre = vec![];
        assert!(input.validate().is_err());

        input.genre = vec!["".to_string()];
        assert!(input.validate().is_err());

        input.genre = vec!["".to_string(), "액션".to_string()];
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_favorite_movie_must_not_be_blank() {
        let mut input = create("민수");
        input.favorite_movie = "  ".to_string();
        let errors = input.validate().unwrap_err();
        assert_eq!(field_codes(&errors, "favorite_movie"), vec!["required"]);
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        assert!(UpdateUser::default().validate().is_ok());

        let update = UpdateUser {
            favorite_movie: Some("인셉션".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let update = UpdateUser {
            gender: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateUser {
            nickname: Some("x".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_user_serialization_hides_timestamps() {
        let user = User {
            id: new_user_id(),
            nickname: "민수".to_string(),
            gender: Some(Gender::Male),
            genre: vec!["로맨스".to_string()],
            favorite_movie: "어바웃타임".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["favorite_movie", "gender", "genre", "id", "nickname"]);
        assert_eq!(json["gender"], "남성");
    }

    #[test]
    fn test_new_user_id_is_21_chars() {
        let id = new_user_id();
        assert_eq!(id.len(), 21);
        assert_ne!(id, new_user_id());
    }

    #[test]
    fn test_user_query_defaults() {
        let query: UserQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, UserQuery::default());
        assert_eq!(query.limit, 100);
        assert_eq!(query.skip, 0);
    }
}
