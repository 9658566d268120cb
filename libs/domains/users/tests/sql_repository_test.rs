//! SqlUserRepository tests against a migrated in-memory SQLite database

use domain_users::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait};
use test_utils::assertions::{assert_id_format, assert_some};
use test_utils::{TestDataBuilder, TestDatabase};

fn create_input(nickname: &str) -> CreateUser {
    CreateUser {
        nickname: nickname.to_string(),
        gender: "여성".to_string(),
        genre: vec!["로맨스".to_string(), "코미디".to_string()],
        favorite_movie: "어바웃타임".to_string(),
    }
}

#[tokio::test]
async fn test_create_and_read_back() {
    let db = TestDatabase::new().await;
    let repo = SqlUserRepository::new(db.connection());

    let created = repo.create(create_input("민수")).await.unwrap();
    assert_id_format(&created.id, "created user id");

    let fetched = assert_some(repo.get_by_id(&created.id).await.unwrap(), "by id");
    assert_eq!(fetched.nickname, "민수");
    assert_eq!(fetched.gender, Some(Gender::Female));
    assert_eq!(fetched.genre, vec!["로맨스", "코미디"]);
    assert_eq!(fetched.favorite_movie, "어바웃타임");

    let by_nickname = assert_some(repo.get_by_nickname("민수").await.unwrap(), "by nickname");
    assert_eq!(by_nickname.id, created.id);

    assert!(repo.get_by_nickname("민 수").await.unwrap().is_none());
}

#[tokio::test]
async fn test_genre_is_stored_as_json_text() {
    let db = TestDatabase::new().await;
    let repo = SqlUserRepository::new(db.connection());

    let created = repo.create(create_input("민수")).await.unwrap();

    let row = entity::Entity::find_by_id(created.id)
        .one(&db.connection)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.genre.as_deref(), Some(r#"["로맨스","코미디"]"#));
}

#[tokio::test]
async fn test_corrupted_genre_reads_as_empty_list() {
    let db = TestDatabase::new().await;
    let repo = SqlUserRepository::new(db.connection());
    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

    for (nickname, genre) in [
        ("broken", Some("{not json")),
        ("object", Some(r#"{"a":1}"#)),
        ("mixed", Some(r#"["SF", 3]"#)),
        ("empty", Some("")),
        ("nullish", None),
    ] {
        let row = entity::ActiveModel {
            id: Set(models::new_user_id()),
            nickname: Set(nickname.to_string()),
            gender: Set(Some("unknown".to_string())),
            genre: Set(genre.map(str::to_string)),
            favorite_movie: Set("인셉션".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db.connection)
        .await
        .unwrap();

        let user = assert_some(repo.get_by_id(&row.id).await.unwrap(), nickname);
        assert!(user.genre.is_empty(), "{nickname}: {:?}", user.genre);
        assert_eq!(user.gender, None);
    }

    // Double-encoded text is unwrapped once
    let row = entity::ActiveModel {
        id: Set(models::new_user_id()),
        nickname: Set("double".to_string()),
        gender: Set(Some("남성".to_string())),
        genre: Set(Some(r#""[\"SF\"]""#.to_string())),
        favorite_movie: Set("인셉션".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db.connection)
    .await
    .unwrap();

    let user = assert_some(repo.get_by_id(&row.id).await.unwrap(), "double");
    assert_eq!(user.genre, vec!["SF"]);
}

#[tokio::test]
async fn test_unique_index_maps_to_duplicate_nickname() {
    let db = TestDatabase::new().await;
    let repo = SqlUserRepository::new(db.connection());

    repo.create(create_input("민수")).await.unwrap();
    let err = repo.create(create_input("민수")).await.unwrap_err();
    assert!(matches!(err, UserError::DuplicateNickname(ref n) if n == "민수"));

    let other = repo.create(create_input("지은")).await.unwrap();
    let err = repo
        .update(
            &other.id,
            UpdateUser {
                nickname: Some("민수".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::DuplicateNickname(_)));
}

#[tokio::test]
async fn test_concurrent_creates_admit_one_nickname() {
    let db = TestDatabase::new().await;
    let service = UserService::new(SqlUserRepository::new(db.connection()));
    let other = service.clone();

    let (first, second) = futures::join!(
        service.create_user(create_input("동시")),
        other.create_user(create_input("동시")),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    let failure = if first.is_err() { first } else { second };
    assert!(matches!(failure, Err(UserError::DuplicateNickname(_))));

    let users = service.list_users(UserQuery::default()).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_concurrent_onboarding_yields_one_user() {
    let db = TestDatabase::new().await;
    let service = UserService::new(SqlUserRepository::new(db.connection()));
    let other = service.clone();

    let (first, second) = futures::join!(
        service.onboard_user(create_input("동시")),
        other.onboard_user(create_input("동시")),
    );

    assert_eq!(first.unwrap().id, second.unwrap().id);
    let users = service.list_users(UserQuery::default()).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_update_partial_and_missing() {
    let db = TestDatabase::new().await;
    let repo = SqlUserRepository::new(db.connection());

    let created = repo.create(create_input("민수")).await.unwrap();

    let updated = repo
        .update(
            &created.id,
            UpdateUser {
                genre: Some(vec!["스릴러".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let updated = assert_some(updated, "updated user");
    assert_eq!(updated.genre, vec!["스릴러"]);
    assert_eq!(updated.nickname, created.nickname);
    assert_eq!(updated.gender, created.gender);
    assert_eq!(updated.favorite_movie, created.favorite_movie);
    assert!(updated.updated_at >= created.updated_at);

    let missing = repo
        .update("does-not-exist", UpdateUser::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_delete_reports_whether_a_row_was_removed() {
    let db = TestDatabase::new().await;
    let repo = SqlUserRepository::new(db.connection());

    let created = repo.create(create_input("민수")).await.unwrap();

    assert!(repo.delete(&created.id).await.unwrap());
    assert!(!repo.delete(&created.id).await.unwrap());
    assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_orders_by_creation_and_paginates() {
    let db = TestDatabase::new().await;
    let repo = SqlUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("sql_list_orders");

    let mut expected = Vec::new();
    for suffix in ["a", "b", "c", "d"] {
        let user = repo.create(create_input(&builder.nickname(suffix))).await.unwrap();
        expected.push(user.id);
    }

    let all = repo.list(UserQuery::default()).await.unwrap();
    let ids: Vec<_> = all.into_iter().map(|u| u.id).collect();
    assert_eq!(ids, expected);

    let page = repo.list(UserQuery { skip: 1, limit: 2 }).await.unwrap();
    let ids: Vec<_> = page.into_iter().map(|u| u.id).collect();
    assert_eq!(ids, expected[1..3]);

    let past_end = repo.list(UserQuery { skip: 10, limit: 2 }).await.unwrap();
    assert!(past_end.is_empty());

    let none = repo.list(UserQuery { skip: 0, limit: 0 }).await.unwrap();
    assert!(none.is_empty());
}
