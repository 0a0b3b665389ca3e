use skillshare_api::domain::types::ProfileUpdate;
use skillshare_api::error::ApiError;
use skillshare_api::usecase::password::verify_password;
use skillshare_api::usecase::user::{
    ChangePasswordInput, ChangePasswordUseCase, DeleteUserUseCase, GetUserUseCase,
    ListUsersUseCase, UpdateProfileUseCase, UpdateRoleUseCase,
};
use skillshare_domain::id::UserId;
use skillshare_domain::user::UserRole;

use crate::helpers::{MockDb, TEST_PASSWORD, test_user};

// ── GetUser / ListUsers ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_not_found_for_unknown_user() {
    let usecase = GetUserUseCase {
        repo: MockDb::new().user_repo(),
    };
    let result = usecase.execute(UserId::new()).await;
    assert!(matches!(result, Err(ApiError::UserNotFound)), "got {result:?}");
}

#[tokio::test]
async fn should_list_users_newest_first() {
    let older = test_user("Old");
    let mut newer = test_user("New");
    newer.created_at = older.created_at + chrono::Duration::seconds(5);
    let db = MockDb::with_users(vec![older.clone(), newer.clone()]);

    let users = ListUsersUseCase { repo: db.user_repo() }.execute().await.unwrap();
    let ids: Vec<_> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_replace_profile_fields() {
    let user = test_user("Alice");
    let db = MockDb::with_users(vec![user.clone()]);
    let usecase = UpdateProfileUseCase { repo: db.user_repo() };

    let updated = usecase
        .execute(
            user.id,
            ProfileUpdate {
                name: "Alice B".to_owned(),
                bio: Some("mentor".to_owned()),
                skills: vec!["rust".to_owned(), "go".to_owned()],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Alice B");
    assert_eq!(updated.bio.as_deref(), Some("mentor"));
    assert_eq!(updated.skills, vec!["rust", "go"]);
    assert_eq!(updated.email, user.email);
    assert_eq!(updated.password_hash, user.password_hash);
}

#[tokio::test]
async fn should_reject_blank_name() {
    let user = test_user("Alice");
    let db = MockDb::with_users(vec![user.clone()]);
    let result = UpdateProfileUseCase { repo: db.user_repo() }
        .execute(
            user.id,
            ProfileUpdate {
                name: "   ".to_owned(),
                bio: None,
                skills: vec![],
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::Validation(_))), "got {result:?}");
}

// ── ChangePassword ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_change_password_after_verifying_current() {
    let user = test_user("Alice");
    let db = MockDb::with_users(vec![user.clone()]);
    let usecase = ChangePasswordUseCase { repo: db.user_repo() };

    usecase
        .execute(
            user.id,
            ChangePasswordInput {
                current_password: TEST_PASSWORD.to_owned(),
                new_password: "brand new secret".to_owned(),
            },
        )
        .await
        .unwrap();

    let hash = db.user(user.id).unwrap().password_hash.unwrap();
    assert!(verify_password("brand new secret", &hash).unwrap());
    assert!(!verify_password(TEST_PASSWORD, &hash).unwrap());
}

#[tokio::test]
async fn should_reject_wrong_current_password() {
    let user = test_user("Alice");
    let db = MockDb::with_users(vec![user.clone()]);
    let result = ChangePasswordUseCase { repo: db.user_repo() }
        .execute(
            user.id,
            ChangePasswordInput {
                current_password: "guess".to_owned(),
                new_password: "brand new secret".to_owned(),
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::WrongPassword)), "got {result:?}");
}

#[tokio::test]
async fn should_reject_password_change_without_password() {
    let mut user = test_user("Olga");
    user.password_hash = None;
    let db = MockDb::with_users(vec![user.clone()]);
    let result = ChangePasswordUseCase { repo: db.user_repo() }
        .execute(
            user.id,
            ChangePasswordInput {
                current_password: String::new(),
                new_password: "brand new secret".to_owned(),
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::PasswordNotSet)), "got {result:?}");
}

// ── UpdateRole / DeleteUser ──────────────────────────────────────────────────

#[tokio::test]
async fn should_promote_another_user() {
    let admin = test_user("Admin");
    let target = test_user("Target");
    let db = MockDb::with_users(vec![admin.clone(), target.clone()]);

    let updated = UpdateRoleUseCase { repo: db.user_repo() }
        .execute(admin.id, target.id, UserRole::Moderator)
        .await
        .unwrap();
    assert_eq!(updated.role, UserRole::Moderator);
}

#[tokio::test]
async fn should_refuse_changing_own_role() {
    let admin = test_user("Admin");
    let db = MockDb::with_users(vec![admin.clone()]);
    let result = UpdateRoleUseCase { repo: db.user_repo() }
        .execute(admin.id, admin.id, UserRole::User)
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden)), "got {result:?}");
}

#[tokio::test]
async fn should_return_not_found_when_promoting_unknown_user() {
    let admin = test_user("Admin");
    let db = MockDb::with_users(vec![admin.clone()]);
    let result = UpdateRoleUseCase { repo: db.user_repo() }
        .execute(admin.id, UserId::new(), UserRole::Admin)
        .await;
    assert!(matches!(result, Err(ApiError::UserNotFound)), "got {result:?}");
}

#[tokio::test]
async fn should_delete_other_user_but_never_self() {
    let admin = test_user("Admin");
    let target = test_user("Target");
    let db = MockDb::with_users(vec![admin.clone(), target.clone()]);
    let usecase = DeleteUserUseCase { repo: db.user_repo() };

    let own = usecase.execute(admin.id, admin.id).await;
    assert!(matches!(own, Err(ApiError::Forbidden)), "got {own:?}");

    usecase.execute(admin.id, target.id).await.unwrap();
    assert!(db.user(target.id).is_none());

    let again = usecase.execute(admin.id, target.id).await;
    assert!(matches!(again, Err(ApiError::UserNotFound)), "got {again:?}");
}
