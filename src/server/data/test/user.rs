use super::*;
use crate::server::data::user::UserRepository;
use chrono::{Duration, Utc};
use test_utils::factory::{helpers::find_or_create_role, user::UserFactory};

/// Tests email lookup joined with the role.
///
/// Expected: Ok(Some(User)) carrying the role name
#[tokio::test]
async fn get_by_email_includes_role() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let role = find_or_create_role(db, "Admin").await?;
    UserFactory::new(db, role.id)
        .email("boss@example.com")
        .build()
        .await?;

    let user = UserRepository::new(db)
        .get_by_email("boss@example.com")
        .await?
        .unwrap();

    assert_eq!(user.role, "Admin");
    assert!(user.is_admin());

    Ok(())
}

/// Tests that deleted users cannot be found by email but still block the address.
///
/// Expected: Ok(None) for lookup, Ok(true) for email_exists
#[tokio::test]
async fn deleted_user_hidden_but_email_reserved() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let role = find_or_create_role(db, "User").await?;
    UserFactory::new(db, role.id)
        .email("gone@example.com")
        .deleted()
        .build()
        .await?;

    let repo = UserRepository::new(db);

    assert!(repo.get_by_email("gone@example.com").await?.is_none());
    assert!(repo.email_exists("gone@example.com").await?);
    assert!(!repo.email_exists("nobody@example.com").await?);

    Ok(())
}

/// Tests reset token lookup honours expiry.
///
/// Expected: Ok(Some) for the fresh token, Ok(None) for the expired one
#[tokio::test]
async fn get_by_reset_token_checks_expiry() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let role = find_or_create_role(db, "User").await?;
    let now = Utc::now();
    let fresh = UserFactory::new(db, role.id)
        .reset_token("fresh", now + Duration::minutes(30))
        .build()
        .await?;
    UserFactory::new(db, role.id)
        .reset_token("stale", now - Duration::minutes(1))
        .build()
        .await?;

    let repo = UserRepository::new(db);

    let found = repo.get_by_reset_token("fresh", now).await?.unwrap();
    assert_eq!(found.id, fresh.id);
    assert!(repo.get_by_reset_token("stale", now).await?.is_none());
    assert!(repo.get_by_reset_token("unknown", now).await?.is_none());

    Ok(())
}

/// Tests listing all live users with roles.
///
/// Expected: Ok with two users in id order
#[tokio::test]
async fn get_all_with_role_skips_deleted() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let first = factory::helpers::create_admin(db).await?;
    let second = factory::helpers::create_customer(db).await?;
    let role = find_or_create_role(db, "User").await?;
    UserFactory::new(db, role.id).deleted().build().await?;

    let users = UserRepository::new(db).get_all_with_role().await?;

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, first.id);
    assert_eq!(users[0].role, "Admin");
    assert_eq!(users[1].id, second.id);
    assert_eq!(users[1].role, "User");

    Ok(())
}
