use super::*;
use crate::server::middleware::auth::bearer_token;
use test_utils::factory::user::UserFactory;

/// Tests an admin passing the admin permission check.
///
/// Expected: Ok(User) with role Admin
#[tokio::test]
async fn grants_access_to_admin_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = token_service();
    let admin = factory::helpers::create_admin(db).await?;
    let admin = UserRepository::new(db).get_with_role(admin.id).await?.unwrap();
    let headers = bearer(&tokens.issue(&admin)?);

    let user = AuthGuard::new(db, &tokens, &headers)
        .require(&[Permission::Admin])
        .await?;

    assert_eq!(user.id, admin.id);
    assert!(user.is_admin());

    Ok(())
}

/// Tests a customer calling an admin endpoint.
///
/// Expected: Err(AuthError::AccessDenied), but Ok without required permissions
#[tokio::test]
async fn denies_admin_access_to_customer() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = token_service();
    let customer = factory::helpers::create_customer(db).await?;
    let customer = UserRepository::new(db).get_with_role(customer.id).await?.unwrap();
    let headers = bearer(&tokens.issue(&customer)?);
    let guard = AuthGuard::new(db, &tokens, &headers);

    let result = guard.require(&[Permission::Admin]).await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccessDenied(id, _))) if id == customer.id
    ));

    assert_eq!(guard.require(&[]).await?.id, customer.id);

    Ok(())
}

/// Tests a role change taking effect before the token expires.
///
/// Expected: Err(AuthError::AccessDenied) for a token issued while the user was admin
#[tokio::test]
async fn reads_role_from_database() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = token_service();
    let customer = factory::helpers::create_customer(db).await?;
    let mut impostor = UserRepository::new(db).get_with_role(customer.id).await?.unwrap();
    impostor.role = "Admin".to_string();
    let headers = bearer(&tokens.issue(&impostor)?);

    let result = AuthGuard::new(db, &tokens, &headers)
        .require(&[Permission::Admin])
        .await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccessDenied(_, _)))
    ));

    Ok(())
}

/// Tests requests without a usable token.
///
/// Expected: MissingToken without header, InvalidToken for garbage
#[tokio::test]
async fn rejects_missing_or_invalid_token() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = token_service();

    let empty = HeaderMap::new();
    assert!(matches!(
        AuthGuard::new(db, &tokens, &empty).require(&[]).await,
        Err(AppError::AuthErr(AuthError::MissingToken))
    ));

    let garbage = bearer("not-a-jwt");
    assert!(matches!(
        AuthGuard::new(db, &tokens, &garbage).require(&[]).await,
        Err(AppError::AuthErr(AuthError::InvalidToken(_)))
    ));

    Ok(())
}

/// Tests a valid token whose user was deleted afterwards.
///
/// Expected: Err(AuthError::UserNotInDatabase)
#[tokio::test]
async fn rejects_deleted_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = token_service();
    let role = factory::helpers::find_or_create_role(db, "User").await?;
    let deleted = UserFactory::new(db, role.id).deleted().build().await?;
    let user = crate::server::model::user::User::from_entity(deleted, Some(role));
    let headers = bearer(&tokens.issue(&user)?);

    let result = AuthGuard::new(db, &tokens, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(id))) if id == user.id
    ));

    Ok(())
}

/// Expected: only well formed bearer headers yield a token
#[test]
fn parses_bearer_header() {
    assert_eq!(bearer_token(&bearer("abc.def.ghi")), Some("abc.def.ghi"));

    let mut basic = HeaderMap::new();
    basic.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
    assert_eq!(bearer_token(&basic), None);

    let mut blank = HeaderMap::new();
    blank.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
    assert_eq!(bearer_token(&blank), None);
}
