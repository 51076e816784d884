use sea_orm::EntityTrait;

use super::*;
use crate::server::{
    model::user::UpdateProfileParams,
    service::{password::verify_password, user::UserService},
};

/// Tests changing a user's role by name.
///
/// Expected: Ok(User) with role Admin, BadRequest for an unknown role
#[tokio::test]
async fn update_role_by_name() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    factory::helpers::find_or_create_role(db, "Admin").await?;
    let service = UserService::new(db);

    let promoted = service.update_role(user.id, "Admin").await?;
    assert_eq!(promoted.role, "Admin");
    assert!(promoted.is_admin());

    assert!(matches!(
        service.update_role(user.id, "Wizard").await,
        Err(AppError::BadRequest(ref m)) if m == "Role not found"
    ));
    assert!(matches!(
        service.update_role(9999, "Admin").await,
        Err(AppError::NotFound(_))
    ));

    Ok(())
}

/// Tests deleting accounts.
///
/// Expected: customers soft deleted, admins refused
#[tokio::test]
async fn delete_refuses_admins() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let customer = factory::helpers::create_customer(db).await?;
    let admin = factory::helpers::create_admin(db).await?;
    let service = UserService::new(db);

    assert!(matches!(
        service.delete(admin.id).await,
        Err(AppError::BadRequest(_))
    ));

    service.delete(customer.id).await?;

    assert!(matches!(
        service.get_by_id(customer.id).await,
        Err(AppError::NotFound(_))
    ));
    let remaining = service.get_all().await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, admin.id);

    Ok(())
}

/// Tests updating the caller's own profile.
///
/// Expected: Ok(User) with new name, phone and address
#[tokio::test]
async fn update_profile_sets_contact_details() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let service = UserService::new(db);

    let updated = service
        .update_profile(
            user.id,
            UpdateProfileParams {
                full_name: "Janet Doe".to_string(),
                phone_number: Some("0987654321".to_string()),
                address: Some("5 Elm Street".to_string()),
            },
        )
        .await?;

    assert_eq!(updated.full_name, "Janet Doe");
    assert_eq!(updated.phone_number.as_deref(), Some("0987654321"));
    assert_eq!(updated.address.as_deref(), Some("5 Elm Street"));

    let blank = service
        .update_profile(
            user.id,
            UpdateProfileParams {
                full_name: String::new(),
                phone_number: None,
                address: None,
            },
        )
        .await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests seeding the configured administrator account.
///
/// Expected: account created on first call, promoted and re-keyed on later calls
#[tokio::test]
async fn ensure_admin_creates_then_updates() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    factory::helpers::find_or_create_role(db, "Admin").await?;
    let service = UserService::new(db);

    let created = service
        .ensure_admin("Owner@Shop.test", "first-password")
        .await?;
    assert_eq!(created.email, "owner@shop.test");
    assert!(created.is_admin());

    let again = service
        .ensure_admin("owner@shop.test", "second-password")
        .await?;
    assert_eq!(again.id, created.id);
    assert_eq!(service.get_all().await?.len(), 1);

    let stored = entity::prelude::User::find_by_id(created.id)
        .one(db)
        .await?
        .unwrap();
    assert!(verify_password("second-password", &stored.password_hash));

    Ok(())
}
