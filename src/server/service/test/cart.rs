use super::*;
use crate::server::service::{cart::CartService, product::ProductService};
use test_utils::factory::product::ProductFactory;

/// Tests that the first access creates an empty cart.
///
/// Expected: Ok(Cart) with no items, same cart on the second call
#[tokio::test]
async fn get_cart_creates_cart_lazily() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let service = CartService::new(db);

    let first = service.get_cart(user.id).await?;
    let second = service.get_cart(user.id).await?;

    assert!(first.items.is_empty());
    assert_eq!(first.id, second.id);

    Ok(())
}

/// Tests that adding the same product twice merges into one line.
///
/// Expected: Ok(Cart) with one line of quantity 3
#[tokio::test]
async fn add_item_merges_existing_line() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let (_category, product) = factory::helpers::create_product_with_category(db).await?;
    let service = CartService::new(db);

    service.add_item(user.id, product.id, 1).await?;
    let cart = service.add_item(user.id, product.id, 2).await?;

    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 3);
    assert_eq!(cart.items[0].subtotal(), product.price * rust_decimal::Decimal::from(3));

    Ok(())
}

/// Tests adding more units than are in stock, counting units already in the cart.
///
/// Expected: Err(BadRequest("Insufficient stock"))
#[tokio::test]
async fn add_item_rejects_over_stock() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let category = factory::create_category(db).await?;
    let product = ProductFactory::new(db, category.id)
        .stock_quantity(5)
        .build()
        .await?;
    let service = CartService::new(db);

    let too_many = service.add_item(user.id, product.id, 6).await;
    assert!(matches!(too_many, Err(AppError::BadRequest(ref m)) if m == "Insufficient stock"));

    service.add_item(user.id, product.id, 4).await?;
    let merged = service.add_item(user.id, product.id, 2).await;
    assert!(matches!(merged, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests adding missing products and non-positive quantities.
///
/// Expected: NotFound for the product, BadRequest for the quantity
#[tokio::test]
async fn add_item_validates_input() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let category = factory::create_category(db).await?;
    let retired = ProductFactory::new(db, category.id).deleted().build().await?;
    let service = CartService::new(db);

    assert!(matches!(
        service.add_item(user.id, 9999, 1).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.add_item(user.id, retired.id, 1).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.add_item(user.id, retired.id, 0).await,
        Err(AppError::BadRequest(_))
    ));

    Ok(())
}

/// Tests adding a quantity that would overflow the existing line's total.
///
/// Expected: Err(BadRequest("Insufficient stock")), existing line unchanged
#[tokio::test]
async fn add_item_rejects_overflowing_quantity() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let (_category, product) = factory::helpers::create_product_with_category(db).await?;
    let service = CartService::new(db);

    service.add_item(user.id, product.id, 1).await?;
    let result = service.add_item(user.id, product.id, i32::MAX).await;
    assert!(matches!(result, Err(AppError::BadRequest(ref m)) if m == "Insufficient stock"));

    let cart = service.get_cart(user.id).await?;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 1);

    Ok(())
}

/// Tests that updating a line to zero removes it.
///
/// Expected: Ok(Cart) without the line
#[tokio::test]
async fn update_item_to_zero_removes_line() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (user, _product, cart) = factory::helpers::create_customer_with_cart(db, 2).await?;
    let service = CartService::new(db);
    let line_id = service.get_cart(user.id).await?.items[0].id;
    assert_eq!(service.get_cart(user.id).await?.id, cart.id);

    let updated = service.update_item(user.id, line_id, 5).await?;
    assert_eq!(updated.items[0].quantity, 5);

    let emptied = service.update_item(user.id, line_id, 0).await?;
    assert!(emptied.items.is_empty());

    Ok(())
}

/// Tests updating a line whose product has since been deleted.
///
/// Expected: Err(NotFound("Product not found")), line quantity unchanged
#[tokio::test]
async fn update_item_of_deleted_product_is_not_found() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (user, product, _cart) = factory::helpers::create_customer_with_cart(db, 2).await?;
    let service = CartService::new(db);
    let line_id = service.get_cart(user.id).await?.items[0].id;

    ProductService::new(db).delete(product.id).await?;

    let result = service.update_item(user.id, line_id, 1_000_000).await;
    assert!(matches!(result, Err(AppError::NotFound(ref m)) if m == "Product not found"));

    Ok(())
}

/// Tests that lines in another user's cart cannot be changed.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn items_of_other_carts_are_not_found() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (owner, _product, _cart) = factory::helpers::create_customer_with_cart(db, 1).await?;
    let intruder = factory::helpers::create_customer(db).await?;
    let service = CartService::new(db);
    service.get_cart(intruder.id).await?;
    let line_id = service.get_cart(owner.id).await?.items[0].id;

    assert!(matches!(
        service.remove_item(intruder.id, line_id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.update_item(intruder.id, line_id, 3).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(service.get_cart(owner.id).await?.items.len(), 1);

    Ok(())
}

/// Tests removing one line and clearing the cart.
///
/// Expected: Ok with an empty cart afterwards
#[tokio::test]
async fn remove_and_clear_empty_the_cart() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let category = factory::create_category(db).await?;
    let first = factory::create_product(db, category.id).await?;
    let second = factory::create_product(db, category.id).await?;
    let service = CartService::new(db);
    service.add_item(user.id, first.id, 1).await?;
    let cart = service.add_item(user.id, second.id, 1).await?;

    let cart = service.remove_item(user.id, cart.items[0].id).await?;
    assert_eq!(cart.items.len(), 1);

    service.clear(user.id).await?;
    assert!(service.get_cart(user.id).await?.items.is_empty());

    Ok(())
}
