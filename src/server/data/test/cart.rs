use super::*;
use crate::server::data::cart::CartRepository;
use rust_decimal::Decimal;
use test_utils::factory::product::ProductFactory;

/// Tests loading a cart with product details and totals.
///
/// Verifies that lines are joined to their products and that lines whose product
/// was soft deleted are left out.
///
/// Expected: Ok(Some(Cart)) with one line
#[tokio::test]
async fn get_cart_with_items_joins_live_products() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let category = factory::create_category(db).await?;
    let product = ProductFactory::new(db, category.id)
        .name("Toner")
        .price(Decimal::new(1250, 2))
        .build()
        .await?;
    let retired = ProductFactory::new(db, category.id).deleted().build().await?;
    let cart = factory::create_cart(db, user.id).await?;
    factory::create_cart_item(db, cart.id, product.id, 2).await?;
    factory::create_cart_item(db, cart.id, retired.id, 1).await?;

    let loaded = CartRepository::new(db)
        .get_cart_with_items(user.id)
        .await?
        .unwrap();

    assert_eq!(loaded.id, cart.id);
    assert_eq!(loaded.items.len(), 1);
    assert_eq!(loaded.items[0].product_name, "Toner");
    assert_eq!(loaded.total(), Decimal::new(2500, 2));

    Ok(())
}

/// Tests that users without a cart get `None`.
///
/// Expected: Ok(None)
#[tokio::test]
async fn get_cart_with_items_none_without_cart() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;

    assert!(CartRepository::new(db)
        .get_cart_with_items(user.id)
        .await?
        .is_none());

    Ok(())
}

/// Tests that a line from another user's cart is not returned.
///
/// Expected: Ok(None) for the foreign cart, Ok(Some) for the owner
#[tokio::test]
async fn get_item_in_cart_checks_ownership() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, product, cart) = factory::helpers::create_customer_with_cart(db, 1).await?;
    let other = factory::helpers::create_customer(db).await?;
    let other_cart = factory::create_cart(db, other.id).await?;

    let repo = CartRepository::new(db);
    let item = repo
        .get_item_for_product(cart.id, product.id)
        .await?
        .unwrap();

    assert!(repo.get_item_in_cart(cart.id, item.id).await?.is_some());
    assert!(repo.get_item_in_cart(other_cart.id, item.id).await?.is_none());

    Ok(())
}
