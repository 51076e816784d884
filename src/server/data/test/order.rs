use super::*;
use crate::server::data::order::OrderRepository;
use entity::order::OrderStatus;
use test_utils::factory::order::OrderFactory;

/// Tests that a user's orders come back newest first with their lines.
///
/// Expected: Ok with two orders, the later one first
#[tokio::test]
async fn get_by_user_id_newest_first() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let other = factory::helpers::create_customer(db).await?;
    let (_, product) = factory::helpers::create_product_with_category(db).await?;
    let older = OrderFactory::new(db, user.id).item(&product, 1).build().await?;
    let newer = OrderFactory::new(db, user.id).item(&product, 2).build().await?;
    factory::create_order(db, other.id).await?;

    let orders = OrderRepository::new(db).get_by_user_id(user.id).await?;

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, newer.id);
    assert_eq!(orders[1].id, older.id);
    assert_eq!(orders[0].items.len(), 1);
    assert_eq!(orders[0].items[0].quantity, 2);
    assert_eq!(orders[0].items[0].product_name, product.name);

    Ok(())
}

/// Tests status filtering.
///
/// Expected: Ok with only shipped orders
#[tokio::test]
async fn get_by_status_filters() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let shipped = OrderFactory::new(db, user.id)
        .status(OrderStatus::Shipped)
        .build()
        .await?;
    factory::create_order(db, user.id).await?;

    let orders = OrderRepository::new(db)
        .get_by_status(OrderStatus::Shipped)
        .await?;

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, shipped.id);
    assert_eq!(orders[0].status, OrderStatus::Shipped);

    Ok(())
}

/// Tests lookup by order number and the existence check.
///
/// Expected: Ok(Some) for the real number, Ok(None) otherwise
#[tokio::test]
async fn get_by_order_number() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::helpers::create_customer(db).await?;
    let order = factory::create_order(db, user.id).await?;

    let repo = OrderRepository::new(db);

    let found = repo.get_by_order_number(&order.order_number).await?.unwrap();
    assert_eq!(found.id, order.id);
    assert!(repo.order_number_exists(&order.order_number).await?);
    assert!(repo.get_by_order_number("ORD-00000000-0000").await?.is_none());

    Ok(())
}
