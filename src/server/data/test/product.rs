use super::*;
use crate::server::data::product::ProductRepository;
use test_utils::factory::{category::CategoryFactory, product::ProductFactory};

/// Tests that search matches name, description or brand substrings.
///
/// Expected: Ok with one hit per field and no hit for unrelated products
#[tokio::test]
async fn search_matches_name_description_or_brand() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_catalog_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let category = factory::create_category(db).await?;
    let by_name = ProductFactory::new(db, category.id)
        .name("Rose Serum")
        .build()
        .await?;
    let by_description = ProductFactory::new(db, category.id)
        .name("Night Oil")
        .description("Infused with rose petals")
        .build()
        .await?;
    let by_brand = ProductFactory::new(db, category.id)
        .name("Lip Balm")
        .brand("RoseCo")
        .build()
        .await?;
    ProductFactory::new(db, category.id)
        .name("Shampoo")
        .description("For all hair types")
        .build()
        .await?;
    ProductFactory::new(db, category.id)
        .name("Rose Mist")
        .deleted()
        .build()
        .await?;

    let results = ProductRepository::new(db).search("Rose").await?;
    let ids: Vec<i32> = results.iter().map(|p| p.id).collect();

    assert_eq!(ids, vec![by_name.id, by_description.id, by_brand.id]);

    Ok(())
}

/// Tests category filtering by id and by slug.
///
/// Expected: Ok with only the products of the requested category
#[tokio::test]
async fn filters_by_category() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_catalog_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let makeup = CategoryFactory::new(db)
        .name("Makeup")
        .slug("makeup")
        .build()
        .await?;
    let other = factory::create_category(db).await?;
    let lipstick = factory::create_product(db, makeup.id).await?;
    factory::create_product(db, other.id).await?;

    let repo = ProductRepository::new(db);

    let by_id = repo.get_by_category(makeup.id).await?;
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].id, lipstick.id);
    assert_eq!(by_id[0].category_name.as_deref(), Some("Makeup"));

    let by_slug = repo.get_by_category_slug("makeup").await?;
    assert_eq!(by_slug.len(), 1);
    assert_eq!(by_slug[0].id, lipstick.id);
    assert!(repo.get_by_category_slug("missing").await?.is_empty());

    Ok(())
}

/// Tests the featured listing and slug lookup.
///
/// Expected: Ok with only featured products and the slug match
#[tokio::test]
async fn featured_and_slug_lookup() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_catalog_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let category = factory::create_category(db).await?;
    let featured = ProductFactory::new(db, category.id)
        .slug("star-product")
        .featured(true)
        .build()
        .await?;
    factory::create_product(db, category.id).await?;

    let repo = ProductRepository::new(db);

    let listed = repo.get_featured().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, featured.id);

    let found = repo.get_by_slug("star-product").await?.unwrap();
    assert_eq!(found.id, featured.id);

    Ok(())
}

/// Tests that slugs of deleted products still count as taken.
///
/// Expected: Ok(true) for the deleted product's slug unless it is the excluded id
#[tokio::test]
async fn slug_taken_includes_deleted_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_catalog_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let category = factory::create_category(db).await?;
    let product = ProductFactory::new(db, category.id)
        .slug("old-cream")
        .deleted()
        .build()
        .await?;

    let repo = ProductRepository::new(db);

    assert!(repo.slug_taken("old-cream", None).await?);
    assert!(!repo.slug_taken("old-cream", Some(product.id)).await?);
    assert!(!repo.slug_taken("new-cream", None).await?);

    Ok(())
}
