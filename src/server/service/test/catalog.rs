use super::*;
use crate::server::{
    model::{category::SaveCategoryParams, product::SaveProductParams},
    service::{category::CategoryService, product::ProductService, storage::FileStorage},
};
use rust_decimal::Decimal;
use test_utils::factory::product::ProductFactory;

fn product_params(name: &str, category_id: i32) -> SaveProductParams {
    SaveProductParams {
        name: name.to_string(),
        description: "Gentle daily cleanser".to_string(),
        price: Decimal::new(1999, 2),
        stock_quantity: 12,
        image_url: None,
        brand: Some("Acme".to_string()),
        is_featured: false,
        category_id,
    }
}

/// Tests creating products with colliding names.
///
/// Verifies that the slug is derived from the name and suffixed when taken.
///
/// Expected: "foam-cleanser" then "foam-cleanser-2"
#[tokio::test]
async fn create_product_generates_unique_slug() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let category = factory::create_category(db).await?;
    let service = ProductService::new(db);

    let first = service
        .create(product_params("Foam Cleanser!", category.id))
        .await?;
    let second = service
        .create(product_params("Foam  Cleanser", category.id))
        .await?;

    assert_eq!(first.slug, "foam-cleanser");
    assert_eq!(second.slug, "foam-cleanser-2");
    assert_eq!(first.category_name.as_deref(), Some(category.name.as_str()));

    Ok(())
}

/// Tests that product writes require an existing category and sane numbers.
///
/// Expected: Err(BadRequest) for each invalid input
#[tokio::test]
async fn create_product_validates_input() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let category = factory::create_category(db).await?;
    let service = ProductService::new(db);

    let unknown_category = service.create(product_params("Toner", 9999)).await;
    assert!(matches!(unknown_category, Err(AppError::BadRequest(ref m)) if m == "Category not found"));

    let mut negative = product_params("Toner", category.id);
    negative.price = Decimal::new(-1, 0);
    assert!(matches!(service.create(negative).await, Err(AppError::BadRequest(_))));

    let mut unnamed = product_params("", category.id);
    unnamed.stock_quantity = 1;
    assert!(matches!(service.create(unnamed).await, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests that updating a product keeps its own slug when the name is unchanged.
///
/// Expected: Ok(Product) with the same slug and new price
#[tokio::test]
async fn update_product_keeps_own_slug() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let category = factory::create_category(db).await?;
    let service = ProductService::new(db);
    let created = service.create(product_params("Night Cream", category.id)).await?;

    let mut params = product_params("Night Cream", category.id);
    params.price = Decimal::new(2599, 2);
    let updated = service.update(created.id, params).await?;

    assert_eq!(updated.slug, "night-cream");
    assert_eq!(updated.price, Decimal::new(2599, 2));

    Ok(())
}

/// Tests that deleted products disappear from reads.
///
/// Expected: NotFound after delete, and a second delete also NotFound
#[tokio::test]
async fn delete_product_hides_it() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_category, product) = factory::helpers::create_product_with_category(db).await?;
    let service = ProductService::new(db);

    service.delete(product.id).await?;

    assert!(matches!(service.get_by_id(product.id).await, Err(AppError::NotFound(_))));
    assert!(service.get_all().await?.is_empty());
    assert!(matches!(service.delete(product.id).await, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests search input handling.
///
/// Expected: blank query rejected, brand matches found
#[tokio::test]
async fn search_requires_query() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let category = factory::create_category(db).await?;
    ProductFactory::new(db, category.id)
        .name("Lip Balm")
        .brand("Glowly")
        .build()
        .await?;
    let service = ProductService::new(db);

    assert!(matches!(
        service.search("   ").await,
        Err(AppError::BadRequest(ref m)) if m == "Search query is required"
    ));
    assert_eq!(service.search("glow").await?.len(), 1);

    Ok(())
}

/// Tests image upload validation and storage.
///
/// Expected: images stored under uploads/, other files rejected
#[tokio::test]
async fn upload_image_stores_valid_images() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path().to_path_buf(), "http://localhost:8080");
    let service = ProductService::new(db);

    let url = service.upload_image(&storage, "photo.PNG", b"png-bytes").await?;
    assert!(url.starts_with("http://localhost:8080/uploads/"));
    assert!(url.ends_with(".png"));

    let rejected = service.upload_image(&storage, "script.exe", b"bytes").await;
    assert!(matches!(rejected, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests category creation, slug lookup and update.
///
/// Expected: slug derived from name, lookups by slug and id agree
#[tokio::test]
async fn category_lifecycle() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_storefront_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let service = CategoryService::new(db);

    let created = service
        .create(SaveCategoryParams {
            name: "Skin Care".to_string(),
            description: "Cleansers and creams".to_string(),
            image_url: None,
        })
        .await?;
    assert_eq!(created.slug, "skin-care");
    assert_eq!(service.get_by_slug("skin-care").await?.id, created.id);

    let updated = service
        .update(
            created.id,
            SaveCategoryParams {
                name: "Face Care".to_string(),
                description: "Cleansers and creams".to_string(),
                image_url: None,
            },
        )
        .await?;
    assert_eq!(updated.slug, "face-care");

    service.delete(created.id).await?;
    assert!(matches!(service.get_by_id(created.id).await, Err(AppError::NotFound(_))));
    assert!(service.get_all().await?.is_empty());

    Ok(())
}
