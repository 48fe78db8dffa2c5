//! Integration tests for public content reads and the transactional save.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use the default.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, create_test_pool, empty_request, json_request, login, run_migrations, send,
    setup, test_config,
};
use domain::models::{
    ContentSnapshot, FaqItem, GalleryItem, HeroImage, MenuCategory, MenuItem, StaffMember,
};
use domain::services::{ContentGateway, OrderedList};
use persistence::repositories::ContentRepository;
use serde_json::json;

fn menu_item(id: &str, name: &str, order: i32) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        category: MenuCategory::Cut,
        name: name.to_string(),
        price: 4400,
        description: String::new(),
        order,
    }
}

fn seeded_snapshot() -> ContentSnapshot {
    let mut snapshot = ContentSnapshot::default();
    snapshot.menu = OrderedList::from(vec![menu_item("m1", "Cut", 0)]);
    snapshot.staff = OrderedList::from(vec![StaffMember {
        id: "s1".to_string(),
        name: "Aoi".to_string(),
        role: "Stylist".to_string(),
        role_ja: None,
        image: "/images/staff-1.png".to_string(),
        message: None,
        order: 0,
    }]);
    snapshot.gallery = OrderedList::from(vec![GalleryItem {
        id: "g1".to_string(),
        title: "Short bob".to_string(),
        description: String::new(),
        images: vec!["/uploads/gallery/bob.jpg".to_string()],
        image: None,
        category: None,
        order: 0,
    }]);
    snapshot.faq = OrderedList::from(vec![FaqItem {
        id: "f1".to_string(),
        question: "Is there parking?".to_string(),
        answer: "Two spaces behind the salon.".to_string(),
        order: 0,
    }]);
    snapshot
}

#[tokio::test]
async fn test_empty_store_reads_defaults() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);

    let (status, body) = send(&app, empty_request(Method::GET, "/api/v1/content", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["menu"], json!([]));
    assert_eq!(body["faq"], json!([]));
    assert_eq!(body["siteInfo"]["access"]["salonName"], "Hairmake Lucias");
    assert_eq!(
        body["siteInfo"]["salonSpace"]["images"]
            .as_array()
            .map(|a| a.len()),
        Some(3)
    );
}

#[tokio::test]
async fn test_save_then_public_read() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);
    let token = login(&app).await;

    let body = serde_json::to_value(seeded_snapshot()).unwrap();
    let (status, response) = send(
        &app,
        json_request(Method::POST, "/api/v1/admin/content", Some(&token), body),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "save failed: {}", response);
    assert_eq!(response["success"], true);

    let (status, menu) =
        send(&app, empty_request(Method::GET, "/api/v1/content/menu", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(menu[0]["id"], "m1");
    assert_eq!(menu[0]["price"], 4400);

    let (_, staff) = send(&app, empty_request(Method::GET, "/api/v1/content/staff", None)).await;
    assert_eq!(staff[0]["name"], "Aoi");

    let (_, gallery) =
        send(&app, empty_request(Method::GET, "/api/v1/content/gallery", None)).await;
    assert_eq!(gallery[0]["images"], json!(["/uploads/gallery/bob.jpg"]));
    // The single-image column is only read back for rows without `images`
    assert!(gallery[0].get("image").is_none());

    let (_, faq) = send(&app, empty_request(Method::GET, "/api/v1/content/faq", None)).await;
    assert_eq!(faq[0]["question"], "Is there parking?");
}

#[tokio::test]
async fn test_save_then_fetch_returns_saved_snapshot() {
    let (_guard, pool) = setup().await;
    let repo = ContentRepository::new(pool.clone());

    let mut snapshot = seeded_snapshot();
    snapshot.menu.push(MenuItem {
        id: "m2".to_string(),
        category: MenuCategory::Custom("Head Spa".to_string()),
        name: "Head Spa 30min".to_string(),
        price: 5500,
        description: "Scalp care".to_string(),
        order: 1,
    });
    snapshot.staff.push(StaffMember {
        id: "s2".to_string(),
        name: "Ren".to_string(),
        role: "Assistant".to_string(),
        role_ja: Some("アシスタント".to_string()),
        image: "/uploads/ren.png".to_string(),
        message: Some("Nice to meet you".to_string()),
        order: 1,
    });
    snapshot.site_info.hero_images.push(HeroImage {
        id: "h1".to_string(),
        url: "/uploads/hero-1.png".to_string(),
    });
    snapshot.site_info.concept.title = "Relax".to_string();
    snapshot.site_info.access.tel = "03-0000-0000".to_string();
    snapshot.site_info.salon_space.images[1].src = "/uploads/space.png".to_string();

    repo.save_all(&snapshot).await.unwrap();

    assert_eq!(repo.fetch_all().await, snapshot);
}

#[tokio::test]
async fn test_save_renumbers_order_by_position() {
    let (_guard, pool) = setup().await;
    let repo = ContentRepository::new(pool.clone());

    let mut snapshot = ContentSnapshot::default();
    snapshot.menu = OrderedList::from(vec![menu_item("a", "A", 5), menu_item("b", "B", 2)]);
    repo.save_all(&snapshot).await.unwrap();

    let stored = repo.fetch_all().await;
    let ids: Vec<(&str, i32)> = stored
        .menu
        .iter()
        .map(|item| (item.id.as_str(), item.order))
        .collect();
    assert_eq!(ids, vec![("a", 0), ("b", 1)]);
}

#[tokio::test]
async fn test_settings_saved_twice_keeps_one_row() {
    let (_guard, pool) = setup().await;
    let repo = ContentRepository::new(pool.clone());

    let mut first = ContentSnapshot::default();
    first.site_info.access.salon_name = "First".to_string();
    repo.save_all(&first).await.unwrap();

    let mut second = ContentSnapshot::default();
    second.site_info.access.salon_name = "Second".to_string();
    repo.save_all(&second).await.unwrap();

    let rows: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM site_settings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows.0, 1);
    assert_eq!(repo.fetch_all().await.site_info.access.salon_name, "Second");
}

#[tokio::test]
async fn test_failed_write_rolls_back_every_section() {
    let (_guard, pool) = setup().await;
    let repo = ContentRepository::new(pool.clone());
    repo.save_all(&seeded_snapshot()).await.unwrap();

    // The blank question violates the faq_items check after menu, staff and
    // gallery were already rewritten inside the transaction.
    let mut broken = ContentSnapshot::default();
    broken.menu = OrderedList::from(vec![menu_item("m9", "Color", 0)]);
    broken.faq = OrderedList::from(vec![FaqItem {
        id: "f9".to_string(),
        question: "  ".to_string(),
        answer: "Unanswered".to_string(),
        order: 0,
    }]);

    assert!(repo.replace_all(&broken).await.is_err());

    let stored = repo.fetch_all().await;
    assert_eq!(stored.menu.len(), 1);
    assert_eq!(stored.menu.iter().next().unwrap().id, "m1");
    assert_eq!(stored.staff.len(), 1);
    assert_eq!(stored.gallery.len(), 1);
    assert_eq!(stored.faq.iter().next().unwrap().id, "f1");
}

#[tokio::test]
async fn test_invalid_snapshot_rejected_before_write() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool.clone());
    let token = login(&app).await;
    ContentRepository::new(pool.clone())
        .save_all(&seeded_snapshot())
        .await
        .unwrap();

    let mut body = serde_json::to_value(ContentSnapshot::default()).unwrap();
    body["menu"] = json!([{ "id": "x", "category": "Cut", "name": "", "price": 1000 }]);

    let (status, response) = send(
        &app,
        json_request(Method::POST, "/api/v1/admin/content", Some(&token), body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "validation_error");

    let (_, menu) = send(&app, empty_request(Method::GET, "/api/v1/content/menu", None)).await;
    assert_eq!(menu[0]["id"], "m1");
}

#[tokio::test]
async fn test_missing_table_degrades_one_section() {
    let (_guard, pool) = setup().await;
    let repo = ContentRepository::new(pool.clone());
    repo.save_all(&seeded_snapshot()).await.unwrap();

    sqlx::query("DROP TABLE faq_items")
        .execute(&pool)
        .await
        .unwrap();

    let snapshot = repo.fetch_all().await;
    assert!(snapshot.faq.is_empty());
    assert_eq!(snapshot.menu.len(), 1);
    assert_eq!(snapshot.staff.len(), 1);

    // Put the table back for the tests that follow
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
}
