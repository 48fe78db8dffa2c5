//! Integration tests for admin login, draft editing, image upload and
//! image deletion.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use the default.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, create_test_app_with, dev_config, empty_request, image_request,
    json_request, login, png_bytes, send, setup, test_config,
};
use domain::services::{MockContentGateway, MockObjectStorage};
use serde_json::json;

#[tokio::test]
async fn test_admin_route_without_token_points_to_login() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);

    let (status, body) = send(&app, empty_request(Method::GET, "/api/v1/admin/draft", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["loginPath"], "/admin/login");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/admin/login",
            None,
            json!({ "password": "not-the-password" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["token"].is_null());
}

#[tokio::test]
async fn test_login_and_session() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        empty_request(Method::GET, "/api/v1/admin/session", Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["principal"], "admin");
    assert_eq!(body["developmentMode"], false);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        empty_request(Method::POST, "/api/v1/admin/logout", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        empty_request(Method::GET, "/api/v1/admin/session", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_development_mode_needs_no_token() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(dev_config(), pool);

    let (status, body) = send(&app, empty_request(Method::GET, "/api/v1/admin/session", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["principal"], "developer");
    assert_eq!(body["developmentMode"], true);

    let (status, body) = send(&app, empty_request(Method::GET, "/api/v1/admin/draft", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["dirty"], false);
}

#[tokio::test]
async fn test_draft_edit_commit_and_public_read() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);
    let token = login(&app).await;

    let (status, draft) = send(
        &app,
        empty_request(Method::GET, "/api/v1/admin/draft", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["status"]["dirty"], false);
    assert_eq!(draft["status"]["state"], "ready");

    let (status, edit) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/admin/draft/edits",
            Some(&token),
            json!({
                "list": "menu",
                "op": {
                    "kind": "append",
                    "record": { "category": "Color", "name": "Full Color", "price": 8800 }
                }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edit["outcome"]["result"], "appended");
    assert_eq!(edit["status"]["dirty"], true);
    let id = edit["outcome"]["id"].as_str().unwrap().to_string();

    // Nothing is public before the commit
    let (_, menu) = send(&app, empty_request(Method::GET, "/api/v1/content/menu", None)).await;
    assert_eq!(menu, json!([]));

    let (status, committed) = send(
        &app,
        empty_request(Method::POST, "/api/v1/admin/draft/commit", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "commit failed: {}", committed);
    assert_eq!(committed["dirty"], false);
    assert!(committed["lastSavedAt"].is_string());

    let (_, menu) = send(&app, empty_request(Method::GET, "/api/v1/content/menu", None)).await;
    assert_eq!(menu[0]["id"], id.as_str());
    assert_eq!(menu[0]["name"], "Full Color");
    assert_eq!(menu[0]["price"], 8800);
}

#[tokio::test]
async fn test_replace_section_and_discard() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/v1/admin/draft/sections",
            Some(&token),
            json!({
                "section": "faq",
                "value": [{ "id": "f1", "question": "Cards?", "answer": "All major cards." }]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dirty"], true);

    let (status, draft) = send(
        &app,
        empty_request(Method::DELETE, "/api/v1/admin/draft", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["status"]["dirty"], false);
    assert_eq!(draft["content"]["faq"], json!([]));
}

#[tokio::test]
async fn test_commit_failure_keeps_draft_dirty() {
    let (_guard, pool) = setup().await;
    let app = create_test_app_with(
        test_config(),
        pool,
        Arc::new(MockContentGateway::failing()),
        Some(Arc::new(MockObjectStorage::new())),
    );
    let token = login(&app).await;

    send(
        &app,
        json_request(
            Method::PUT,
            "/api/v1/admin/draft/sections",
            Some(&token),
            json!({ "section": "menu", "value": [] }),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        empty_request(Method::POST, "/api/v1/admin/draft/commit", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "save_failed");
    assert_eq!(body["retryable"], true);

    let (_, draft) = send(
        &app,
        empty_request(Method::GET, "/api/v1/admin/draft", Some(&token)),
    )
    .await;
    assert_eq!(draft["status"]["dirty"], true);
    assert_eq!(draft["status"]["state"], "save_failed");
}

#[tokio::test]
async fn test_upload_rejects_non_image_and_leaves_draft() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        image_request(
            "/api/v1/admin/draft/images?target=hero",
            Some(&token),
            "text/plain",
            b"not an image".to_vec(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let (_, draft) = send(
        &app,
        empty_request(Method::GET, "/api/v1/admin/draft", Some(&token)),
    )
    .await;
    assert_eq!(draft["status"]["dirty"], false);
    assert_eq!(draft["content"]["siteInfo"]["heroImages"], json!([]));
}

#[tokio::test]
async fn test_upload_hero_image_and_serve_it() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        image_request(
            "/api/v1/admin/draft/images?target=hero&filename=front.png",
            Some(&token),
            "image/png",
            png_bytes(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"]["dirty"], true);
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/"));

    let (_, draft) = send(
        &app,
        empty_request(Method::GET, "/api/v1/admin/draft", Some(&token)),
    )
    .await;
    assert_eq!(draft["content"]["siteInfo"]["heroImages"][0]["url"], url.as_str());

    let response = tower::ServiceExt::oneshot(app.clone(), empty_request(Method::GET, &url, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "image/png"
    );
}

#[tokio::test]
async fn test_upload_to_unknown_target() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        image_request(
            "/api/v1/admin/draft/images?target=staff&id=missing",
            Some(&token),
            "image/png",
            png_bytes(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_image_endpoint() {
    let (_guard, pool) = setup().await;
    let app = create_test_app(test_config(), pool);
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/v1/admin/images/delete", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/admin/images/delete",
            Some(&token),
            json!({ "url": "/images/hero.png" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);

    let (status, uploaded) = send(
        &app,
        image_request(
            "/api/v1/admin/uploads?filename=space.png",
            Some(&token),
            "image/png",
            png_bytes(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let url = uploaded["url"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/admin/images/delete",
            Some(&token),
            json!({ "url": url }),
        ),
    )
    .await;
    assert_eq!(body["success"], true);

    let response = tower::ServiceExt::oneshot(app.clone(), empty_request(Method::GET, &url, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
