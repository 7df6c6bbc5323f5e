// tests/api.rs - End-to-end coverage of the HTTP surface via axum-test
//
// Grounded in the teacher's in-process axum router wiring (src/main.rs::create_router)
// plus calculator/tests/test_calculator.py's use of a single seeded curry-only menu.

use std::sync::Arc;

use axum_test::TestServer;

use banquet_engine::api::{create_router, AppState};
use banquet_engine::catalogue::sqlite::SqliteCatalogue;

async fn seeded_server() -> TestServer {
    let catalogue = SqliteCatalogue::new("sqlite::memory:").await.unwrap();

    sqlx::query(
        "INSERT INTO categories (id, name, pool, baseline_budget_grams) VALUES (1, 'curry', 'protein', 160.0)",
    )
    .execute(catalogue.pool())
    .await
    .unwrap();

    sqlx::query(
        r#"
        INSERT INTO dishes
        (id, name, category_id, unit, default_portion_grams, min_per_dish_grams,
         popularity, cost_per_gram, protein_type, is_vegetarian, protein_is_additive, is_active)
        VALUES (1, 'Chicken Karahi', 1, 'kg', 160.0, 90.0, 1.0, 0.9, 'chicken', 0, 0, 1)
        "#,
    )
    .execute(catalogue.pool())
    .await
    .unwrap();

    let state = Arc::new(AppState {
        catalogue: Arc::new(catalogue),
    });
    let app = create_router(state, true);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let server = seeded_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json_contains(&serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn calculate_returns_a_portion_for_every_active_dish() {
    let server = seeded_server().await;

    let response = server
        .post("/calculate")
        .json(&serde_json::json!({
            "dish_ids": [1],
            "guests": { "gents": 50, "ladies": 50 },
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["portions"].as_array().unwrap().len(), 1);
    assert_eq!(body["portions"][0]["dish_id"], 1);
}

#[tokio::test]
async fn calculate_rejects_empty_dish_ids() {
    let server = seeded_server().await;

    let response = server
        .post("/calculate")
        .json(&serde_json::json!({
            "dish_ids": [],
            "guests": { "gents": 10, "ladies": 10 },
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn check_portions_rejects_mismatched_dish_ids() {
    let server = seeded_server().await;

    let response = server
        .post("/check-portions")
        .json(&serde_json::json!({
            "dish_ids": [1],
            "guests": { "gents": 10, "ladies": 10 },
            "user_portions": [{ "dish_id": 2, "grams_per_person": 150.0 }],
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn unknown_menu_preview_is_not_found() {
    let server = seeded_server().await;
    let response = server.get("/menus/999/preview").await;
    response.assert_status_not_found();
}
