mod common;

use std::time::Duration;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use common::{build_state, InMemoryStore};

macro_rules! app {
    ($store:expr) => {{
        let (state, _) = build_state(&$store, "http://127.0.0.1:9", Duration::from_secs(900));
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(skincare_store::configure_app),
        )
        .await
    }};
}

#[actix_web::test]
async fn products_filter_by_price_range() {
    let store = InMemoryStore::new();
    let serums = store.add_category("Serums");
    let masks = store.add_category("Masks");
    store.add_product("Budget serum", "90000", serums);
    store.add_product("Premium serum", "450000", serums);
    store.add_product("Sheet mask", "30000", masks);
    let app = app!(store);

    let req = test::TestRequest::get()
        .uri(&format!("/api/products?categoryId={serums}"))
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["totalDocs"], 2);

    let req = test::TestRequest::get()
        .uri("/api/products?minPrice=50000&maxPrice=100000")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["totalDocs"], 1);
    assert_eq!(page["data"][0]["name"], "Budget serum");

    let req = test::TestRequest::get()
        .uri("/api/products?minPrice=100000&maxPrice=50000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/products?limit=abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid query string"));
}

#[actix_web::test]
async fn product_detail_and_feedback_lifecycle() {
    let store = InMemoryStore::new();
    let category = store.add_category("Sunscreen");
    let product = store.add_product("Daily SPF", "210000", category);
    let customer = store.add_customer("Tuan Dang");
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/feedback")
        .set_json(json!({
            "product_id": product,
            "customer_id": customer,
            "rating": 4,
            "comment": "No white cast"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let feedback: Value = test::read_body_json(resp).await;
    let feedback_id = feedback["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/products/{product}"))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["name"], "Daily SPF");
    assert_eq!(detail["category"]["name"], "Sunscreen");
    assert_eq!(detail["feedbacks"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::put()
        .uri(&format!("/api/feedback/{feedback_id}"))
        .set_json(json!({ "rating": 5 }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["rating"], 5);
    assert_eq!(updated["comment"], "No white cast");

    let req = test::TestRequest::put()
        .uri(&format!("/api/feedback/{feedback_id}"))
        .set_json(json!({ "rating": 9 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/feedback/{feedback_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/products/{product}/feedback"))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, json!([]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/products/{}/feedback", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn skin_type_crud() {
    let store = InMemoryStore::new();
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/skin-types")
        .set_json(json!({ "name": "  Combination ", "description": "Oily T-zone" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["name"], "Combination");
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/skin-types/{id}"))
        .set_json(json!({ "description": "Oily T-zone, dry cheeks" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["description"], "Oily T-zone, dry cheeks");

    let req = test::TestRequest::get()
        .uri(&format!("/api/skin-types/{id}"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["name"], "Combination");

    let req = test::TestRequest::get().uri("/api/skin-types").to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/skin-types/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/skin-types/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Skin type not found");

    let req = test::TestRequest::post()
        .uri("/api/skin-types")
        .set_json(json!({ "name": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn customers_are_paginated() {
    let store = InMemoryStore::new();
    let first = store.add_customer("Anh");
    store.add_customer("Binh");
    store.add_customer("Chau");
    let app = app!(store);

    let req = test::TestRequest::get()
        .uri("/api/customers?page=2&limit=2")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["page"], 2);
    assert_eq!(page["totalDocs"], 3);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/customers?page={}&limit=100", i64::MAX))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["data"], json!([]));
    assert_eq!(page["totalDocs"], 3);

    let req = test::TestRequest::get()
        .uri(&format!("/api/customers/{first}"))
        .to_request();
    let customer: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(customer["name"], "Anh");

    let req = test::TestRequest::get()
        .uri(&format!("/api/customers/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn openapi_document_is_served() {
    let store = InMemoryStore::new();
    let app = app!(store);

    let req = test::TestRequest::get()
        .uri("/api-docs/openapi.json")
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    assert!(doc["paths"]["/api/orders"].is_object());
    assert!(doc["paths"]["/api/payment/callback"].is_object());
}
