//! Black-box tests for the Product Catalog API.
//!
//! Each test starts the real router on an ephemeral port with its own store
//! and talks to it over HTTP.
//!
//! Run with: `cargo test --test api_tests`
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use product_api::config::Environment;
use product_api::{AppState, Config, ProductStore, build_router};

const API_KEY: &str = "integration-secret";

/// Running server bound to an ephemeral port.
struct TestServer {
    base_url: String,
    client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn spawn(store: ProductStore) -> Self {
        Self::spawn_with(store, Environment::Development).await
    }

    async fn spawn_seeded() -> Self {
        Self::spawn(ProductStore::with_sample_data().expect("sample data should load")).await
    }

    async fn spawn_with(store: ProductStore, environment: Environment) -> Self {
        let config = Config {
            api_key: API_KEY.to_string(),
            environment,
            ..Default::default()
        };
        let app = build_router(AppState::new(store, config));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).header("x-api-key", API_KEY)
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let res = self.get(path).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn create(&self, body: &Value) -> (StatusCode, Value) {
        let res = self
            .client
            .post(self.url("/api/products"))
            .header("x-api-key", API_KEY)
            .json(body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn replace(&self, id: &str, body: &Value) -> (StatusCode, Value) {
        let res = self
            .client
            .put(self.url(&format!("/api/products/{id}")))
            .header("x-api-key", API_KEY)
            .json(body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn delete(&self, id: &str) -> (StatusCode, Value) {
        let res = self
            .client
            .delete(self.url(&format!("/api/products/{id}")))
            .header("x-api-key", API_KEY)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn product(name: &str, category: &str, price: f64) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "price": price,
        "category": category,
        "inStock": true
    })
}

fn names(products: &Value) -> Vec<String> {
    products
        .as_array()
        .expect("expected an array of products")
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

fn business_fields(product: &Value) -> Value {
    let mut fields = product.clone();
    fields.as_object_mut().unwrap().remove("id");
    fields
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_missing_key_is_unauthorized() {
    let server = TestServer::spawn_seeded().await;
    let res = server
        .client
        .get(server.url("/api/products"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Missing API key");
}

#[tokio::test]
async fn test_wrong_key_is_unauthorized() {
    let server = TestServer::spawn_seeded().await;
    let res = server
        .client
        .get(server.url("/api/products"))
        .header("x-api-key", "not-the-key")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn test_correct_key_proceeds() {
    let server = TestServer::spawn_seeded().await;

    let (status, body) = server.get_json("/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let res = server
        .client
        .get(server.url("/api/products"))
        .header("authorization", API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_root_needs_no_key() {
    let server = TestServer::spawn_seeded().await;
    let res = server.client.get(server.url("/")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("running"));
}

// =============================================================================
// CRUD round trip
// =============================================================================

#[tokio::test]
async fn test_create_get_replace_delete_round_trip() {
    let server = TestServer::spawn(ProductStore::new()).await;
    let input = product("Desk Lamp", "home", 35.5);

    let (status, created) = server.create(&input).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(business_fields(&created), input);

    let (status, fetched) = server.get_json(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let replacement = json!({
        "name": "Floor Lamp",
        "description": "Tall",
        "price": 89.0,
        "category": "lighting",
        "inStock": false
    });
    let (status, updated) = server.replace(&id, &replacement).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id.as_str());

    let (_, fetched) = server.get_json(&format!("/api/products/{id}")).await;
    assert_eq!(fetched["id"], id.as_str());
    assert_eq!(business_fields(&fetched), replacement);

    let (status, removed) = server.delete(&id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed, fetched);

    let (status, body) = server.get_json(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains(&id));
}

#[tokio::test]
async fn test_created_ids_are_unique() {
    let server = TestServer::spawn_seeded().await;
    let mut ids: HashSet<String> = HashSet::new();

    for i in 0..10 {
        let (status, created) = server.create(&product(&format!("Item {i}"), "misc", 1.0)).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.insert(created["id"].as_str().unwrap().to_string());
    }

    let (_, listing) = server.get_json("/api/products?limit=100").await;
    let all_ids: HashSet<String> = listing["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(ids.len(), 10);
    assert_eq!(all_ids.len(), 13);
    assert!(ids.is_subset(&all_ids));
}

#[tokio::test]
async fn test_client_supplied_id_is_ignored() {
    let server = TestServer::spawn(ProductStore::new()).await;
    let mut input = product("Mug", "kitchen", 8.0);
    input["id"] = json!("chosen-by-client");

    let (status, created) = server.create(&input).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(created["id"], "chosen-by-client");
}

#[tokio::test]
async fn test_update_and_delete_missing_are_not_found() {
    let server = TestServer::spawn_seeded().await;

    let (status, _) = server.replace("missing", &product("X", "y", 1.0)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.delete("missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listing) = server.get_json("/api/products").await;
    assert_eq!(listing["total"], 3);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_create_reports_every_missing_field() {
    let server = TestServer::spawn(ProductStore::new()).await;

    let (status, body) = server.create(&json!({ "name": "Only a name" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let message = body["error"].as_str().unwrap();
    for field in ["description", "price", "category", "inStock"] {
        assert!(message.contains(field), "'{message}' should mention {field}");
    }
    assert!(!message.contains("name is required"));
}

#[tokio::test]
async fn test_update_reports_every_invalid_field() {
    let server = TestServer::spawn_seeded().await;
    let (_, listing) = server.get_json("/api/products").await;
    let id = listing["results"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = server
        .replace(
            &id,
            &json!({
                "name": "",
                "description": "fine",
                "price": "free",
                "category": "electronics",
                "inStock": "yes"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "name must be a non-empty string; price must be a finite number; inStock must be a boolean"
    );

    let (_, unchanged) = server.get_json(&format!("/api/products/{id}")).await;
    assert_eq!(unchanged["name"], "Laptop");
}

#[tokio::test]
async fn test_put_is_full_replace_not_merge() {
    let server = TestServer::spawn_seeded().await;
    let (_, listing) = server.get_json("/api/products").await;
    let id = listing["results"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = server.replace(&id, &json!({ "price": 999 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Listing, search and statistics
// =============================================================================

#[tokio::test]
async fn test_category_filter_with_pagination() {
    let server = TestServer::spawn_seeded().await;

    let (status, body) = server
        .get_json("/api/products?category=electronics&page=1&limit=1")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 1);
    assert_eq!(names(&body["results"]), vec!["Laptop"]);
}

#[tokio::test]
async fn test_pages_cover_every_product_once() {
    let server = TestServer::spawn(ProductStore::new()).await;
    for i in 0..11 {
        server.create(&product(&format!("Item {i:02}"), "misc", 1.0)).await;
    }

    let limit = 4;
    let mut collected = Vec::new();
    for page in 1..=3 {
        let (_, body) = server
            .get_json(&format!("/api/products?page={page}&limit={limit}"))
            .await;
        assert_eq!(body["total"], 11);
        collected.extend(names(&body["results"]));
    }

    let expected: Vec<String> = (0..11).map(|i| format!("Item {i:02}")).collect();
    assert_eq!(collected, expected);

    let (_, beyond) = server.get_json("/api/products?page=4&limit=4").await;
    assert_eq!(beyond["total"], 11);
    assert!(beyond["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_pagination_uses_defaults() {
    let server = TestServer::spawn_seeded().await;
    let (status, body) = server.get_json("/api/products?page=abc&limit=zero").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
}

#[tokio::test]
async fn test_list_search_is_case_insensitive() {
    let server = TestServer::spawn_seeded().await;
    let (_, body) = server.get_json("/api/products?search=LAP").await;

    assert_eq!(body["total"], 1);
    assert_eq!(names(&body["results"]), vec!["Laptop"]);
}

#[tokio::test]
async fn test_search_endpoint() {
    let server = TestServer::spawn_seeded().await;
    let (status, body) = server.get_json("/api/products/search?name=phone").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Smartphone"]);
}

#[tokio::test]
async fn test_search_endpoint_requires_name() {
    let server = TestServer::spawn_seeded().await;
    let (status, body) = server.get_json("/api/products/search?name=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query parameter 'name' is required");
}

#[tokio::test]
async fn test_stats() {
    let server = TestServer::spawn_seeded().await;
    let (status, body) = server.get_json("/api/products/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["avgPrice"], 683.33);
    assert_eq!(body["countByCategory"], json!({ "electronics": 2, "kitchen": 1 }));
}

#[tokio::test]
async fn test_stats_on_empty_store() {
    let server = TestServer::spawn(ProductStore::new()).await;
    let (_, body) = server.get_json("/api/products/stats").await;

    assert_eq!(body["total"], 0);
    assert_eq!(body["avgPrice"], 0.0);
    assert_eq!(body["countByCategory"], json!({}));
}

// =============================================================================
// Error bodies
// =============================================================================

#[tokio::test]
async fn test_production_hides_stack() {
    let server = TestServer::spawn_with(ProductStore::new(), Environment::Production).await;
    let (status, body) = server.get_json("/api/products/ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Product with id 'ghost' not found" }));
}

#[tokio::test]
async fn test_unsupported_method_has_error_body() {
    let server = TestServer::spawn_seeded().await;
    let res = server
        .client
        .patch(server.url("/api/products/anything"))
        .header("x-api-key", API_KEY)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Method Not Allowed");
}

#[tokio::test]
async fn test_list_search_term_is_trimmed() {
    let server = TestServer::spawn_seeded().await;
    let (_, body) = server.get_json("/api/products?search=%20phone%20").await;

    assert_eq!(body["total"], 1);
    assert_eq!(names(&body["results"]), vec!["Smartphone"]);
}

#[tokio::test]
async fn test_development_includes_stack() {
    let server = TestServer::spawn(ProductStore::new()).await;
    let (_, body) = server.get_json("/api/products/ghost").await;

    assert!(body["stack"].as_str().unwrap().contains("NotFoundError"));
}
