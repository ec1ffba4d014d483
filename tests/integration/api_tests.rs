//! API integration tests
//!
//! Run against a live server with a migrated database:
//! `cargo test --test api_tests -- --ignored`

use assetdesk_server::models::user::{Role, UserClaims};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Seeded administrator
const ADMIN_ID: i32 = 1;

fn token(role: Role) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    UserClaims::new("integration", ADMIN_ID, role, 3600)
        .create_token(&secret)
        .expect("Failed to sign token")
}

/// Suffix keeping names unique across runs
fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

async fn post(client: &Client, path: &str, role: Role, body: Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .bearer_auth(token(role))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    (status, response.json().await.expect("Failed to parse response"))
}

async fn get(client: &Client, path: &str, role: Role) -> (StatusCode, Value) {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .bearer_auth(token(role))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    (status, response.json().await.expect("Failed to parse response"))
}

async fn delete(client: &Client, path: &str, role: Role) -> (StatusCode, Value) {
    let response = client
        .delete(format!("{}{}", BASE_URL, path))
        .bearer_auth(token(role))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    (status, response.json().await.expect("Failed to parse response"))
}

/// `pagination.total` of a list request
async fn total(client: &Client, path: &str) -> i64 {
    let (status, body) = get(client, path, Role::User).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["pagination"]["total"].as_i64().expect("total")
}

async fn create_location(client: &Client) -> i64 {
    let (status, body) = post(
        client,
        "/locations",
        Role::Admin,
        json!({ "name": unique("Room") }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().expect("location id")
}

async fn create_computer(client: &Client, location_id: i64) -> i64 {
    let (status, body) = post(
        client,
        "/computers",
        Role::Manager,
        json!({ "name": unique("Laptop"), "locationId": location_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "Available");
    body["data"]["id"].as_i64().expect("computer id")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_second_checkout_is_rejected() {
    let client = Client::new();
    let location = create_location(&client).await;
    let computer = create_computer(&client, location).await;
    let checkout = json!({ "assignedTo": ADMIN_ID, "assignedLocation": location });

    let (status, body) = post(
        &client,
        &format!("/computers/{}/checkout", computer),
        Role::User,
        checkout.clone(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "In Use");
    assert_eq!(body["data"]["transaction"]["action"], "Check-out");

    let (status, body) = post(
        &client,
        &format!("/computers/{}/checkout", computer),
        Role::User,
        checkout,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"]["message"].as_str().unwrap_or_default();
    assert!(message.contains("In Use"), "unexpected message: {}", message);

    let (status, body) = post(
        &client,
        &format!("/computers/{}/checkin", computer),
        Role::User,
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Available");
    assert_eq!(body["data"]["transaction"]["assignedTo"], ADMIN_ID);
}

#[tokio::test]
#[ignore]
async fn test_checkout_of_missing_resource_is_not_found() {
    let client = Client::new();
    let location = create_location(&client).await;

    let (status, body) = post(
        &client,
        "/monitors/999999999/checkout",
        Role::User,
        json!({ "assignedTo": ADMIN_ID, "assignedLocation": location }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore]
async fn test_borrow_request_approval_checks_out_target() {
    let client = Client::new();
    let location = create_location(&client).await;
    let computer = create_computer(&client, location).await;

    let (status, body) = post(
        &client,
        "/borrow-requests",
        Role::User,
        json!({
            "target": { "kind": "computer", "resourceId": computer },
            "purpose": "Conference demo",
            "locationId": location
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "Pending");
    let request = body["data"]["id"].as_i64().expect("request id");

    let (status, body) = post(
        &client,
        &format!("/borrow-requests/{}/approve", request),
        Role::Manager,
        json!({ "approved": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["request"]["status"], "Approved");
    assert_eq!(body["data"]["transaction"]["borrowRequestId"], request);

    let (_, body) = get(&client, &format!("/computers/{}", computer), Role::User).await;
    assert_eq!(body["data"]["status"], "In Use");

    // Decided requests stay decided
    let (status, _) = post(
        &client,
        &format!("/borrow-requests/{}/approve", request),
        Role::Manager,
        json!({ "approved": false, "rejectionReason": "Changed my mind" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(
        &client,
        &format!("/borrow-requests/{}/events", request),
        Role::User,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = body["data"]
        .as_array()
        .expect("events")
        .iter()
        .filter_map(|event| event["action"].as_str())
        .collect();
    assert_eq!(actions, vec!["Submitted", "Approved"]);
}

#[tokio::test]
#[ignore]
async fn test_borrow_request_rejection_leaves_target_available() {
    let client = Client::new();
    let location = create_location(&client).await;
    let computer = create_computer(&client, location).await;

    let (_, body) = post(
        &client,
        "/borrow-requests",
        Role::User,
        json!({ "target": { "kind": "computer", "resourceId": computer } }),
    )
    .await;
    let request = body["data"]["id"].as_i64().expect("request id");

    let (status, body) = post(
        &client,
        &format!("/borrow-requests/{}/approve", request),
        Role::Admin,
        json!({ "approved": false, "rejectionReason": "Not available this week" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["request"]["status"], "Rejected");
    assert_eq!(body["data"]["request"]["rejectionReason"], "Not available this week");
    assert!(body["data"]["transaction"].is_null());

    let (_, body) = get(&client, &format!("/computers/{}", computer), Role::User).await;
    assert_eq!(body["data"]["status"], "Available");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_vendor_name() {
    let client = Client::new();
    let name = unique("Vendor");

    let (status, _) = post(&client, "/vendors", Role::Admin, json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&client, "/vendors", Role::Admin, json!({ "name": name })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore]
async fn test_duplicates_report_the_conflicting_field() {
    let client = Client::new();
    let cases = [
        ("/categories", "name", unique("Category"), "Category name already exists"),
        ("/contracts", "contractNumber", unique("CN"), "Contract number already exists"),
        ("/domains", "domainName", format!("{}.example", unique("d")), "Domain name already exists"),
    ];

    for (path, field, value, message) in cases {
        let mut body = json!({ field: value.clone() });
        if path == "/contracts" {
            body["title"] = json!("Support");
        }

        let (status, _) = post(&client, path, Role::Admin, body.clone()).await;
        assert_eq!(status, StatusCode::CREATED, "{}", path);

        let (status, response) = post(&client, path, Role::Admin, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);
        assert_eq!(response["error"]["message"], message);

        assert_eq!(total(&client, &format!("{}?search={}", path, value)).await, 1);
    }
}

#[tokio::test]
#[ignore]
async fn test_location_with_assets_cannot_be_deleted() {
    let client = Client::new();
    let location = create_location(&client).await;
    let (status, _) = post(
        &client,
        "/assets",
        Role::Manager,
        json!({ "assetTag": unique("TAG"), "name": "Scanner", "locationId": location }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = delete(&client, &format!("/locations/{}", location), Role::Admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Location is in use by one or more assets");

    let (status, _) = get(&client, &format!("/locations/{}", location), Role::User).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_rejected_checkout_writes_no_record() {
    let client = Client::new();
    let location = create_location(&client).await;
    let computer = create_computer(&client, location).await;
    let checkout = json!({ "assignedTo": ADMIN_ID, "assignedLocation": location });
    let path = format!("/computers/{}/checkout", computer);

    let (status, _) = post(&client, &path, Role::User, checkout.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(&client, &path, Role::User, checkout).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let records = format!(
        "/transactions?resourceKind=computer&resourceId={}&action=Check-out",
        computer
    );
    assert_eq!(total(&client, &records).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_low_stock_total_matches_rows() {
    let client = Client::new();
    let location = create_location(&client).await;
    for (quantity, reorder_level) in [(1, 5), (5, 5), (10, 2)] {
        let (status, _) = post(
            &client,
            "/cartridges",
            Role::Manager,
            json!({
                "name": unique("Toner"),
                "quantity": quantity,
                "reorderLevel": reorder_level,
                "locationId": location
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get(
        &client,
        &format!("/cartridges?locationId={}&lowStock=true&limit=1", location),
        Role::User,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 2);
    assert_eq!(body["data"]["rows"].as_array().map(Vec::len), Some(1));
    assert_eq!(total(&client, &format!("/cartridges?locationId={}", location)).await, 3);
}

#[tokio::test]
#[ignore]
async fn test_bodyless_approval_approves() {
    let client = Client::new();
    let location = create_location(&client).await;
    let computer = create_computer(&client, location).await;

    let (_, body) = post(
        &client,
        "/borrow-requests",
        Role::User,
        json!({ "target": { "kind": "computer", "resourceId": computer } }),
    )
    .await;
    let request = body["data"]["id"].as_i64().expect("request id");

    let response = client
        .post(format!("{}/borrow-requests/{}/approve", BASE_URL, request))
        .bearer_auth(token(Role::Manager))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["request"]["status"], "Approved");
}

#[tokio::test]
#[ignore]
async fn test_checked_out_asset_cannot_be_deleted() {
    let client = Client::new();
    let location = create_location(&client).await;
    let computer = create_computer(&client, location).await;
    let (status, _) = post(
        &client,
        &format!("/computers/{}/checkout", computer),
        Role::User,
        json!({ "assignedTo": ADMIN_ID, "assignedLocation": location }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = delete(&client, &format!("/computers/{}", computer), Role::Manager).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(&client, &format!("/computers/{}", computer), Role::User).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "In Use");
}

#[tokio::test]
#[ignore]
async fn test_location_in_use_cannot_be_deleted() {
    let client = Client::new();
    let location = create_location(&client).await;
    create_computer(&client, location).await;

    let (status, body) = delete(&client, &format!("/locations/{}", location), Role::Admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Location is in use by one or more equipment items"
    );
}

#[tokio::test]
#[ignore]
async fn test_asset_delete_is_soft() {
    let client = Client::new();

    let (status, body) = post(
        &client,
        "/assets",
        Role::Manager,
        json!({ "assetTag": unique("TAG"), "name": "Projector" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let asset = body["data"]["id"].as_i64().expect("asset id");

    let response = client
        .delete(format!("{}/assets/{}", BASE_URL, asset))
        .bearer_auth(token(Role::Manager))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = get(&client, &format!("/assets/{}", asset), Role::User).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_pagination_metadata() {
    let client = Client::new();
    let location = create_location(&client).await;
    for _ in 0..3 {
        create_computer(&client, location).await;
    }

    let (status, body) = get(
        &client,
        &format!("/computers?locationId={}&page=2&limit=2", location),
        Role::User,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 3);
    assert_eq!(body["data"]["pagination"]["page"], 2);
    assert_eq!(body["data"]["rows"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore]
async fn test_settings_round_trip() {
    let client = Client::new();
    let key = unique("ui.theme");

    let response = client
        .put(format!("{}/settings", BASE_URL))
        .bearer_auth(token(Role::Admin))
        .json(&json!({ key.clone(): "dark" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let (status, body) = get(&client, "/settings", Role::Admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][&key], "dark");
}
