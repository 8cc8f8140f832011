use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use eventdesk::{create_router, init_pool, run_migrations, AppState, SqliteStore};
use eventdesk_core::{PlainHasher, Services};

const MAX_IMAGE_BYTES: usize = 1024;

/// Create a test app with in-memory database.
async fn create_test_app() -> axum::Router {
    let pool = init_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let services = Services::new(Arc::new(SqliteStore::new(pool)), Arc::new(PlainHasher));
    create_router(AppState::new(services, MAX_IMAGE_BYTES))
}

/// Helper to get response body as string.
async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_string(body).await).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create_user(app: &axum::Router, name: &str, email: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            &format!(r#"{{"name": "{name}", "email": "{email}", "password": "secret1"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response.into_body()).await["id"].as_i64().unwrap()
}

async fn create_event(app: &axum::Router, creator_id: i64, name: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/events",
            &format!(
                r#"{{
                    "creator_id": {creator_id},
                    "name": "{name}",
                    "is_EAD": true,
                    "event_date": "2031-09-15T19:00:00"
                }}"#
            ),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response.into_body()).await["id"].as_i64().unwrap()
}

// ============================================================================
// Health endpoint tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response.into_body()).await, "OK");
}

// ============================================================================
// User endpoint tests
// ============================================================================

#[tokio::test]
async fn test_create_user() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            r#"{
                "name": "Ana",
                "email": "ana@example.com",
                "fone": "555-0101",
                "password": "secret1",
                "birthdate": "1990-04-02"
            }"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["id"], 1);
    assert_eq!(json["name"], "Ana");
    assert_eq!(json["phone"], "555-0101");
    assert_eq!(json["birth_date"], "1990-04-02");
    assert_eq!(json["is_active"], true);
    assert!(json.get("password_hash").is_none());

    // Wallet is provisioned with the user
    let response = app.oneshot(get("/api/wallets/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await["user_id"], 1);
}

#[tokio::test]
async fn test_create_user_blank_fields() {
    let app = create_test_app().await;

    let response = app
        .oneshot(json_request("POST", "/api/users", r#"{"name": " ", "email": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response.into_body()).await,
        "name must not be blank; email must not be blank"
    );
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let app = create_test_app().await;
    create_user(&app, "Ana", "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            r#"{"name": "Ana Two", "email": "ana@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_string(response.into_body()).await,
        "email already exists: ana@example.com"
    );

    let response = app.oneshot(get("/api/users")).await.unwrap();
    assert_eq!(body_json(response.into_body()).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_validate_user() {
    let app = create_test_app().await;
    create_user(&app, "Ana", "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/validate",
            r#"{"name": "Bia", "email": "bia@example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response.into_body()).await, "valid");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/validate",
            r#"{"name": "Ana", "email": "ana@example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response.into_body()).await,
        "name already exists: Ana; email already exists: ana@example.com"
    );
}

#[tokio::test]
async fn test_get_user_by_id_and_email() {
    let app = create_test_app().await;
    let id = create_user(&app, "Ana", "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/users/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await["email"], "ana@example.com");

    let response = app
        .clone()
        .oneshot(get("/api/users/email/ana@example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await["id"], id);

    let response = app.oneshot(get("/api/users/99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response.into_body()).await, "user not found: 99");
}

#[tokio::test]
async fn test_update_user_keeps_own_values() {
    let app = create_test_app().await;
    let id = create_user(&app, "Ana", "ana@example.com").await;
    create_user(&app, "Bia", "bia@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{id}"),
            r#"{"name": "Ana", "email": "ana@example.com", "is_admin": true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await["is_admin"], true);

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{id}"),
            r#"{"name": "Bia", "email": "ana@example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_user_is_soft() {
    let app = create_test_app().await;
    let id = create_user(&app, "Ana", "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/users/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/users/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await["is_active"], false);

    // Inactive users cannot log in
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            r#"{"email": "ana@example.com", "password": "secret1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_and_change_password() {
    let app = create_test_app().await;
    let id = create_user(&app, "Ana", "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            r#"{"email": "ana@example.com", "password": "secret1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await["id"], id);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{id}/password"),
            r#"{"old_password": "wrong", "new_password": "secret2"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{id}/password"),
            r#"{"oldPassword": "secret1", "newPassword": "secret2"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            r#"{"email": "ana@example.com", "password": "secret1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Event endpoint tests
// ============================================================================

#[tokio::test]
async fn test_create_event_defaults_deadline() {
    let app = create_test_app().await;
    let ana = create_user(&app, "Ana", "ana@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/events",
            &format!(
                r#"{{
                    "creatorId": {ana},
                    "event_name": "Rust Night",
                    "is_EAD": false,
                    "address": "Main Street 1",
                    "event_date": "2031-09-15T19:00:00",
                    "lot_quantity": 40
                }}"#
            ),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["name"], "Rust Night");
    assert_eq!(json["is_EAD"], false);
    assert_eq!(json["purchase_deadline"], "2031-09-15T19:00:00");
    assert_eq!(json["capacity"], 40);
    assert_eq!(json["quantity"], 0);
    assert_eq!(json["presenters"], serde_json::json!([]));
    assert_eq!(json["has_image"], false);
}

#[tokio::test]
async fn test_create_event_violations() {
    let app = create_test_app().await;
    let ana = create_user(&app, "Ana", "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/events",
            &format!(
                r#"{{
                    "creator_id": {ana},
                    "name": "Rust Night",
                    "is_EAD": false,
                    "event_date": "2031-09-15T19:00:00",
                    "purchase_deadline": "2031-09-16T00:00:00"
                }}"#
            ),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response.into_body()).await,
        "address is required for in-person events; purchase deadline must not be after the event date"
    );

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/events",
            r#"{
                "creator_id": 42,
                "name": "Rust Night",
                "is_EAD": true,
                "event_date": "2031-09-15T19:00:00"
            }"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response.into_body()).await,
        "creator does not exist: 42"
    );

    let response = app.oneshot(get("/api/events")).await.unwrap();
    assert!(body_json(response.into_body()).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_event_duplicate_name() {
    let app = create_test_app().await;
    let ana = create_user(&app, "Ana", "ana@example.com").await;
    create_event(&app, ana, "Rust Night").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/events",
            &format!(
                r#"{{"creator_id": {ana}, "name": "Rust Night", "is_EAD": true, "event_date": "2031-10-01T10:00:00"}}"#
            ),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_string(response.into_body()).await,
        "event name already exists: Rust Night"
    );
}

#[tokio::test]
async fn test_search_events() {
    let app = create_test_app().await;
    let ana = create_user(&app, "Ana", "ana@example.com").await;
    let bia = create_user(&app, "Bia", "bia@example.com").await;
    create_event(&app, ana, "Rust Night").await;
    create_event(&app, bia, "Async Rust").await;
    create_event(&app, bia, "Go Night").await;

    let response = app.clone().oneshot(get("/api/events?q=rust")).await.unwrap();
    assert_eq!(body_json(response.into_body()).await.as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/events?creator_id={bia}")))
        .await
        .unwrap();
    assert_eq!(body_json(response.into_body()).await.as_array().unwrap().len(), 2);

    let response = app
        .oneshot(get("/api/events/name/Go%20Night"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await["creator_id"], bia);
}

#[tokio::test]
async fn test_update_and_delete_event() {
    let app = create_test_app().await;
    let ana = create_user(&app, "Ana", "ana@example.com").await;
    let id = create_event(&app, ana, "Rust Night").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/events/{id}"),
            &format!(
                r#"{{
                    "creator_id": {ana},
                    "name": "Rust Night",
                    "is_EAD": true,
                    "event_date": "2031-09-15T19:00:00",
                    "quantity": 25,
                    "presenters": ["Ana", "Bia"]
                }}"#
            ),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["quantity"], 25);
    assert_eq!(json["presenters"], serde_json::json!(["Ana", "Bia"]));

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/events/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/api/events/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validate_event_reports_null_presenters() {
    let app = create_test_app().await;
    let ana = create_user(&app, "Ana", "ana@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/events/validate",
            &format!(
                r#"{{"creator_id": {ana}, "name": "Rust Night", "is_EAD": true, "event_date": "2031-09-15T19:00:00", "presenters": null}}"#
            ),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response.into_body()).await,
        "presenters must not be null (may be empty)"
    );
}

#[tokio::test]
async fn test_event_image() {
    let app = create_test_app().await;
    let ana = create_user(&app, "Ana", "ana@example.com").await;
    let id = create_event(&app, ana, "Rust Night").await;
    let uri = format!("/api/events/{id}/image");

    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(&uri)
                .header("Content-Type", "image/png")
                .body(Body::from(png.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await["has_image"], true);

    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.to_vec(), png);

    // Larger than the configured limit
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(&uri)
                .body(Body::from(vec![0u8; MAX_IMAGE_BYTES + 1]))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// ============================================================================
// Wallet and enrollment endpoint tests
// ============================================================================

#[tokio::test]
async fn test_validate_wallet() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/wallets/validate", r#"{"user_id": 3}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request("POST", "/api/wallets/validate", r#"{}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response.into_body()).await,
        "user_id is required and must be positive"
    );
}

#[tokio::test]
async fn test_enrollment_lifecycle() {
    let app = create_test_app().await;
    let ana = create_user(&app, "Ana", "ana@example.com").await;
    let event = create_event(&app, ana, "Rust Night").await;
    let body = format!(r#"{{"userId": {ana}, "eventId": {event}}}"#);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/event-wallets", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/event-wallets", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_string(response.into_body()).await,
        format!("link already exists: (user:{ana}, event:{event})")
    );

    let response = app
        .clone()
        .oneshot(get(&format!("/api/event-wallets/user/{ana}")))
        .await
        .unwrap();
    let links = body_json(response.into_body()).await;
    assert_eq!(links.as_array().unwrap().len(), 1);
    assert_eq!(links[0]["event_id"], event);

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/event-wallets/{ana}/{event}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(delete(&format!("/api/event-wallets/{ana}/{event}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_enrollment_dangling_references() {
    let app = create_test_app().await;
    let ana = create_user(&app, "Ana", "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/event-wallets",
            &format!(r#"{{"user_id": {ana}, "event_id": 9}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response.into_body()).await, "event does not exist: 9");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/event-wallets/validate",
            r#"{"user_id": 0}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response.into_body()).await,
        "user_id is required and must be positive; event_id is required and must be positive"
    );
}

// ============================================================================
// Seed endpoint tests
// ============================================================================

#[tokio::test]
async fn test_seed() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/seed",
            r#"{
                "users": [
                    {"name": "Ana", "email": "ana@example.com"},
                    {"name": "Bia", "email": "bia@example.com"},
                    {"name": "Ana", "email": "clone@example.com"}
                ],
                "events": [
                    {"creator_id": 1, "name": "Rust Night", "is_EAD": true, "event_date": "2031-09-15T19:00:00"},
                    {"creator_id": 2, "name": "Go Night", "is_EAD": false, "event_date": "2031-09-16T19:00:00"}
                ],
                "enrollments": [
                    {"user_id": 2, "event_id": 1},
                    {"user_id": 2, "event_id": 2}
                ]
            }"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["usersCreated"], 2);
    assert_eq!(json["eventsCreated"], 1);
    assert_eq!(json["linksCreated"], 1);
    assert_eq!(json["status"], "success");
    assert!(json["errors"].as_array().unwrap().is_empty());

    let warnings: Vec<&str> = json["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["key"].as_str().unwrap())
        .collect();
    assert_eq!(warnings, vec!["clone@example.com", "Go Night", "(user:2, event:2)"]);

    let response = app.oneshot(get("/api/event-wallets/user/2")).await.unwrap();
    assert_eq!(body_json(response.into_body()).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_seed_storage_failure_is_multi_status() {
    let pool = init_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    sqlx::raw_sql(
        r#"
        CREATE TRIGGER reject_broken_event BEFORE INSERT ON events
        WHEN NEW.name = 'Broken'
        BEGIN
            SELECT RAISE(ABORT, 'events volume unavailable');
        END;
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();
    let services = Services::new(Arc::new(SqliteStore::new(pool)), Arc::new(PlainHasher));
    let app = create_router(AppState::new(services, MAX_IMAGE_BYTES));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/seed",
            r#"{
                "users": [
                    {"name": null, "email": "ghost@example.com"},
                    {"name": "Ana", "email": "ana@example.com"}
                ],
                "events": [
                    {"creator_id": 1, "name": "Broken", "is_EAD": true, "event_date": "2031-09-15T19:00:00"},
                    {"creator_id": 1, "name": "Rust Night", "is_EAD": true, "event_date": "2031-09-16T19:00:00", "quantity": null}
                ],
                "enrollments": [{"user_id": 1, "event_id": 1}]
            }"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MULTI_STATUS);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["usersCreated"], 1);
    assert_eq!(json["eventsCreated"], 1);
    assert_eq!(json["linksCreated"], 1);
    assert_eq!(json["status"], "partial_success");
    assert_eq!(json["warnings"][0]["key"], "ghost@example.com");
    assert_eq!(json["warnings"][0]["message"], "name must not be blank");
    assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    assert_eq!(json["errors"][0]["key"], "Broken");
    assert_eq!(json["errors"][0]["message"], "Internal error");
}

#[tokio::test]
async fn test_seed_empty_request() {
    let app = create_test_app().await;

    let response = app
        .oneshot(json_request("POST", "/api/seed", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["usersCreated"], 0);
    assert_eq!(json["status"], "success");
}

// ============================================================================
// Production wiring
// ============================================================================

#[tokio::test]
async fn test_argon2_login() {
    let pool = init_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    let app = create_router(AppState::with_sqlite(pool, MAX_IMAGE_BYTES));

    create_user(&app, "Ana", "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            r#"{"email": "ana@example.com", "password": "secret1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            r#"{"email": "ana@example.com", "password": "nope"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
