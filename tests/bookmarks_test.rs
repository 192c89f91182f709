mod common;

use axum::http::{StatusCode, header};
use rstest::rstest;
use serde_json::{Value, json};

use common::{delete, error_message, get, post, send, send_json};
use restplate::testutil::{TestApp, make_bookmarks_array, make_malicious_bookmark};

fn new_bookmark() -> Value {
    json!({
        "title": "New Title",
        "url": "http://new-url.com",
        "rating": 1,
        "description": "awesome bookmark"
    })
}

#[tokio::test]
async fn test_list_empty() {
    let app = TestApp::new().await;
    let (status, json) = send_json(&app.router, get("/bookmarks")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_list_seeded() {
    let app = TestApp::new().await;
    let bookmarks = make_bookmarks_array();
    app.seed("bookmarks", &bookmarks).await;

    let (status, json) = send_json(&app.router, get("/bookmarks")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, Value::Array(bookmarks));
}

#[tokio::test]
async fn test_list_escapes_markup() {
    let app = TestApp::new().await;
    let (malicious, expected) = make_malicious_bookmark();
    app.seed("bookmarks", &[malicious]).await;

    let (status, json) = send_json(&app.router, get("/bookmarks")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["title"], expected["title"]);
    assert_eq!(json[0]["description"], expected["description"]);
    assert_eq!(json[0]["url"], expected["url"]);
}

#[tokio::test]
async fn test_get_missing() {
    let app = TestApp::new().await;
    let (status, json) = send_json(&app.router, get("/bookmarks/123")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({"error": {"message": "Bookmark not found"}}));
}

#[tokio::test]
async fn test_get_non_numeric_id_is_not_found() {
    let app = TestApp::new().await;
    let (status, json) = send_json(&app.router, get("/bookmarks/abc")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&json), "Bookmark not found");
}

#[tokio::test]
async fn test_get_by_id() {
    let app = TestApp::new().await;
    let bookmarks = make_bookmarks_array();
    app.seed("bookmarks", &bookmarks).await;

    let (status, json) = send_json(&app.router, get("/bookmarks/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, bookmarks[1]);
}

#[tokio::test]
async fn test_get_escapes_markup() {
    let app = TestApp::new().await;
    let (malicious, expected) = make_malicious_bookmark();
    app.seed("bookmarks", &[malicious]).await;

    let (status, json) = send_json(&app.router, get("/bookmarks/911")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, expected);
}

#[tokio::test]
async fn test_repeated_get_is_byte_identical() {
    let app = TestApp::new().await;
    let (malicious, _) = make_malicious_bookmark();
    app.seed("bookmarks", &[malicious]).await;

    let (_, _, first) = send(&app.router, get("/bookmarks/911")).await;
    let (_, _, second) = send(&app.router, get("/bookmarks/911")).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_create_then_get() {
    let app = TestApp::new().await;
    let bookmark = new_bookmark();

    let (status, headers, bytes) = send(&app.router, post("/bookmarks", &bookmark)).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(created["title"], bookmark["title"]);
    assert_eq!(created["url"], bookmark["url"]);
    assert_eq!(created["rating"], bookmark["rating"]);
    assert_eq!(created["description"], bookmark["description"]);

    let id = created["id"].as_i64().unwrap();
    let location = format!("/bookmarks/{id}");
    assert_eq!(headers[header::LOCATION], location.as_str());

    let (status, _, fetched) = send(&app.router, get(&location)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, bytes);
}

#[tokio::test]
async fn test_create_assigns_unique_ids() {
    let app = TestApp::new().await;
    app.seed("bookmarks", &make_bookmarks_array()).await;

    let mut ids = vec![1, 2, 3];
    for _ in 0..3 {
        let (status, json) = send_json(&app.router, post("/bookmarks", &new_bookmark())).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = json["id"].as_i64().unwrap();
        assert!(!ids.contains(&id));
        ids.push(id);
    }
}

#[tokio::test]
async fn test_create_escapes_markup() {
    let app = TestApp::new().await;
    let (mut malicious, expected) = make_malicious_bookmark();
    malicious.as_object_mut().unwrap().remove("id");

    let (status, json) = send_json(&app.router, post("/bookmarks", &malicious)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["title"], expected["title"]);
    assert_eq!(json["description"], expected["description"]);
}

#[tokio::test]
async fn test_create_ignores_client_id() {
    let app = TestApp::new().await;
    let mut bookmark = new_bookmark();
    bookmark["id"] = json!(500);

    let (status, json) = send_json(&app.router, post("/bookmarks", &bookmark)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["id"], json!(1));
}

#[rstest]
#[case("title")]
#[case("url")]
#[case("rating")]
#[case("description")]
#[tokio::test]
async fn test_create_missing_field(#[case] field: &str) {
    let app = TestApp::new().await;
    let mut bookmark = new_bookmark();
    bookmark.as_object_mut().unwrap().remove(field);

    let (status, json) = send_json(&app.router, post("/bookmarks", &bookmark)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({"error": {"message": format!("Missing required {field} in bookmark")}})
    );
}

#[rstest]
#[case(json!(0), 0)]
#[case(json!(2.0), 2)]
#[case(json!(5), 5)]
#[tokio::test]
async fn test_create_rating_in_range(#[case] rating: Value, #[case] stored: i64) {
    let app = TestApp::new().await;
    let mut bookmark = new_bookmark();
    bookmark["rating"] = rating;

    let (status, json) = send_json(&app.router, post("/bookmarks", &bookmark)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["rating"], json!(stored));
}

#[tokio::test]
async fn test_create_invalid_url() {
    let app = TestApp::new().await;
    let mut bookmark = new_bookmark();
    bookmark["url"] = json!("invalid");

    let (status, json) = send_json(&app.router, post("/bookmarks", &bookmark)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"error": {"message": "Invalid URL"}}));
}

#[rstest]
#[case(json!(9))]
#[case(json!(-1))]
#[case(json!(4.5))]
#[tokio::test]
async fn test_create_invalid_rating(#[case] rating: Value) {
    let app = TestApp::new().await;
    let mut bookmark = new_bookmark();
    bookmark["rating"] = rating;

    let (status, json) = send_json(&app.router, post("/bookmarks", &bookmark)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"error": {"message": "Not a valid rating"}}));

    let (_, list) = send_json(&app.router, get("/bookmarks")).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_malformed_json() {
    let app = TestApp::new().await;
    let req = axum::http::Request::post("/bookmarks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{\"title\": "))
        .unwrap();

    let (status, json) = send_json(&app.router, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_message(&json).is_empty());
}

#[tokio::test]
async fn test_delete_missing() {
    let app = TestApp::new().await;
    let (status, json) = send_json(&app.router, delete("/bookmarks/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({"error": {"message": "Bookmark not found"}}));
}

#[tokio::test]
async fn test_delete_existing() {
    let app = TestApp::new().await;
    let bookmarks = make_bookmarks_array();
    app.seed("bookmarks", &bookmarks).await;

    let (status, _, body) = send(&app.router, delete("/bookmarks/1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (_, json) = send_json(&app.router, get("/bookmarks")).await;
    assert_eq!(json, Value::Array(bookmarks[1..].to_vec()));

    let (status, _) = send_json(&app.router, get("/bookmarks/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bookmarks_have_no_patch() {
    let app = TestApp::new().await;
    app.seed("bookmarks", &make_bookmarks_array()).await;

    let req = common::patch("/bookmarks/1", &json!({"title": "Changed"}));
    let (status, _, _) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
