//! Test fixtures.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::sync::Arc;

use axum::Router;
use serde_json::{Value, json};

use crate::api::RestplateApi;
use crate::conf::Config;
use crate::store::{Record, SqliteStore, Store};

pub const TEST_TOKEN: &str = "test-api-token";

pub fn make_bookmarks_array() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "Thinkful",
            "url": "https://www.thinkful.com",
            "description": "Think outside the classroom",
            "rating": 5
        }),
        json!({
            "id": 2,
            "title": "Google",
            "url": "https://www.google.com",
            "description": "Where we find everything else",
            "rating": 4
        }),
        json!({
            "id": 3,
            "title": "MDN",
            "url": "https://developer.mozilla.org",
            "description": "The only place to find web documentation",
            "rating": 5
        }),
    ]
}

/// Returns `(stored, expected)`: the row as inserted and as the API serves it.
pub fn make_malicious_bookmark() -> (Value, Value) {
    let stored = json!({
        "id": 911,
        "title": "Naughty naughty very naughty <script>alert(\"xss\");</script>",
        "url": "https://www.hackers.com",
        "description": "Bad image <img src=\"https://url.to.file.which/does-not.exist\" onerror=\"alert(document.cookie);\">. But not <strong>all</strong> bad.",
        "rating": 1
    });
    let expected = json!({
        "id": 911,
        "title": "Naughty naughty very naughty &lt;script&gt;alert(\"xss\");&lt;/script&gt;",
        "url": "https://www.hackers.com",
        "description": "Bad image &lt;img src=\"https://url.to.file.which/does-not.exist\" onerror=\"alert(document.cookie);\"&gt;. But not &lt;strong&gt;all&lt;/strong&gt; bad.",
        "rating": 1
    });
    (stored, expected)
}

pub fn make_items_array() -> Vec<Value> {
    vec![
        json!({"id": 1, "first_name": "Jon", "age": 32}),
        json!({"id": 2, "first_name": "Jane", "age": 21}),
        json!({"id": 3, "first_name": "Jimmy", "age": 34}),
        json!({"id": 4, "first_name": "Jeremiah", "age": 19}),
    ]
}

pub fn make_malicious_item() -> (Value, Value) {
    let stored = json!({
        "id": 100,
        "first_name": "Sally <script>alert(\"xss\");</script>",
        "age": 25
    });
    let expected = json!({
        "id": 100,
        "first_name": "Sally &lt;script&gt;alert(\"xss\");&lt;/script&gt;",
        "age": 25
    });
    (stored, expected)
}

/// A router over a fresh in-memory database with the default resources.
pub struct TestApp {
    pub store: Arc<SqliteStore>,
    pub router: Router,
}

impl TestApp {
    /// Open routes, no token required.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Routes guarded by [`TEST_TOKEN`].
    pub async fn with_auth() -> Self {
        let mut config = Config::default();
        config.auth.api_token = Some(TEST_TOKEN.to_string());
        Self::with_config(config).await
    }

    pub async fn with_config(config: Config) -> Self {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let api = RestplateApi::from_config(&config, store.clone())
            .await
            .unwrap();
        Self {
            store,
            router: api.router(),
        }
    }

    /// Inserts rows as-is, bypassing validation.
    pub async fn seed(&self, table: &str, rows: &[Value]) {
        for row in rows {
            self.store.insert(table, to_record(row)).await.unwrap();
        }
    }
}

pub fn to_record(value: &Value) -> Record {
    value
        .as_object()
        .cloned()
        .expect("fixture rows are JSON objects")
}
