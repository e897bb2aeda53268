// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


mod handlers;
pub mod server;
mod state;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use portpicker::pick_unused_port;
    use reqwest::Client;
    use reqwest::StatusCode;
    use serde_json::Value;
    use serde_json::json;
    use tempfile::TempDir;
    use tempfile::tempdir;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;
    use versecards_core::Fallible;

    use crate::cmd::serve::server::ServerConfig;
    use crate::cmd::serve::server::start_server;

    const TEST_HOST: &str = "127.0.0.1";

    async fn wait_for_server(host: &str, port: u16) {
        loop {
            if let Ok(stream) = TcpStream::connect(format!("{host}:{port}")).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
    }

    /// Start a server on a fresh database. The directory must outlive the test.
    async fn start() -> Fallible<(TempDir, String)> {
        let port = pick_unused_port().unwrap();
        let dir = tempdir()?;
        let config = ServerConfig {
            database: dir.path().join("cards.db"),
            host: TEST_HOST.to_string(),
            port,
        };
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await;
        Ok((dir, format!("http://{TEST_HOST}:{port}")))
    }

    #[tokio::test]
    async fn test_start_server_on_unopenable_database() -> Fallible<()> {
        let dir = tempdir()?;
        // The database's parent directory is a regular file.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "")?;
        let config = ServerConfig {
            database: blocker.join("cards.db"),
            host: TEST_HOST.to_string(),
            port: pick_unused_port().unwrap(),
        };
        assert!(start_server(config).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e() -> Fallible<()> {
        let (_dir, base) = start().await?;
        let client = Client::new();

        // Add a card.
        let response = client
            .post(format!("{base}/users/alice/cards"))
            .json(&json!({
                "verse_reference": "John  3:16",
                "verse_text": "For God so loved the world",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let card: Value = response.json().await.unwrap();
        assert_eq!(card["verse_reference"], "John 3:16");
        assert_eq!(card["mastery_level"], 0);
        assert_eq!(card["review_count"], 0);
        assert_eq!(card["notes"], "");
        assert_eq!(card["last_reviewed_at"], Value::Null);
        let id = card["id"].as_i64().unwrap();

        // Adding it again is rejected.
        let response = client
            .post(format!("{base}/users/alice/cards"))
            .json(&json!({
                "verse_reference": "John 3:16",
                "verse_text": "something else",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // A malformed reference is a bad request.
        let response = client
            .post(format!("{base}/users/alice/cards"))
            .json(&json!({ "verse_reference": "John", "verse_text": "" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("invalid verse reference"));

        // Fetch it by reference.
        let response = client
            .get(format!("{base}/users/alice/cards/John 3:16"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Value = response.json().await.unwrap();
        assert_eq!(fetched, card);

        // Another user has no such card.
        let response = client
            .get(format!("{base}/users/bob/cards/John 3:16"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // It is due today, but was not due in the past.
        let due: Value = client
            .get(format!("{base}/users/alice/due"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(due.as_array().unwrap().len(), 1);
        let due: Value = client
            .get(format!("{base}/users/alice/due?as_of=2000-01-01"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(due.as_array().unwrap().len(), 0);
        let response = client
            .get(format!("{base}/users/alice/due?as_of=yesterday"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Review it.
        let response = client
            .post(format!("{base}/cards/{id}/review"))
            .json(&json!({ "outcome": "success" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let reviewed: Value = response.json().await.unwrap();
        assert_eq!(reviewed["mastery_level"], 1);
        assert_eq!(reviewed["review_interval_days"], 3);
        assert_eq!(reviewed["review_count"], 1);
        assert!(reviewed["last_reviewed_at"].is_string());

        // Review errors.
        let response = client
            .post(format!("{base}/cards/{id}/review"))
            .json(&json!({ "outcome": "maybe" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = client
            .post(format!("{base}/cards/9999/review"))
            .json(&json!({ "outcome": "failure" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // A non-numeric ID and a body missing its fields are bad requests,
        // reported in the same JSON shape as every other error.
        let response = client
            .post(format!("{base}/cards/abc/review"))
            .json(&json!({ "outcome": "success" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
        let response = client
            .post(format!("{base}/cards/{id}/review"))
            .json(&json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("outcome"));
        let response = client
            .post(format!("{base}/users/alice/cards"))
            .json(&json!({ "verse_reference": "John 3:17" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("verse_text"));
        let response = client
            .put(format!("{base}/cards/{id}/notes"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());

        // Edit the notes.
        let response = client
            .put(format!("{base}/cards/{id}/notes"))
            .json(&json!({ "notes": "learned at camp" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let noted: Value = response.json().await.unwrap();
        assert_eq!(noted["notes"], "learned at camp");
        assert_eq!(noted["mastery_level"], 1);

        // Stats.
        let stats: Value = client
            .get(format!("{base}/users/alice/stats"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(stats["total_cards"], 1);
        assert_eq!(stats["due_cards"], 0);
        assert_eq!(stats["total_reviews"], 1);
        assert_eq!(stats["cards_by_level"], json!([0, 1, 0, 0, 0, 0]));

        // Remove it, twice.
        let response = client
            .delete(format!("{base}/cards/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = client
            .delete(format!("{base}/cards/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the not found endpoint.
        let response = client
            .get(format!("{base}/herp-derp"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        Ok(())
    }
}
