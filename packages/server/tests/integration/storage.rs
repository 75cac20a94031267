use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use crate::common::{TestApp, routes, store::PUBLIC_BASE};

fn objects_query(query: &str) -> String {
    format!("{}?{query}", routes::OBJECTS)
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn lists_objects_with_guessed_content_types() {
        let app = TestApp::spawn().await;
        app.store.insert("videos/a.mp4", b"aaaa", "video/mp4");
        app.store.insert("thumbnails/a.jpg", b"bb", "image/jpeg");
        let token = app.admin_token().await;

        let res = app.get_with_token(routes::OBJECTS, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.data();
        assert_eq!(data["total_count"], 2);
        assert_eq!(data["is_truncated"], false);
        let objects = data["objects"].as_array().unwrap();
        assert_eq!(objects[0]["key"], "thumbnails/a.jpg");
        assert_eq!(objects[0]["content_type"], "image/jpeg");
        assert_eq!(objects[1]["key"], "videos/a.mp4");
        assert_eq!(objects[1]["size"], 4);
        assert_eq!(objects[1]["content_type"], "video/mp4");
        assert_eq!(objects[1]["url"], format!("{PUBLIC_BASE}/videos/a.mp4"));
    }

    #[tokio::test]
    async fn prefix_and_continuation_page_through_keys() {
        let app = TestApp::spawn().await;
        for name in ["a", "b", "c"] {
            app.store
                .insert(&format!("videos/{name}.mp4"), b"x", "video/mp4");
        }
        app.store.insert("thumbnails/a.jpg", b"x", "image/jpeg");
        let token = app.admin_token().await;

        let first = app
            .get_with_token(&objects_query("prefix=videos/&limit=2"), &token)
            .await;
        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.data()["total_count"], 2);
        assert_eq!(first.data()["is_truncated"], true);
        let next = first.data()["next_continuation_token"]
            .as_str()
            .expect("truncated page should carry a token")
            .to_string();

        let second = app
            .get_with_token(
                &objects_query(&format!("prefix=videos/&limit=2&continuation_token={next}")),
                &token,
            )
            .await;
        assert_eq!(second.data()["total_count"], 1);
        assert_eq!(second.data()["is_truncated"], false);
        assert_eq!(second.data()["objects"][0]["key"], "videos/c.mp4");
    }

    #[tokio::test]
    async fn listing_requires_admin() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::OBJECTS).await;

        res.assert_error(401, "TOKEN_MISSING");
    }
}

mod objects {
    use super::*;

    #[tokio::test]
    async fn upload_then_head_then_delete() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::OBJECTS,
                &json!({
                    "key": "feeds/test.json",
                    "content_type": "application/json",
                    "data": STANDARD.encode(br#"{"ok":true}"#),
                    "metadata": {"uploaded-by": "tests"},
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["key"], "feeds/test.json");
        assert_eq!(res.data()["size"], 11);
        assert_eq!(res.data()["location"], format!("{PUBLIC_BASE}/feeds/test.json"));

        let stored = app.store.get("feeds/test.json").expect("object stored");
        assert_eq!(stored.data, br#"{"ok":true}"#);
        assert_eq!(stored.metadata["uploaded-by"], "tests");

        let res = app
            .get_with_token(
                &format!("{}?key=feeds/test.json", routes::OBJECT_METADATA),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["content_type"], "application/json");
        assert_eq!(res.data()["content_length"], 11);
        assert_eq!(res.data()["metadata"]["uploaded-by"], "tests");

        let res = app
            .delete_with_token(&objects_query("key=feeds/test.json"), &token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["message"], "Successfully deleted feeds/test.json");
        assert!(app.store.get("feeds/test.json").is_none());

        let res = app
            .get_with_token(
                &format!("{}?key=feeds/test.json", routes::OBJECT_METADATA),
                &token,
            )
            .await;
        res.assert_error(404, "NOT_FOUND");
    }

    #[tokio::test]
    async fn upload_rejects_bad_requests() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::OBJECTS,
                &json!({"key": "", "content_type": "text/plain", "data": "aGk="}),
                &token,
            )
            .await;
        res.assert_error(400, "VALIDATION_ERROR");

        let res = app
            .post_with_token(
                routes::OBJECTS,
                &json!({"key": "a.txt", "content_type": "text/plain", "data": "not base64!"}),
                &token,
            )
            .await;
        res.assert_error(400, "VALIDATION_ERROR");

        let res = app
            .post_with_token(
                routes::OBJECTS,
                &json!({"key": "../escape.txt", "content_type": "text/plain", "data": "aGk="}),
                &token,
            )
            .await;
        res.assert_error(400, "VALIDATION_ERROR");

        assert!(app.store.keys().is_empty());
    }

    #[tokio::test]
    async fn upload_over_the_size_limit_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let too_big = vec![0u8; 1024 * 1024 + 1];

        let res = app
            .post_with_token(
                routes::OBJECTS,
                &json!({
                    "key": "videos/big.bin",
                    "content_type": "application/octet-stream",
                    "data": STANDARD.encode(&too_big),
                }),
                &token,
            )
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
        assert!(app.store.get("videos/big.bin").is_none());
    }

    #[tokio::test]
    async fn missing_key_parameter_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.delete_with_token(routes::OBJECTS, &token).await;
        res.assert_error(400, "VALIDATION_ERROR");
        assert_eq!(res.body["error"], "Missing key parameter");

        let res = app.get_with_token(routes::OBJECT_METADATA, &token).await;
        res.assert_error(400, "VALIDATION_ERROR");
    }
}

mod on_disk {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn uploaded_objects_are_served_at_their_location() {
        let objects = TempDir::new().unwrap();
        let app = TestApp::spawn_on_disk(objects.path()).await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::OBJECTS,
                &json!({
                    "key": "feeds/test.json",
                    "content_type": "application/json",
                    "data": STANDARD.encode(br#"{"ok":true}"#),
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        let location = res.data()["location"].as_str().unwrap().to_string();
        assert_eq!(location, format!("http://{}/media/feeds/test.json", app.addr));

        let served = app.client.get(&location).send().await.unwrap();
        assert_eq!(served.status(), 200);
        assert_eq!(served.headers()["content-type"], "application/json");
        assert_eq!(served.text().await.unwrap(), r#"{"ok":true}"#);

        let sidecar = app
            .client
            .get(format!("http://{}/media/.meta/feeds/test.json.json", app.addr))
            .send()
            .await
            .unwrap();
        assert_eq!(sidecar.status(), 404);
    }

    #[tokio::test]
    async fn published_feeds_can_be_fetched() {
        let objects = TempDir::new().unwrap();
        let app = TestApp::spawn_on_disk(objects.path()).await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(routes::ROKU_PUBLISH, &json!({}), &token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        let url = res.data()["published"][0]["url"].as_str().unwrap().to_string();

        let feed: serde_json::Value = app
            .client
            .get(&url)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(feed["providerName"], "Flat Earth Media Group");
    }
}

mod upload_url {
    use super::*;

    #[tokio::test]
    async fn presigns_a_sanitised_key() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::UPLOAD_URL,
                &json!({
                    "filename": "Episode 1 (Final).mp4",
                    "content_type": "video/mp4",
                    "file_size": 1024,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.data();
        let key = data["key"].as_str().unwrap();
        assert!(key.starts_with("videos/"), "{key}");
        assert!(key.ends_with("-episode-1-final-.mp4"), "{key}");
        assert_eq!(data["expires_in"], 900);
        assert_eq!(
            data["upload_url"],
            format!("https://uploads.test/{key}?expires=900")
        );
        assert_eq!(data["public_url"], format!("{PUBLIC_BASE}/{key}"));
    }

    #[tokio::test]
    async fn thumbnails_must_be_images() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::UPLOAD_URL,
                &json!({
                    "filename": "cover.mp4",
                    "content_type": "video/mp4",
                    "folder": "thumbnails",
                }),
                &token,
            )
            .await;
        res.assert_error(400, "VALIDATION_ERROR");

        let res = app
            .post_with_token(
                routes::UPLOAD_URL,
                &json!({
                    "filename": "cover.jpg",
                    "content_type": "image/jpeg",
                    "folder": "thumbnails",
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.data()["key"].as_str().unwrap().starts_with("thumbnails/"));
    }

    #[tokio::test]
    async fn missing_fields_and_bad_names_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::UPLOAD_URL,
                &json!({"filename": "", "content_type": "video/mp4"}),
                &token,
            )
            .await;
        res.assert_error(400, "VALIDATION_ERROR");

        let res = app
            .post_with_token(
                routes::UPLOAD_URL,
                &json!({"filename": "...", "content_type": "video/mp4"}),
                &token,
            )
            .await;
        res.assert_error(400, "VALIDATION_ERROR");
    }
}
