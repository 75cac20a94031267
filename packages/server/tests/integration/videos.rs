use serde_json::json;

use crate::common::{TestApp, routes};

fn ids(videos: &serde_json::Value) -> Vec<&str> {
    videos
        .as_array()
        .expect("expected an array of videos")
        .iter()
        .map(|v| v["id"].as_str().expect("video id"))
        .collect()
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn default_listing_is_newest_first() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::VIDEOS).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.data();
        assert_eq!(ids(&data["videos"]), vec!["5", "4", "3", "2", "1"]);
        assert_eq!(data["pagination"]["page"], 1);
        assert_eq!(data["pagination"]["per_page"], 20);
        assert_eq!(data["pagination"]["total"], 5);
        assert_eq!(data["pagination"]["total_pages"], 1);
    }

    #[tokio::test]
    async fn filters_by_category_and_featured() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!("{}?category=documentaries", routes::VIDEOS))
            .await;
        assert_eq!(ids(&res.data()["videos"]), vec!["2", "1"]);

        let res = app
            .get_without_token(&format!("{}?featured=true", routes::VIDEOS))
            .await;
        assert_eq!(ids(&res.data()["videos"]), vec!["3", "1"]);
    }

    #[tokio::test]
    async fn sorts_and_pages() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!(
                "{}?sort_by=view_count&sort_order=desc&page=2&per_page=2",
                routes::VIDEOS
            ))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.data();
        assert_eq!(ids(&data["videos"]), vec!["3", "4"]);
        assert_eq!(data["pagination"]["total"], 5);
        assert_eq!(data["pagination"]["total_pages"], 3);
    }

    #[tokio::test]
    async fn huge_page_number_returns_an_empty_page() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!("{}?page=18446744073709551615", routes::VIDEOS))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.data();
        assert!(data["videos"].as_array().unwrap().is_empty());
        assert_eq!(data["pagination"]["total"], 5);
    }

    #[tokio::test]
    async fn unknown_sort_field_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!("{}?sort_by=colour", routes::VIDEOS))
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn featured_endpoint_keeps_catalog_order() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::FEATURED).await;

        assert_eq!(res.status, 200);
        assert_eq!(ids(res.data()), vec!["1", "3"]);
    }
}

mod detail {
    use super::*;

    #[tokio::test]
    async fn video_detail_includes_formatting_and_category() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::video("1")).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.data();
        assert_eq!(data["id"], "1");
        assert_eq!(data["formatted_duration"], "45:00");
        assert_eq!(data["formatted_views"], "15.4K");
        assert_eq!(data["category"]["id"], "documentaries");
        assert!(data["estimated_quality"].is_string());
    }

    #[tokio::test]
    async fn missing_video_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::video("nope")).await;

        res.assert_error(404, "NOT_FOUND");
        assert_eq!(res.body["error"], "Video not found");
    }

    #[tokio::test]
    async fn related_videos_share_the_category() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::related("1")).await;
        assert_eq!(res.status, 200);
        assert_eq!(ids(res.data()), vec!["2"]);

        let res = app.get_without_token(&routes::related("4")).await;
        assert!(res.data().as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_videos_show_up_as_related() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app.create_video(&token, "Second Interview", "interviews").await;

        let res = app.get_without_token(&routes::related("4")).await;

        assert_eq!(ids(res.data()), vec![id.as_str()]);
    }

    #[tokio::test]
    async fn playback_plan_has_commercial_window() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::playback("1")).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.data();
        assert_eq!(data["video_id"], "1");
        assert_eq!(data["duration"], 2700);
        assert_eq!(data["commercials"].as_array().unwrap().len(), 2);
        assert_eq!(data["commercial_window"]["start"], 135.0);
        assert_eq!(data["commercial_window"]["end"], 270.0);
        assert_eq!(data["controls_hide_after_ms"], 3000);
    }
}

mod views {
    use super::*;

    #[tokio::test]
    async fn recording_a_view_increments_and_persists() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(&routes::views("5"), &json!({})).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["id"], "5");
        assert_eq!(res.data()["view_count"], 1341);

        let on_disk = app.videos_on_disk();
        let stored = on_disk["videos"]
            .as_array()
            .unwrap()
            .iter()
            .find(|v| v["id"] == "5")
            .unwrap();
        assert_eq!(stored["view_count"], 1341);
    }

    #[tokio::test]
    async fn view_on_missing_video_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(&routes::views("missing"), &json!({}))
            .await;

        res.assert_error(404, "NOT_FOUND");
    }
}

mod management {
    use super::*;

    fn draft() -> serde_json::Value {
        json!({
            "title": "  Horizon Test  ",
            "description": "Measuring the horizon over a lake.",
            "video_url": "https://cdn.example.com/videos/horizon-test.mp4",
            "category_id": "research",
            "duration": 720,
            "tags": ["horizon", "lake"],
            "featured": true,
        })
    }

    #[tokio::test]
    async fn create_requires_admin() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(routes::VIDEOS, &draft()).await;

        res.assert_error(401, "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn admin_can_create_a_video() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.post_with_token(routes::VIDEOS, &draft(), &token).await;

        assert_eq!(res.status, 201, "{}", res.text);
        let data = res.data();
        let id = data["id"].as_str().unwrap().to_string();
        assert_eq!(data["title"], "Horizon Test");
        assert_eq!(data["view_count"], 0);
        assert_eq!(
            data["thumbnail_url"],
            "https://cdn.example.com/videos/horizon-test.jpg"
        );

        let listed = app.get_without_token(routes::VIDEOS).await;
        assert_eq!(listed.data()["pagination"]["total"], 6);
        assert_eq!(ids(&listed.data()["videos"])[0], id);

        let on_disk = app.videos_on_disk();
        assert!(on_disk["videos"]
            .as_array()
            .unwrap()
            .iter()
            .any(|v| v["id"] == id.as_str()));
    }

    #[tokio::test]
    async fn create_rejects_invalid_drafts() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let mut no_title = draft();
        no_title["title"] = json!("   ");
        let res = app.post_with_token(routes::VIDEOS, &no_title, &token).await;
        res.assert_error(400, "VALIDATION_ERROR");
        assert_eq!(res.body["error"], "Title is required");

        let mut bad_url = draft();
        bad_url["video_url"] = json!("https://cdn.example.com/videos/horizon.txt");
        let res = app.post_with_token(routes::VIDEOS, &bad_url, &token).await;
        res.assert_error(400, "VALIDATION_ERROR");

        let mut zero = draft();
        zero["duration"] = json!(0);
        let res = app.post_with_token(routes::VIDEOS, &zero, &token).await;
        res.assert_error(400, "VALIDATION_ERROR");

        let listed = app.get_without_token(routes::VIDEOS).await;
        assert_eq!(listed.data()["pagination"]["total"], 5);
    }

    #[tokio::test]
    async fn category_id_is_not_checked_against_categories() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let mut cooking = draft();
        cooking["category_id"] = json!("cooking");
        let res = app.post_with_token(routes::VIDEOS, &cooking, &token).await;
        assert_eq!(res.status, 201, "{}", res.text);
        let id = res.id();

        let listed = app
            .get_without_token(&format!("{}?category=cooking", routes::VIDEOS))
            .await;
        assert_eq!(ids(&listed.data()["videos"]), vec![id.as_str()]);

        let detail = app.get_without_token(&routes::video(&id)).await;
        assert_eq!(detail.status, 200, "{}", detail.text);
        assert_eq!(detail.data()["category_id"], "cooking");
        assert!(detail.data()["category"].is_null());

        let res = app
            .patch_with_token(&routes::video("2"), &json!({"category_id": "travel"}), &token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["category_id"], "travel");
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .patch_with_token(
                &routes::video("2"),
                &json!({"featured": true, "tags": ["documentary"]}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.data();
        assert_eq!(data["featured"], true);
        assert_eq!(data["tags"], json!(["documentary"]));
        assert_eq!(data["title"], "Flat Earth Documentary Series - Episode 2");
        assert!(data["updated_at"].is_string());

        let featured = app.get_without_token(routes::FEATURED).await;
        assert_eq!(ids(featured.data()), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn update_rejects_empty_and_invalid_patches() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .patch_with_token(&routes::video("2"), &json!({}), &token)
            .await;
        res.assert_error(400, "VALIDATION_ERROR");

        let res = app
            .patch_with_token(&routes::video("2"), &json!({"duration": 0}), &token)
            .await;
        res.assert_error(400, "VALIDATION_ERROR");

        let res = app
            .patch_with_token(&routes::video("missing"), &json!({"featured": true}), &token)
            .await;
        res.assert_error(404, "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_removes_the_video() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.delete_with_token(&routes::video("4"), &token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["id"], "4");

        let res = app.get_without_token(&routes::video("4")).await;
        res.assert_error(404, "NOT_FOUND");

        let res = app.delete_with_token(&routes::video("4"), &token).await;
        res.assert_error(404, "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_requires_admin() {
        let app = TestApp::spawn().await;

        let res = app.delete_without_token(&routes::video("4")).await;

        res.assert_error(401, "TOKEN_MISSING");
        let still_there = app.get_without_token(&routes::video("4")).await;
        assert_eq!(still_there.status, 200);
    }
}

mod seo {
    use super::*;

    #[tokio::test]
    async fn generates_description_and_keywords() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::SEO,
                &json!({
                    "title": "Antarctic Ice Wall Expedition",
                    "description": "Footage from the southern ice wall.",
                    "category_id": "documentaries",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.data();
        let description = data["seo_description"].as_str().unwrap();
        assert!(description.starts_with("Footage from the southern ice wall."));
        assert!(description.contains("Antarctic Ice Wall Expedition"));
        let keywords = data["seo_keywords"].as_array().unwrap();
        assert!(!keywords.is_empty() && keywords.len() <= 10);
    }

    #[tokio::test]
    async fn requires_title_and_description() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(routes::SEO, &json!({"title": "Only a title", "description": ""}), &token)
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
    }
}
