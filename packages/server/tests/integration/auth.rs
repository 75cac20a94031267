use serde_json::json;

use crate::common::{ADMIN_EMAIL, ADMIN_PASSWORD, TestApp, routes};

mod login {
    use super::*;

    #[tokio::test]
    async fn admin_can_log_in_with_configured_credentials() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.data();
        assert!(data["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(data["token_type"], "Bearer");
        assert_eq!(data["user"]["email"], ADMIN_EMAIL);
        assert_eq!(data["user"]["role"], "admin");
        assert!(data["expires_at"].is_string());
    }

    #[tokio::test]
    async fn email_match_is_case_insensitive() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "  ADMIN@FEChannel.com ", "password": ADMIN_PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": ADMIN_EMAIL, "password": "not-the-password"}),
            )
            .await;

        res.assert_error(401, "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_email_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "someone@example.com", "password": ADMIN_PASSWORD}),
            )
            .await;

        res.assert_error(401, "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn blank_fields_are_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"email": "", "password": "x"}))
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"email": ADMIN_EMAIL}))
            .await;

        res.assert_error(400, "VALIDATION_ERROR");
        let message = res.body["error"].as_str().unwrap();
        assert!(message.starts_with("Invalid request body"), "{message}");
        assert!(message.contains("password"), "{message}");
    }

    #[tokio::test]
    async fn non_json_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::LOGIN))
            .body("email=admin")
            .send()
            .await
            .unwrap();
        let res = crate::common::TestResponse::from_response(res).await;

        res.assert_error(400, "VALIDATION_ERROR");
        assert_eq!(res.body["error"], "Request body must be sent as application/json");
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn me_returns_the_signed_in_admin() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["email"], ADMIN_EMAIL);
        assert_eq!(res.data()["role"], "admin");
        assert!(res.data()["expires_at"].is_string());
    }

    #[tokio::test]
    async fn me_without_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        res.assert_error(401, "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not.a.jwt").await;

        res.assert_error(401, "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn token_from_another_secret_is_rejected() {
        let app = TestApp::spawn().await;
        let other = TestApp::spawn_with(|config| {
            config.auth.jwt_secret = "a-different-secret".into();
        })
        .await;
        let foreign = other.admin_token().await;

        let res = app.get_with_token(routes::ME, &foreign).await;

        res.assert_error(401, "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .client
            .get(format!("http://{}{}", app.addr, routes::ME))
            .header("Authorization", format!("Basic {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        assert_eq!(res.status().as_u16(), 401);
    }
}
