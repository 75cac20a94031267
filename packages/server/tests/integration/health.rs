use crate::common::{TestApp, routes};

#[tokio::test]
async fn health_reports_environment_without_auth() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    let data = res.data();
    assert_eq!(data["message"], "API is working correctly");
    assert!(data["timestamp"].is_string());
    assert_eq!(data["environment"]["storage_backend"], "memory");
    assert_eq!(data["environment"]["aws_configured"], false);
    assert!(data["environment"]["bucket"].is_string());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token("/api-docs/openapi.json").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["info"]["title"], "FEChannel API");
    assert!(res.body["paths"]["/api/v1/videos/{id}"].is_object());
    assert!(res.body["paths"]["/api/v1/roku/feeds/{channel}"].is_object());
}
