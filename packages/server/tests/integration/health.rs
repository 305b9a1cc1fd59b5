use crate::common::{TestApp, routes};

#[tokio::test]
async fn health_reports_ok_with_a_parseable_timestamp() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"].as_str().unwrap(), "ok");

    let timestamp = res.body["timestamp"].as_str().unwrap();
    chrono::DateTime::parse_from_rfc3339(timestamp).expect("timestamp should be RFC 3339");
}
