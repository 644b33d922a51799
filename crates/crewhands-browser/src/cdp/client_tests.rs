use super::*;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_connect_without_browser_is_unavailable() {
    let err = CdpClient::connect("http://127.0.0.1:1").await.err().unwrap();
    assert!(matches!(err, CdpError::ChromeNotAvailable(_)));
}

#[tokio::test]
async fn test_connect_rejects_bad_endpoint() {
    let err = CdpClient::connect("not a url").await.err().unwrap();
    assert!(matches!(err, CdpError::ConnectionFailed(_)));
}

#[tokio::test]
async fn test_connect_with_garbage_version_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not chrome</html>"))
        .mount(&server)
        .await;

    let err = CdpClient::connect(&server.uri()).await.err().unwrap();
    assert!(matches!(err, CdpError::ChromeNotAvailable(_)));
}

#[test]
fn test_request_id_increment() {
    let id = AtomicU64::new(1);
    assert_eq!(id.fetch_add(1, Ordering::SeqCst), 1);
    assert_eq!(id.fetch_add(1, Ordering::SeqCst), 2);
    assert_eq!(id.load(Ordering::SeqCst), 3);
}
