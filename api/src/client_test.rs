use super::*;

fn client(base: &str) -> HmsClient {
    HmsClient::new(&ApiConfig::new(base).unwrap()).unwrap()
}

// =============================================================================
// PURE
// =============================================================================

#[test]
fn url_joins_base_and_path() {
    let client = client("https://hms.example/api/");
    assert_eq!(client.url(&routes::users()), "https://hms.example/api/user");
    assert_eq!(client.url(&routes::beds("h-1")), "https://hms.example/api/hospital/bed/getAll/h-1");
}

#[test]
fn request_carries_context_headers() {
    let client = client("https://hms.example");
    let ctx = RequestContext::new("tok").with_user("u-1").with_hospital("h-1");
    let request = client.request(&ctx, &routes::create_bed()).unwrap().build().unwrap();
    assert_eq!(request.method(), reqwest::Method::POST);
    assert_eq!(request.url().as_str(), "https://hms.example/hospital/bed");
    assert_eq!(request.headers()["Authorization"], "Bearer tok");
    assert_eq!(request.headers()["CurrentUserId"], "u-1");
    assert_eq!(request.headers()["HospitalIdentifier"], "h-1");
}

#[test]
fn scoped_request_without_hospital_fails() {
    let client = client("https://hms.example");
    let err = client.request(&RequestContext::new("tok"), &routes::create_admission()).unwrap_err();
    assert!(matches!(err, ApiError::MissingContext("hospital identifier")));
    assert!(client.request(&RequestContext::new("tok"), &routes::hospitals()).is_ok());
}

// =============================================================================
// ASYNC (no server needed)
// =============================================================================

#[tokio::test]
async fn beds_without_hospital_fails_before_io() {
    let client = client("http://127.0.0.1:9");
    let err = client.beds(&RequestContext::new("tok")).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingContext(_)));
}

#[tokio::test]
async fn blank_login_is_a_form_error() {
    let client = client("http://127.0.0.1:9");
    let err = client.login("", "pw").await.unwrap_err();
    assert!(matches!(&err, ApiError::Form(e) if e.get("username") == Some("Username is required")));
}

#[tokio::test]
async fn unreachable_server_is_retryable() {
    let config = ApiConfig::new("http://127.0.0.1:1").unwrap().with_timeouts(crate::config::Timeouts {
        request_secs: 2,
        connect_secs: 1,
    });
    let client = HmsClient::new(&config).unwrap();
    let err = client.users(&RequestContext::new("tok")).await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
    assert!(err.retryable());
}
