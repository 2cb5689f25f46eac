//! Tests for the HTTP profile fetcher against a mock server

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::services::http_fetcher::{validate_profile_url, HttpProfileFetcher};
use crate::traits::ProfileFetcher;
use shared::{CompanySizeBand, FetchError};

fn profile_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Lovelace",
        "headline": "Senior engineer with 12 years of experience",
        "current_position": "VP of Engineering",
        "current_company": "Analytical Engines Ltd",
        "location": "London, United Kingdom",
        "company_size": "51-200",
        "skills": ["Rust", "Leadership"],
        "connections": "500+"
    })
}

#[tokio::test]
async fn successful_fetch_maps_and_enriches_the_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profiles/ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;

    let fetcher = HttpProfileFetcher::new(None);
    let url = format!("{}/profiles/ada", server.uri());
    let profile = fetcher.fetch_profile(&url).await.unwrap();

    assert_eq!(profile.url, url);
    assert_eq!(profile.name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(profile.company_size, Some(CompanySizeBand::Medium));
    assert_eq!(profile.connections, Some(500));
    // Derived fields come from enrichment over the headline.
    assert_eq!(profile.experience_years, Some(12));
    assert_eq!(profile.industry.as_deref(), Some("Technology"));
}

#[tokio::test]
async fn bearer_token_is_attached_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profiles/ada"))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;

    let fetcher = HttpProfileFetcher::new(Some("token-123".to_string()));
    let url = format!("{}/profiles/ada", server.uri());
    assert!(fetcher.fetch_profile(&url).await.is_ok());
}

#[tokio::test]
async fn status_codes_map_onto_the_failure_taxonomy() {
    let cases = [
        (403, FetchError::AccessDenied),
        (404, FetchError::NotFound),
        (429, FetchError::RateLimited),
        (500, FetchError::ServerError("500 Internal Server Error".to_string())),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profiles/ada"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let fetcher = HttpProfileFetcher::new(None);
        let url = format!("{}/profiles/ada", server.uri());
        let error = fetcher.fetch_profile(&url).await.unwrap_err();
        assert_eq!(error, expected, "status {status}");
    }
}

#[tokio::test]
async fn malformed_urls_fail_without_a_request() {
    let fetcher = HttpProfileFetcher::new(None);

    let error = fetcher.fetch_profile("not a url").await.unwrap_err();
    assert!(matches!(error, FetchError::MalformedUrl(_)));

    let error = fetcher
        .fetch_profile("ftp://example.com/in/ada")
        .await
        .unwrap_err();
    assert!(matches!(error, FetchError::MalformedUrl(_)));

    // A bare host does not name a profile.
    let error = fetcher
        .fetch_profile("https://example.com/")
        .await
        .unwrap_err();
    assert!(matches!(error, FetchError::MalformedUrl(_)));
}

#[tokio::test]
async fn non_json_body_is_an_invalid_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profiles/ada"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let fetcher = HttpProfileFetcher::new(None);
    let url = format!("{}/profiles/ada", server.uri());
    let error = fetcher.fetch_profile(&url).await.unwrap_err();
    assert!(matches!(error, FetchError::InvalidPayload(_)));
}

#[tokio::test]
async fn implausible_names_are_rejected_as_invalid_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profiles/ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Ada"
        })))
        .mount(&server)
        .await;

    let fetcher = HttpProfileFetcher::new(None);
    let url = format!("{}/profiles/ada", server.uri());
    let error = fetcher.fetch_profile(&url).await.unwrap_err();
    assert!(matches!(error, FetchError::InvalidPayload(_)));
}

#[test]
fn url_validation_accepts_profile_urls() {
    assert!(validate_profile_url("https://example.com/in/ada").is_ok());
    assert!(validate_profile_url("http://127.0.0.1:8080/profiles/ada").is_ok());
    assert!(validate_profile_url("https://example.com").is_err());
    assert!(validate_profile_url("mailto:ada@example.com").is_err());
}
