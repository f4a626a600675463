mod common;

use oauth2_client::grant::ResourceOwnerPasswordGrant;
use oauth2_client::OAuth2Error;
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::token_body;

const USERNAME: &str = "test_username";
const PASSWORD: &str = "test_password";

fn grant(server: &MockServer) -> ResourceOwnerPasswordGrant {
    ResourceOwnerPasswordGrant::new(format!("{}/token", server.uri()), USERNAME, PASSWORD)
}

#[tokio::test]
async fn fetch_token_sends_minimal_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string(
            "grant_type=password&username=test_username&password=test_password",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("at-1", Some("rt-1"))))
        .expect(1)
        .mount(&server)
        .await;

    let grant = grant(&server);
    let token = grant.fetch_token().await.expect("fetch token");

    assert_eq!(token.access_token, "at-1");
    assert_eq!(token.refresh_token.as_deref(), Some("rt-1"));
    assert_eq!(grant.token().await.unwrap().access_token, "at-1");
}

#[tokio::test]
async fn fetch_token_includes_optional_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string(
            "grant_type=password&username=test_username&password=test_password&client_id=test_client&scope=profile+email",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("at-1", Some("rt-1"))))
        .expect(1)
        .mount(&server)
        .await;

    let grant = grant(&server)
        .with_client_id("test_client")
        .with_scope("profile email");
    grant.fetch_token().await.expect("fetch token");
}

#[tokio::test]
async fn refresh_token_uses_stored_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string(
            "grant_type=password&username=test_username&password=test_password",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("at-1", Some("rt-1"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string("grant_type=refresh_token&refresh_token=rt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("at-2", Some("rt-2"))))
        .expect(1)
        .mount(&server)
        .await;

    let grant = grant(&server);
    grant.fetch_token().await.expect("fetch token");
    let refreshed = grant.refresh_token().await.expect("refresh token");

    assert_eq!(refreshed.access_token, "at-2");
    assert_eq!(refreshed.refresh_token.as_deref(), Some("rt-2"));
    assert_eq!(grant.token().await.unwrap().access_token, "at-2");
}

#[tokio::test]
async fn refresh_retains_old_refresh_token_when_not_rotated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string("grant_type=refresh_token&refresh_token=rt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("at-2", None)))
        .expect(1)
        .mount(&server)
        .await;

    let grant = grant(&server).with_token(common::expired_token_with_refresh("at-1", "rt-1"));
    let refreshed = grant.refresh_token().await.expect("refresh token");

    assert_eq!(refreshed.access_token, "at-2");
    assert_eq!(refreshed.refresh_token.as_deref(), Some("rt-1"));
}

#[tokio::test]
async fn refresh_without_refresh_token_is_an_authentication_error() {
    let server = MockServer::start().await;
    let grant = grant(&server).with_token(common::expired_token("at-1"));

    let err = grant.refresh_token().await.expect_err("must fail");
    assert!(matches!(err, OAuth2Error::Authentication(_)));
    assert!(err.requires_reauthentication());
}

#[tokio::test]
async fn rejected_refresh_is_an_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "refresh token revoked"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let grant = grant(&server).with_token(common::expired_token_with_refresh("at-1", "rt-1"));
    let err = grant.refresh_token().await.expect_err("must fail");

    match err {
        OAuth2Error::Authentication(message) => {
            assert!(message.contains("invalid_grant"));
            assert!(message.contains("refresh token revoked"));
        }
        other => panic!("expected Authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn ensure_valid_token_refreshes_expired_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string("grant_type=refresh_token&refresh_token=rt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("at-2", Some("rt-2"))))
        .expect(1)
        .mount(&server)
        .await;

    let grant = grant(&server).with_token(common::expired_token_with_refresh("at-1", "rt-1"));
    let token = grant.ensure_valid_token().await.expect("ensure valid");
    assert_eq!(token.access_token, "at-2");
}

#[tokio::test]
async fn ensure_valid_token_refetches_when_not_refreshable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string(
            "grant_type=password&username=test_username&password=test_password",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("at-2", None)))
        .expect(1)
        .mount(&server)
        .await;

    let grant = grant(&server).with_token(common::expired_token("at-1"));
    let token = grant.ensure_valid_token().await.expect("ensure valid");
    assert_eq!(token.access_token, "at-2");
}

#[tokio::test]
async fn ensure_valid_token_returns_stored_valid_token_without_network() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would 404 and fail the parse.
    let grant = grant(&server).with_token(oauth2_client::Token::new("at-1".to_string()));
    let token = grant.ensure_valid_token().await.expect("ensure valid");
    assert_eq!(token.access_token, "at-1");
}
