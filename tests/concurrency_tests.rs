mod common;

use std::sync::Arc;

use oauth2_client::grant::ClientCredentialsGrant;
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{expired_token_with_refresh, token_body};

fn grant(server: &MockServer) -> ClientCredentialsGrant {
    ClientCredentialsGrant::new(format!("{}/token", server.uri()), "test_client", "test_secret")
}

#[tokio::test]
async fn concurrent_callers_trigger_exactly_one_refresh() {
    let server = MockServer::start().await;
    // A 50ms delay widens the race window: every caller observes the
    // expired token before the first exchange completes.
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=rt-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("at-2", Some("rt-2")))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let grant = Arc::new(grant(&server).with_token(expired_token_with_refresh("at-1", "rt-1")));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let grant = grant.clone();
        handles.push(tokio::spawn(
            async move { grant.ensure_valid_token().await },
        ));
    }

    for handle in handles {
        let token = handle.await.expect("task").expect("ensure valid");
        assert_eq!(token.access_token, "at-2");
    }
}

#[tokio::test]
async fn concurrent_callers_trigger_exactly_one_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("at-1", None))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let grant = Arc::new(grant(&server));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let grant = grant.clone();
        handles.push(tokio::spawn(
            async move { grant.ensure_valid_token().await },
        ));
    }

    for handle in handles {
        let token = handle.await.expect("task").expect("ensure valid");
        assert_eq!(token.access_token, "at-1");
    }
}

#[tokio::test]
async fn sequential_callers_reuse_the_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("at-1", None)))
        .expect(1)
        .mount(&server)
        .await;

    let grant = grant(&server);
    for _ in 0..5 {
        let token = grant.ensure_valid_token().await.expect("ensure valid");
        assert_eq!(token.access_token, "at-1");
    }
}
