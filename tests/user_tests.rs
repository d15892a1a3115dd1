mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use slackhook::auth::{AuthError, Token};
use slackhook::error::SlackError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::client_for;

async fn mount_auth_test(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/auth.test"))
        .and(header("authorization", "Bearer 12345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "url": "https://acme.slack.com/",
            "team": "Team Yellow",
            "user": "pete",
            "team_id": "T1234",
            "user_id": "U12345"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn authorized_user_wraps_auth_test() {
    let server = MockServer::start().await;
    mount_auth_test(&server).await;
    let slack = client_for(&server.uri()).with_token(Token::new("12345"));

    let user = slack.authorized_user().await.expect("authorized user");

    assert_eq!(user.id().as_deref(), Some("U12345"));
    assert_eq!(user.user().as_deref(), Some("pete"));
    assert_eq!(user.team().as_deref(), Some("Team Yellow"));
    assert_eq!(user.team_id().as_deref(), Some("T1234"));
    assert_eq!(user.url().as_deref(), Some("https://acme.slack.com/"));
}

#[tokio::test]
async fn authorized_user_requires_token() {
    let server = MockServer::start().await;
    let slack = client_for(&server.uri());

    assert!(matches!(
        slack.authorized_user().await,
        Err(SlackError::Unauthorized)
    ));
}

#[tokio::test]
async fn authorized_user_surfaces_invalid_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth.test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": "invalid_auth"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let slack = client_for(&server.uri()).with_token(Token::new("revoked"));

    let result = slack.authorized_user().await;

    assert!(matches!(
        result,
        Err(SlackError::Identity(AuthError::Provider { error })) if error == "invalid_auth"
    ));
}

#[tokio::test]
async fn resource_owner_looks_up_authorized_user() {
    let server = MockServer::start().await;
    mount_auth_test(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/users.info"))
        .and(query_param("user", "U12345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "user": {
                "id": "U12345",
                "name": "pete",
                "real_name": "Pete Heijn",
                "color": "9f69e7",
                "profile": {
                    "email": "pete@example.com",
                    "image_192": "https://avatars.slack-edge.com/192.png"
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let slack = client_for(&server.uri()).with_token(Token::new("12345"));

    let owner = slack.resource_owner().await.expect("resource owner");

    assert_eq!(owner.id().as_deref(), Some("U12345"));
    assert_eq!(owner.real_name().as_deref(), Some("Pete Heijn"));
    assert_eq!(owner.color().as_deref(), Some("9f69e7"));
    assert_eq!(owner.email().as_deref(), Some("pete@example.com"));
    assert_eq!(
        owner.avatar_url().as_deref(),
        Some("https://avatars.slack-edge.com/192.png")
    );
}
