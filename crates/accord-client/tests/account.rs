//! Account update tests against a mock API server.

mod common;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use accord_client::SessionBuilder;
use accord_core::Error;
use accord_core::error::AuthError;

use common::{fake_gateway, mock_api_url, mount_login, ready_frame};

async fn user_session(
    server: &MockServer,
) -> (accord_client::Session, common::GatewayController) {
    mount_login(server, "tok-1").await;
    let (transport, controller) = fake_gateway();
    let session = SessionBuilder::user_account(mock_api_url(server))
        .identifier("alice@example.com")
        .secret("secret123")
        .shutdown_hook(false)
        .gateway_transport(transport)
        .build()
        .await
        .unwrap();

    // Populate the self profile so updates can resend current values.
    controller.send(ready_frame());
    session.wait_until_ready().await;
    (session, controller)
}

#[tokio::test]
async fn update_resends_current_values_and_rotates_the_token() {
    let server = MockServer::start().await;
    let (session, _controller) = user_session(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/users/@me"))
        .and(header("authorization", "tok-1"))
        .and(body_json(json!({
            "email": "alice@example.com",
            "password": "secret123",
            "username": "renamed"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-2"})))
        .mount(&server)
        .await;

    session
        .account_manager()
        .set_username("renamed")
        .update("secret123")
        .await
        .unwrap();

    assert_eq!(session.token().expose(), "tok-2");
    assert_eq!(session.self_profile().unwrap().username, "renamed");
}

#[tokio::test]
async fn update_with_a_wrong_password_is_rejected() {
    let server = MockServer::start().await;
    let (session, _controller) = user_session(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/users/@me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Password does not match"})),
        )
        .mount(&server)
        .await;

    let result = session
        .account_manager()
        .set_email("new@example.com")
        .update("wrong")
        .await;

    match result {
        Err(Error::Auth(AuthError::RejectedCredentials { status, .. })) => {
            assert_eq!(status, 401)
        }
        other => panic!("unexpected result: {other:?}"),
    }
    // The token and profile are untouched after a rejected update.
    assert_eq!(session.token().expose(), "tok-1");
    assert_eq!(
        session.self_profile().unwrap().email.as_deref(),
        Some("alice@example.com")
    );
}
