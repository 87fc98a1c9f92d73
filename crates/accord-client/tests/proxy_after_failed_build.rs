//! Proxy settings stay changeable when no build ever produced a session.
//!
//! Kept in its own test binary: the frozen-proxy state is process-wide, so
//! this cannot share a process with tests that successfully build sessions.

mod common;

use async_trait::async_trait;

use accord_client::SessionBuilder;
use accord_core::error::TransportError;
use accord_core::traits::{ConnectOptions, GatewayConnection, GatewayTransport};
use accord_core::{Error, Result, SessionToken};

use common::{mock_api_url, mount_login};

struct UnreachableGateway;

#[async_trait]
impl GatewayTransport for UnreachableGateway {
    async fn connect(
        &self,
        _token: &SessionToken,
        _options: &ConnectOptions,
    ) -> Result<GatewayConnection> {
        Err(TransportError::Connection {
            message: "gateway unreachable".to_string(),
        }
        .into())
    }
}

#[tokio::test]
async fn failed_connect_leaves_proxy_settings_changeable() {
    let server = wiremock::MockServer::start().await;
    mount_login(&server, "tok-1").await;

    let err = SessionBuilder::new(mock_api_url(&server))
        .identifier("alice@example.com")
        .secret("secret123")
        .shutdown_hook(false)
        .gateway_transport(UnreachableGateway)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Connection { .. })
    ));

    // Authentication succeeded but no session exists, so the process-wide
    // proxy settings are still open.
    assert!(
        SessionBuilder::new(mock_api_url(&server))
            .proxy("proxy.example.com", 8080)
            .is_ok()
    );
}
