//! WebSocket gateway transport.
//!
//! Discovers the gateway URL from the REST API, opens the socket, and turns
//! inbound text messages into raw [`GatewayFrame`]s. Reconnect timing and
//! keepalive replies live entirely in this module; the session core only
//! consumes the resulting frame stream.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use accord_core::error::{DecodeError, TransportError};
use accord_core::traits::{ConnectOptions, ConnectionHandle, GatewayConnection, GatewayTransport};
use accord_core::{GatewayFrame, Result, SessionToken};

use crate::rest::endpoints::{self, GatewayResponse};
use crate::rest::ApiClient;

/// Delay between reconnect attempts when reconnection is enabled.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The default gateway transport.
pub struct WsTransport {
    api: ApiClient,
}

impl WsTransport {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

/// Discover the gateway URL and open the socket.
async fn open_socket(api: &ApiClient, token: &SessionToken) -> Result<WsStream> {
    let discovered: GatewayResponse = api.get(endpoints::GATEWAY, token).await?;
    let ws_url = to_ws_url(&discovered.url);
    info!(url = %ws_url, "Connecting to gateway");

    let (ws_stream, _) = connect_async(&ws_url)
        .await
        .map_err(|e| TransportError::Connection {
            message: e.to_string(),
        })?;

    debug!("WebSocket connected, listening for frames");
    Ok(ws_stream)
}

/// Convert an http(s) or bare gateway URL to its ws(s) form.
fn to_ws_url(url: &str) -> String {
    if url.starts_with("wss://") || url.starts_with("ws://") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        format!("wss://{}", url)
    }
}

fn parse_frame(text: &str) -> Result<GatewayFrame> {
    serde_json::from_str(text).map_err(|e| {
        DecodeError::Frame {
            message: e.to_string(),
        }
        .into()
    })
}

struct WsConnectionHandle {
    cancel: CancellationToken,
}

impl ConnectionHandle for WsConnectionHandle {
    fn close(&self) {
        self.cancel.cancel();
    }
}

#[async_trait]
impl GatewayTransport for WsTransport {
    async fn connect(
        &self,
        token: &SessionToken,
        options: &ConnectOptions,
    ) -> Result<GatewayConnection> {
        let ws_stream = open_socket(&self.api, token).await?;

        let cancel = CancellationToken::new();
        let handle = WsConnectionHandle {
            cancel: cancel.clone(),
        };

        let api = self.api.clone();
        let token = token.clone();
        let reconnect = options.reconnect;

        let stream = async_stream::stream! {
            let mut ws = ws_stream;
            loop {
                let (mut write, mut read) = ws.split();

                loop {
                    let msg = tokio::select! {
                        _ = cancel.cancelled() => {
                            info!("gateway connection closed by request");
                            return;
                        }
                        msg = read.next() => msg,
                    };
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            yield parse_frame(&text);
                        }
                        Some(Ok(Message::Ping(data))) => {
                            trace!("Received ping");
                            if let Err(e) = futures_util::SinkExt::send(&mut write, Message::Pong(data)).await {
                                warn!(error = %e, "Failed to send pong");
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            info!(?frame, "WebSocket closed by server");
                            break;
                        }
                        Some(Ok(Message::Binary(_))) => {
                            trace!("Ignoring binary message");
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            yield Err(TransportError::WebSocket {
                                message: e.to_string(),
                            }.into());
                            break;
                        }
                        None => break,
                    }
                }

                if !reconnect || cancel.is_cancelled() {
                    return;
                }
                info!(delay_secs = RECONNECT_DELAY.as_secs(), "Reconnecting to gateway");
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(RECONNECT_DELAY) => {}
                }
                match open_socket(&api, &token).await {
                    Ok(next) => ws = next,
                    Err(e) => {
                        error!(error = %e, "Reconnect failed");
                        yield Err(e);
                        return;
                    }
                }
            }
        };

        Ok(GatewayConnection::new(stream, handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_url_conversion() {
        assert_eq!(to_ws_url("https://gw.example.com"), "wss://gw.example.com");
        assert_eq!(to_ws_url("http://localhost:9001"), "ws://localhost:9001");
        assert_eq!(to_ws_url("wss://gw.example.com"), "wss://gw.example.com");
        assert_eq!(to_ws_url("gw.example.com"), "wss://gw.example.com");
    }

    #[test]
    fn frame_parsing() {
        let frame = parse_frame(r#"{"op":0,"t":"MESSAGE_CREATE","d":{"id":"1"}}"#).unwrap();
        assert!(frame.is_dispatch());
        assert_eq!(frame.event_type.as_deref(), Some("MESSAGE_CREATE"));

        assert!(parse_frame("not json").is_err());
    }
}
