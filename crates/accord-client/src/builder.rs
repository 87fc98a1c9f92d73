//! Session construction.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use accord_core::error::ConfigError;
use accord_core::traits::ConnectOptions;
use accord_core::{
    ApiUrl, Credentials, Error, EventDecoder, EventListener, EventManager, FrameInterceptor,
    Result, SecondFactor, SessionToken,
};

use crate::auth::Authenticator;
use crate::config::{self, ProxySettings};
use crate::decode::StandardEventDecoder;
use crate::dispatch::{DirectEventManager, DispatchStrategy, SubscriptionEventManager};
use crate::gateway::WsTransport;
use crate::intercept::{InterceptorChain, SelfProfileInterceptor};
use crate::rest::ApiClient;
use crate::session::Session;

/// Builds a connected [`Session`].
///
/// Everything about a session is fixed at build time: credentials, dispatch
/// strategy, listeners, interceptors, transport. [`build`](Self::build)
/// authenticates, connects the gateway, and returns immediately;
/// [`build_and_wait`](Self::build_and_wait) additionally waits for the ready
/// event. One builder can build any number of independent sessions; each
/// gets a copy of the configuration as it stood at that build call.
///
/// # Example
///
/// ```no_run
/// use accord_client::SessionBuilder;
/// use accord_core::ApiUrl;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), accord_core::Error> {
/// let api = ApiUrl::new("https://chat.example.com/api")?;
/// let session = SessionBuilder::new(api)
///     .identifier("me@example.com")
///     .secret("hunter2")
///     .build_and_wait(Duration::from_secs(30))
///     .await?;
/// println!("ready: {}", session.is_ready());
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    api: ApiUrl,
    user_account: bool,
    identifier: Option<String>,
    secret: Option<String>,
    second_factor: Option<SecondFactor>,
    token: Option<SessionToken>,
    strategy: DispatchStrategy,
    manager: Option<Arc<dyn EventManager>>,
    listeners: Vec<Arc<dyn EventListener>>,
    interceptors: Vec<Arc<dyn FrameInterceptor>>,
    transport: Option<Arc<dyn accord_core::GatewayTransport>>,
    decoder: Option<Arc<dyn EventDecoder>>,
    reconnect: bool,
    split_bulk_deletes: bool,
    shutdown_hook: bool,
}

impl std::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("api", &self.api)
            .field("user_account", &self.user_account)
            .field("identifier", &self.identifier)
            .field("strategy", &self.strategy)
            .field("reconnect", &self.reconnect)
            .field("split_bulk_deletes", &self.split_bulk_deletes)
            .field("shutdown_hook", &self.shutdown_hook)
            .finish_non_exhaustive()
    }
}

impl SessionBuilder {
    /// Start building a session against the given API base URL.
    pub fn new(api: ApiUrl) -> Self {
        Self {
            api,
            user_account: false,
            identifier: None,
            secret: None,
            second_factor: None,
            token: None,
            strategy: DispatchStrategy::default(),
            manager: None,
            listeners: Vec::new(),
            interceptors: Vec::new(),
            transport: None,
            decoder: None,
            reconnect: true,
            split_bulk_deletes: true,
            shutdown_hook: true,
        }
    }

    /// Start building a user-account session.
    ///
    /// User-account sessions enrich the self profile from gateway frames and
    /// only authenticate with primary credentials, never a pre-issued token.
    pub fn user_account(api: ApiUrl) -> Self {
        Self {
            user_account: true,
            ..Self::new(api)
        }
    }

    /// The login identifier (email address).
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// The login secret (password).
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// A second-factor code for accounts protected by one.
    pub fn second_factor(mut self, code: impl Into<String>) -> Self {
        self.second_factor = Some(SecondFactor::new(code));
        self
    }

    /// Authenticate with a pre-issued token instead of credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedOperation`] on a user-account
    /// builder; that variant always authenticates with credentials.
    pub fn token(mut self, token: SessionToken) -> Result<Self> {
        if self.user_account {
            return Err(ConfigError::UnsupportedOperation {
                operation: "token login on a user-account session".to_string(),
            }
            .into());
        }
        self.token = Some(token);
        Ok(self)
    }

    /// Fix the process-wide proxy settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ImmutableConfig`] if proxy settings were set
    /// before, or any session already exists in this process.
    pub fn proxy(self, host: impl Into<String>, port: u16) -> Result<Self> {
        config::set_proxy(ProxySettings::new(host, port))?;
        Ok(self)
    }

    /// Choose how events are routed to listeners. Ignored when an explicit
    /// event manager is supplied.
    pub fn dispatch_strategy(mut self, strategy: DispatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Supply a custom event manager.
    pub fn event_manager(mut self, manager: Arc<dyn EventManager>) -> Self {
        self.manager = Some(manager);
        self
    }

    /// Register a listener before the session connects, so it misses no
    /// events.
    pub fn add_listener(mut self, listener: Arc<dyn EventListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Remove a pending listener registered with the same `Arc`.
    pub fn remove_listener(mut self, listener: &Arc<dyn EventListener>) -> Self {
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
        self
    }

    /// Append a frame interceptor. Runs in registration order.
    pub fn add_interceptor(mut self, interceptor: Arc<dyn FrameInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Whether the transport reconnects after an unexpected disconnect.
    /// Defaults to `true`.
    pub fn reconnect(mut self, reconnect: bool) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Whether bulk message deletions are split into one deletion event per
    /// message. Defaults to `true`.
    pub fn bulk_delete_splitting(mut self, enabled: bool) -> Self {
        self.split_bulk_deletes = enabled;
        self
    }

    /// Whether the session closes itself on Ctrl-C. Defaults to `true`.
    pub fn shutdown_hook(mut self, enabled: bool) -> Self {
        self.shutdown_hook = enabled;
        self
    }

    /// Supply a custom gateway transport.
    pub fn gateway_transport(mut self, transport: impl accord_core::GatewayTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Supply a custom event decoder.
    pub fn event_decoder(mut self, decoder: impl EventDecoder + 'static) -> Self {
        self.decoder = Some(Arc::new(decoder));
        self
    }

    /// Authenticate, connect the gateway, and return the session without
    /// waiting for it to become ready.
    ///
    /// The builder is left untouched and can build further, independent
    /// sessions; configuration changes made afterwards never affect sessions
    /// already built.
    pub async fn build(&self) -> Result<Session> {
        let credentials = self.resolve_credentials()?;

        let client = ApiClient::new(self.api.clone())?;
        let token = Authenticator::new(client.clone())
            .authenticate(&credentials)
            .await?;

        let manager: Arc<dyn EventManager> = match &self.manager {
            Some(manager) => manager.clone(),
            None => match self.strategy {
                DispatchStrategy::Direct => Arc::new(DirectEventManager::new()),
                DispatchStrategy::Subscription => Arc::new(SubscriptionEventManager::new()),
            },
        };
        for listener in &self.listeners {
            manager.register(listener.clone());
        }

        let mut chain = InterceptorChain::new();
        if self.user_account {
            chain.push(Arc::new(SelfProfileInterceptor));
        }
        for interceptor in &self.interceptors {
            chain.push(interceptor.clone());
        }

        let decoder: Arc<dyn EventDecoder> = match &self.decoder {
            Some(decoder) => decoder.clone(),
            None => Arc::new(StandardEventDecoder::new()),
        };
        let transport: Arc<dyn accord_core::GatewayTransport> = match &self.transport {
            Some(transport) => transport.clone(),
            None => Arc::new(WsTransport::new(client.clone())),
        };

        let session = Session::new(
            token,
            client,
            manager,
            chain,
            decoder,
            self.split_bulk_deletes,
        );
        session
            .connect(
                &*transport,
                &ConnectOptions {
                    reconnect: self.reconnect,
                },
            )
            .await?;

        // The session exists; from here on the process-wide proxy settings
        // are frozen. A failed build leaves them changeable.
        config::mark_session_created();

        if self.shutdown_hook {
            session.install_shutdown_hook();
        }

        info!("session connected");
        Ok(session)
    }

    /// Build the session and wait up to `timeout` for the ready event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the ready event does not arrive in
    /// time. The session itself stays connected; only the handle is
    /// discarded.
    pub async fn build_and_wait(&self, timeout: Duration) -> Result<Session> {
        let session = self.build().await?;
        match tokio::time::timeout(timeout, session.wait_until_ready()).await {
            Ok(()) => Ok(session),
            Err(_) => Err(Error::Timeout {
                duration_ms: timeout.as_millis() as u64,
            }),
        }
    }

    /// Like [`build_and_wait`](Self::build_and_wait), but the wait can also
    /// be abandoned through a cancellation token.
    pub async fn build_and_wait_cancellable(
        &self,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<Session> {
        let session = self.build().await?;
        tokio::select! {
            outcome = tokio::time::timeout(timeout, session.wait_until_ready()) => {
                match outcome {
                    Ok(()) => Ok(session),
                    Err(_) => Err(Error::Timeout {
                        duration_ms: timeout.as_millis() as u64,
                    }),
                }
            }
            _ = cancel.cancelled() => {
                debug!("wait for readiness cancelled");
                Err(Error::Cancelled)
            }
        }
    }

    fn resolve_credentials(&self) -> Result<Credentials> {
        if let Some(token) = &self.token {
            return Ok(Credentials::Token(token.clone()));
        }
        match (&self.identifier, &self.secret) {
            (Some(identifier), Some(secret)) => {
                let credentials = Credentials::password(identifier, secret);
                Ok(match &self.second_factor {
                    Some(code) => credentials.with_second_factor(code.clone()),
                    None => credentials,
                })
            }
            _ => Err(ConfigError::MissingCredentials {
                message: "supply an identifier and secret, or a pre-issued token".to_string(),
            }
            .into()),
        }
    }
}
