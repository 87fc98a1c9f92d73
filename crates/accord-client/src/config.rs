//! Process-wide network configuration.
//!
//! Proxy settings are shared by every session in the process and are
//! write-once: once set, or once any session has been created, they can
//! never change. The invariant lives behind an explicit guarded singleton,
//! never bare static state.

use std::sync::Mutex;

use accord_core::error::ConfigError;
use accord_core::Result;

/// HTTP proxy settings applied to all REST clients in the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub host: String,
    pub port: u16,
}

impl ProxySettings {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the proxy URL.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

struct GlobalConfig {
    proxy: Option<ProxySettings>,
    session_created: bool,
}

static GLOBAL: Mutex<GlobalConfig> = Mutex::new(GlobalConfig {
    proxy: None,
    session_created: false,
});

/// Fix the process-wide proxy settings.
///
/// # Errors
///
/// Returns [`ConfigError::ImmutableConfig`] if proxy settings were already
/// set, or if any session has ever been created in this process, no matter
/// which builder instance made either happen.
pub fn set_proxy(settings: ProxySettings) -> Result<()> {
    let mut global = lock();
    if global.proxy.is_some() || global.session_created {
        return Err(ConfigError::ImmutableConfig.into());
    }
    global.proxy = Some(settings);
    Ok(())
}

/// Returns the proxy settings, if fixed. Advisory read; the write-once
/// invariant has stabilized by the time any client is built.
pub fn proxy_settings() -> Option<ProxySettings> {
    lock().proxy.clone()
}

/// Record that a session has been created, freezing the proxy settings for
/// the remainder of the process.
pub(crate) fn mark_session_created() {
    lock().session_created = true;
}

fn lock() -> std::sync::MutexGuard<'static, GlobalConfig> {
    GLOBAL.lock().unwrap_or_else(|e| e.into_inner())
}
