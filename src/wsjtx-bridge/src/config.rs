// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for wsjtx-bridge.
//!
//! Config is loaded from the `[wsjtx-bridge]` section of `wsjtx-bridge.toml`.
//! Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./wsjtx-bridge.toml`
//! 3. `~/.config/wsjtx-bridge/wsjtx-bridge.toml`
//! 4. `/etc/wsjtx-bridge/wsjtx-bridge.toml`

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wsjtx_app::{parse_level, ConfigFile};
use wsjtx_core::automation::responder::is_grid;
pub use wsjtx_qso_log::QsoLogConfig;

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Station identity and logging
    pub general: GeneralConfig,
    /// Upstream WSJT-X UDP endpoints
    pub wsjtx: WsjtxConfig,
    /// JSON HTTP API
    pub http: HttpConfig,
    /// Background polling
    pub behavior: BehaviorConfig,
    /// QSO log file
    pub qso_log: QsoLogConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Own callsign; automation never answers when empty
    pub callsign: String,
    /// Own Maidenhead locator sent in the first reply
    pub grid: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

/// Where WSJT-X listens and where we listen for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WsjtxConfig {
    /// Host receiving reply / halt-tx datagrams
    pub host: String,
    /// Port receiving reply / halt-tx datagrams
    pub port: u16,
    /// Local address bound for inbound datagrams
    pub listen_host: IpAddr,
    /// Local port bound for inbound datagrams
    pub listen_port: u16,
    /// Upper bound for resolving and connecting the outbound socket
    pub connect_timeout_ms: u64,
}

impl Default for WsjtxConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2237,
            listen_host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            listen_port: 2237,
            connect_timeout_ms: 1000,
        }
    }
}

impl WsjtxConfig {
    pub fn peer_addr(&self) -> String {
        format!("{}:{}", self.host.trim(), self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// HTTP API listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whether the HTTP API is served
    pub enabled: bool,
    /// IP address to bind
    pub listen: IpAddr,
    /// Port to bind
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
        }
    }
}

/// Background event processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Poll period while automation is enabled; 0 disables the poll task
    pub poll_interval_ms: u64,
    /// Decodes reported by the automation status endpoint
    pub recent_decodes_limit: usize,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            recent_decodes_limit: 10,
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;

        let grid = self.general.grid.trim().to_ascii_uppercase();
        if !grid.is_empty() && !is_grid(&grid) {
            return Err(format!(
                "[general].grid '{}' is not a 4 or 6 character Maidenhead locator",
                grid
            ));
        }

        if self.wsjtx.host.trim().is_empty() {
            return Err("[wsjtx].host must not be empty".to_string());
        }
        if self.wsjtx.port == 0 {
            return Err("[wsjtx].port must be > 0".to_string());
        }
        if self.wsjtx.listen_port == 0 {
            return Err("[wsjtx].listen_port must be > 0".to_string());
        }
        if self.wsjtx.connect_timeout_ms == 0 {
            return Err("[wsjtx].connect_timeout_ms must be > 0".to_string());
        }

        if self.http.enabled && self.http.port == 0 {
            return Err("[http].port must be > 0 when the HTTP API is enabled".to_string());
        }

        if self.qso_log.file.trim().is_empty() {
            return Err("[qso_log].file must not be empty".to_string());
        }
        Ok(())
    }

    /// Generate an example configuration wrapped under the `[wsjtx-bridge]`
    /// section header.
    pub fn example_combined_toml() -> String {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(rename = "wsjtx-bridge")]
            inner: BridgeConfig,
        }
        let example = BridgeConfig {
            general: GeneralConfig {
                callsign: "N0CALL".to_string(),
                grid: "FN31".to_string(),
                log_level: Some("info".to_string()),
            },
            wsjtx: WsjtxConfig::default(),
            http: HttpConfig::default(),
            behavior: BehaviorConfig::default(),
            qso_log: QsoLogConfig::default(),
        };
        toml::to_string_pretty(&Wrapper { inner: example }).unwrap_or_default()
    }
}

/// Accepts exactly the names `init_logging` understands, in any case.
fn validate_log_level(level: Option<&str>) -> Result<(), String> {
    match level {
        Some(name) if parse_level(name).is_none() => Err(format!(
            "[general].log_level '{}' is invalid (expected one of: trace, debug, info, warn, error)",
            name
        )),
        _ => Ok(()),
    }
}

impl ConfigFile for BridgeConfig {
    fn section_key() -> &'static str {
        "wsjtx-bridge"
    }
}
