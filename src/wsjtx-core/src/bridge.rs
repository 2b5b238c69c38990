// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Operator-facing surface: PTT, manual transmit, automation control.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use wsjtx_protocol::{Decode, Status, WireMessage};

use crate::automation::{AutomationEngine, QsoAutomationState, Station};
use crate::client::WsjtxClient;
use crate::error::{BridgeError, StorageError, TransportError};
use crate::ptt::PttController;
use crate::qso::{QsoLogEntry, QsoLogStore};
use crate::transport::Transport;

/// Result of a manual transmit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransmitOutcome {
    pub ok: bool,
    /// PTT state after the transmit completed; always `false` on success.
    pub ptt_engaged: bool,
    pub logged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_error: Option<String>,
}

/// Owns every piece of mutable bridge state. Calls must be serialised by
/// the embedder (one `&mut` at a time).
pub struct Bridge {
    client: WsjtxClient,
    ptt: PttController,
    automation: AutomationEngine,
    log_store: Arc<dyn QsoLogStore>,
}

impl Bridge {
    pub fn new(
        transport: Arc<dyn Transport>,
        log_store: Arc<dyn QsoLogStore>,
        station: Station,
    ) -> Self {
        let client = WsjtxClient::new(transport);
        Self {
            ptt: PttController::new(client.clone()),
            automation: AutomationEngine::new(client.clone(), station),
            client,
            log_store,
        }
    }

    pub async fn engage_ptt(&mut self) -> Result<bool, TransportError> {
        self.ptt.engage().await?;
        Ok(self.ptt.is_engaged())
    }

    pub fn release_ptt(&mut self) -> bool {
        self.ptt.release();
        self.ptt.is_engaged()
    }

    pub fn is_ptt_engaged(&self) -> bool {
        self.ptt.is_engaged()
    }

    /// Key up, send `message`, optionally log the contact, then release.
    ///
    /// A failed send aborts with PTT still engaged. A failed log write is
    /// reported in the outcome and does not fail the transmit.
    pub async fn transmit(
        &mut self,
        message: &str,
        log_entry: Option<&QsoLogEntry>,
    ) -> Result<TransmitOutcome, BridgeError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(BridgeError::InvalidInput(
                "message must not be empty".to_string(),
            ));
        }

        self.ptt.engage().await?;
        self.client.send_reply(message).await?;
        info!("transmitted: {}", message);

        let (logged, log_error) = match log_entry {
            Some(entry) => match self.log_store.append(entry) {
                Ok(()) => (true, None),
                Err(e) => {
                    warn!("QSO with {} not logged: {}", entry.call_sign, e);
                    (false, Some(e.to_string()))
                }
            },
            None => (false, None),
        };

        self.ptt.release();
        Ok(TransmitOutcome {
            ok: true,
            ptt_engaged: self.ptt.is_engaged(),
            logged,
            log_error,
        })
    }

    pub fn enable_automation(&mut self) -> bool {
        self.automation.enable();
        self.automation.is_enabled()
    }

    pub fn disable_automation(&mut self) -> bool {
        self.automation.disable();
        self.automation.is_enabled()
    }

    pub fn is_automation_enabled(&self) -> bool {
        self.automation.is_enabled()
    }

    pub async fn process_one_event(&mut self) -> Result<Option<WireMessage>, TransportError> {
        self.automation.process_one_event().await
    }

    /// Up to `limit` most recent decodes, most recent last.
    pub fn recent_decodes(&self, limit: usize) -> Vec<Decode> {
        self.automation.recent_decodes(limit)
    }

    pub fn rig_status(&self) -> Option<&Status> {
        self.automation.last_status()
    }

    pub fn automation_state(&self) -> &QsoAutomationState {
        self.automation.state()
    }

    pub fn log_entries(&self) -> Result<Vec<QsoLogEntry>, StorageError> {
        self.log_store.entries()
    }
}
