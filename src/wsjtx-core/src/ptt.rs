// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Push-to-talk bookkeeping.
//!
//! WSJT-X has no PTT primitive over UDP (keying is done over CAT), so
//! engaging sends Halt-Tx as the closest safe action and releasing is purely
//! local. Callers must not expect `release` to put anything on the wire.

use tracing::debug;

use crate::client::WsjtxClient;
use crate::error::TransportError;

pub struct PttController {
    client: WsjtxClient,
    engaged: bool,
}

impl PttController {
    pub fn new(client: WsjtxClient) -> Self {
        Self {
            client,
            engaged: false,
        }
    }

    /// Send Halt-Tx, then mark PTT engaged. A failed send leaves the flag
    /// untouched.
    pub async fn engage(&mut self) -> Result<(), TransportError> {
        self.client.halt_tx().await?;
        self.engaged = true;
        debug!("PTT engaged");
        Ok(())
    }

    pub fn release(&mut self) {
        self.engaged = false;
        debug!("PTT released");
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::transport::mock::MockTransport;
    use wsjtx_protocol::encode_halt_tx;

    #[tokio::test]
    async fn engage_sends_halt_and_release_is_silent() {
        let transport = MockTransport::new();
        let mut ptt = PttController::new(WsjtxClient::new(Arc::new(transport.clone())));
        assert!(!ptt.is_engaged());

        ptt.engage().await.unwrap();
        assert!(ptt.is_engaged());
        assert_eq!(transport.sent(), vec![encode_halt_tx()]);

        ptt.release();
        assert!(!ptt.is_engaged());
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn failed_engage_stays_released() {
        let transport = MockTransport::new();
        transport.fail_sends(true);
        let mut ptt = PttController::new(WsjtxClient::new(Arc::new(transport)));
        assert!(ptt.engage().await.is_err());
        assert!(!ptt.is_engaged());
    }
}
