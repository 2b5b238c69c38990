// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Typed command/event channel to the upstream WSJT-X instance.

use std::sync::Arc;

use tracing::{debug, trace};

use wsjtx_protocol::{decode, OutgoingMessage, WireMessage};

use crate::error::TransportError;
use crate::transport::Transport;

/// Cheap-to-clone handle pairing a transport with the datagram codec.
#[derive(Clone)]
pub struct WsjtxClient {
    transport: Arc<dyn Transport>,
}

impl WsjtxClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn send(&self, message: &OutgoingMessage) -> Result<(), TransportError> {
        let packet = message.encode();
        trace!("sending {:?} ({} bytes)", message.message_type(), packet.len());
        self.transport.send(&packet).await
    }

    /// Ask WSJT-X to transmit `text`.
    pub async fn send_reply(&self, text: &str) -> Result<(), TransportError> {
        self.send(&OutgoingMessage::reply(text)).await
    }

    /// Stop the current transmission.
    pub async fn halt_tx(&self) -> Result<(), TransportError> {
        self.send(&OutgoingMessage::HaltTx).await
    }

    /// Pull at most one datagram and decode it.
    ///
    /// Unrecognised datagrams are dropped and reported as nothing pending.
    pub fn poll_message(&self) -> Result<Option<WireMessage>, TransportError> {
        let Some(packet) = self.transport.try_receive()? else {
            return Ok(None);
        };
        match decode(&packet) {
            Some(frame) => {
                trace!(
                    "received {:?} (schema {})",
                    frame.message.message_type(),
                    frame.schema
                );
                Ok(Some(frame.message))
            }
            None => {
                debug!("dropping unrecognised datagram ({} bytes)", packet.len());
                Ok(None)
            }
        }
    }
}
