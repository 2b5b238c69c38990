// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use tracing::{debug, info};

use wsjtx_protocol::{Decode, Status, WireMessage};

use super::responder::{plan_reply, Station};
use super::state::QsoAutomationState;
use crate::client::WsjtxClient;
use crate::error::TransportError;

/// Drives the contact exchange from inbound decodes.
///
/// Not reentrant: callers serialise `process_one_event` themselves.
pub struct AutomationEngine {
    client: WsjtxClient,
    station: Station,
    state: QsoAutomationState,
    last_status: Option<Status>,
}

impl AutomationEngine {
    pub fn new(client: WsjtxClient, station: Station) -> Self {
        Self {
            client,
            station,
            state: QsoAutomationState::new(),
            last_status: None,
        }
    }

    pub fn enable(&mut self) {
        self.state.set_enabled(true);
        info!("automation enabled as {}", self.station.callsign);
    }

    pub fn disable(&mut self) {
        self.state.set_enabled(false);
        info!("automation disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    pub fn state(&self) -> &QsoAutomationState {
        &self.state
    }

    /// Most recent Status seen while automation was running.
    pub fn last_status(&self) -> Option<&Status> {
        self.last_status.as_ref()
    }

    /// Up to `limit` newest decodes, oldest first.
    pub fn recent_decodes(&self, limit: usize) -> Vec<Decode> {
        self.state.recent_decodes().recent(limit)
    }

    /// Consume at most one pending datagram.
    ///
    /// Returns the decoded event, or `None` when automation is off, nothing
    /// is pending, or the datagram was not recognised.
    pub async fn process_one_event(&mut self) -> Result<Option<WireMessage>, TransportError> {
        if !self.state.is_enabled() {
            return Ok(None);
        }
        let Some(message) = self.client.poll_message()? else {
            return Ok(None);
        };

        match &message {
            WireMessage::Status(status) => {
                self.last_status = Some(status.clone());
            }
            WireMessage::QsoLogged(logged) => {
                info!("WSJT-X logged QSO with {}", logged.dx_call);
                self.state.reset_exchange();
            }
            WireMessage::Decode(decode) if decode.is_new => {
                self.state.push_decode(decode.clone());
                self.respond(&decode.text).await?;
            }
            _ => {}
        }
        Ok(Some(message))
    }

    async fn respond(&mut self, text: &str) -> Result<(), TransportError> {
        let Some(reply) = plan_reply(self.state.step(), &self.station, text) else {
            return Ok(());
        };
        self.client.send_reply(&reply.text).await?;

        let from = self.state.step();
        self.state.record_reply(reply.peer_call);
        info!("auto reply: {}", reply.text);
        debug!(
            "exchange {} -> {} (peer grid {})",
            from,
            self.state.step(),
            reply.peer_grid.as_deref().unwrap_or("-")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::automation::state::ExchangeStep;
    use crate::transport::mock::MockTransport;
    use wsjtx_protocol::{Heartbeat, QsoLogged};

    fn engine() -> (AutomationEngine, MockTransport) {
        let transport = MockTransport::new();
        let client = WsjtxClient::new(Arc::new(transport.clone()));
        let mut engine = AutomationEngine::new(client, Station::new("W1AW", "FN31"));
        engine.enable();
        (engine, transport)
    }

    fn decode(text: &str, is_new: bool) -> WireMessage {
        WireMessage::Decode(Decode {
            is_new,
            snr_db: -3,
            mode: "~".to_string(),
            text: text.to_string(),
            ..Decode::default()
        })
    }

    #[tokio::test]
    async fn disabled_engine_leaves_datagrams_pending() {
        let (mut engine, transport) = engine();
        engine.disable();
        transport.push_message(&decode("W1AW K1ABC +05 FN42", true));
        assert_eq!(engine.process_one_event().await.unwrap(), None);
        assert_eq!(transport.pending(), 1);
    }

    #[tokio::test]
    async fn nothing_pending_returns_none() {
        let (mut engine, _transport) = engine();
        assert_eq!(engine.process_one_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn full_exchange() {
        let (mut engine, transport) = engine();

        let first = decode("W1AW K1ABC +05 FN42", true);
        transport.push_message(&first);
        assert_eq!(engine.process_one_event().await.unwrap(), Some(first));
        assert_eq!(transport.sent_replies(), vec!["K1ABC W1AW +05 FN31"]);
        assert_eq!(engine.state().step(), ExchangeStep::FirstResponseSent);
        assert_eq!(engine.state().current_dx_call(), Some("K1ABC"));

        transport.push_message(&decode("K1ABC W1AW RRR", true));
        engine.process_one_event().await.unwrap();
        assert_eq!(transport.sent_replies().last().unwrap(), "K1ABC 73");
        assert_eq!(engine.state().step(), ExchangeStep::Acknowledged);

        transport.push_message(&decode("W1AW K1ABC 73", true));
        engine.process_one_event().await.unwrap();
        assert_eq!(transport.sent_replies().last().unwrap(), "K1ABC 73");
        assert_eq!(engine.state().step(), ExchangeStep::FinalSent);

        transport.push_message(&decode("W1AW K1ABC 73", true));
        engine.process_one_event().await.unwrap();
        assert_eq!(transport.sent_replies().len(), 3);
        assert_eq!(engine.state().step(), ExchangeStep::FinalSent);
        assert_eq!(engine.recent_decodes(100).len(), 4);
    }

    #[tokio::test]
    async fn replayed_decodes_are_returned_but_ignored() {
        let (mut engine, transport) = engine();
        let old = decode("W1AW K1ABC +05 FN42", false);
        transport.push_message(&old);
        assert_eq!(engine.process_one_event().await.unwrap(), Some(old));
        assert!(transport.sent().is_empty());
        assert!(engine.recent_decodes(10).is_empty());
        assert_eq!(engine.state().step(), ExchangeStep::Idle);
    }

    #[tokio::test]
    async fn decodes_for_others_are_recorded_without_reply() {
        let (mut engine, transport) = engine();
        transport.push_message(&decode("CQ K1ABC FN42", true));
        engine.process_one_event().await.unwrap();
        assert!(transport.sent().is_empty());
        assert_eq!(engine.recent_decodes(10).len(), 1);
    }

    #[tokio::test]
    async fn qso_logged_resets_exchange() {
        let (mut engine, transport) = engine();
        transport.push_message(&decode("W1AW K1ABC +05 FN42", true));
        engine.process_one_event().await.unwrap();
        assert_eq!(engine.state().step(), ExchangeStep::FirstResponseSent);

        let logged = WireMessage::QsoLogged(QsoLogged {
            dx_call: "K1ABC".to_string(),
            ..QsoLogged::default()
        });
        transport.push_message(&logged);
        assert_eq!(engine.process_one_event().await.unwrap(), Some(logged));
        assert_eq!(engine.state().step(), ExchangeStep::Idle);
        assert_eq!(engine.state().current_dx_call(), None);
    }

    #[tokio::test]
    async fn status_is_cached_and_returned() {
        let (mut engine, transport) = engine();
        let status = Status {
            dial_frequency_hz: 14_074_000,
            mode: "FT8".to_string(),
            ..Status::default()
        };
        transport.push_message(&WireMessage::Status(status.clone()));
        assert_eq!(
            engine.process_one_event().await.unwrap(),
            Some(WireMessage::Status(status.clone()))
        );
        assert_eq!(engine.last_status(), Some(&status));
        assert_eq!(engine.state().step(), ExchangeStep::Idle);
    }

    #[tokio::test]
    async fn other_events_pass_through() {
        let (mut engine, transport) = engine();
        let hb = WireMessage::Heartbeat(Heartbeat {
            max_schema_version: 3,
            version: "2.6.1".to_string(),
            ..Heartbeat::default()
        });
        transport.push_message(&hb);
        assert_eq!(engine.process_one_event().await.unwrap(), Some(hb));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_reply_does_not_advance() {
        let (mut engine, transport) = engine();
        transport.fail_sends(true);
        transport.push_message(&decode("W1AW K1ABC +05 FN42", true));
        assert!(engine.process_one_event().await.is_err());
        assert_eq!(engine.state().step(), ExchangeStep::Idle);
        assert_eq!(engine.state().current_dx_call(), None);
        assert_eq!(engine.recent_decodes(10).len(), 1);
    }

    #[tokio::test]
    async fn disable_and_enable_forget_the_peer() {
        let (mut engine, transport) = engine();
        transport.push_message(&decode("W1AW K1ABC +05 FN42", true));
        engine.process_one_event().await.unwrap();

        engine.disable();
        engine.enable();
        assert_eq!(engine.state().step(), ExchangeStep::Idle);
        assert_eq!(engine.state().current_dx_call(), None);

        transport.push_message(&decode("W1AW N0XYZ -11 EM10", true));
        engine.process_one_event().await.unwrap();
        assert_eq!(transport.sent_replies().last().unwrap(), "N0XYZ W1AW -11 FN31");
    }

    #[tokio::test]
    async fn history_is_bounded() {
        let (mut engine, transport) = engine();
        for n in 0..105u32 {
            transport.push_message(&WireMessage::Decode(Decode {
                id: n,
                is_new: true,
                text: "CQ K1ABC FN42".to_string(),
                ..Decode::default()
            }));
            engine.process_one_event().await.unwrap();
        }
        let ids: Vec<u32> = engine.recent_decodes(usize::MAX).iter().map(|d| d.id).collect();
        assert_eq!(ids, (5..105).collect::<Vec<_>>());
    }
}
