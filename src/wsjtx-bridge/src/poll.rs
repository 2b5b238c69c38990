// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Background drain of inbound datagrams while automation is enabled.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::api::SharedBridge;

/// Upper bound on events handled per tick so HTTP handlers get the lock.
const MAX_EVENTS_PER_TICK: usize = 64;

pub async fn run_poll_loop(
    bridge: SharedBridge,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!("poll loop running every {:?}", period);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
                continue;
            }
        }

        let mut bridge = bridge.lock().await;
        for _ in 0..MAX_EVENTS_PER_TICK {
            if !bridge.is_automation_enabled() {
                break;
            }
            match bridge.process_one_event().await {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => {
                    warn!("automation event failed: {}", e);
                    break;
                }
            }
        }
    }
    debug!("poll loop stopped");
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex as StdMutex};

    use tokio::sync::Mutex;

    use super::*;
    use wsjtx_core::{
        Bridge, QsoLogEntry, QsoLogStore, SendFuture, Station, StorageError, Transport,
        TransportError,
    };
    use wsjtx_protocol::{Decode, WireMessage};

    #[derive(Default)]
    struct QueueTransport {
        inbound: StdMutex<VecDeque<Vec<u8>>>,
        sent: StdMutex<usize>,
    }

    impl Transport for QueueTransport {
        fn send<'a>(&'a self, _packet: &'a [u8]) -> SendFuture<'a> {
            *self.sent.lock().unwrap() += 1;
            Box::pin(std::future::ready(Ok(())))
        }

        fn try_receive(&self) -> Result<Option<Vec<u8>>, TransportError> {
            Ok(self.inbound.lock().unwrap().pop_front())
        }
    }

    struct NoLog;

    impl QsoLogStore for NoLog {
        fn append(&self, _entry: &QsoLogEntry) -> Result<(), StorageError> {
            Ok(())
        }

        fn entries(&self) -> Result<Vec<QsoLogEntry>, StorageError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn drains_pending_decodes_and_stops_on_shutdown() {
        let transport = Arc::new(QueueTransport::default());
        for _ in 0..3 {
            let decode = WireMessage::Decode(Decode {
                is_new: true,
                text: "CQ K1ABC FN42".to_string(),
                ..Decode::default()
            });
            transport.inbound.lock().unwrap().push_back(decode.encode(3));
        }
        let mut bridge = Bridge::new(transport.clone(), Arc::new(NoLog), Station::new("W1AW", "FN31"));
        bridge.enable_automation();
        let bridge = Arc::new(Mutex::new(bridge));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_poll_loop(
            bridge.clone(),
            Duration::from_millis(5),
            shutdown_rx,
        ));

        for _ in 0..100 {
            if bridge.lock().await.recent_decodes(10).len() == 3 {
                break;
            }
            time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(bridge.lock().await.recent_decodes(10).len(), 3);
        assert_eq!(*transport.sent.lock().unwrap(), 0);

        shutdown_tx.send(true).unwrap();
        time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }
}
