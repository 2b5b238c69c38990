// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! WSJT-X UDP datagram codec.
//!
//! Covers the subset of the protocol the bridge needs: heartbeat, status,
//! decode, QSO-logged, close and logged-ADIF inbound; reply and halt-tx
//! outbound.

pub mod codec;
pub mod types;
mod wire;

pub use codec::{decode, decode_message, encode_halt_tx, encode_reply};
pub use types::{
    Close, Decode, Frame, Heartbeat, LoggedAdif, MessageType, OutgoingMessage, QsoLogged, Status,
    WireMessage, MAGIC, MAX_DATAGRAM_SIZE, SCHEMA_VERSION,
};
