// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Typed records for the WSJT-X UDP datagram protocol.

use serde::{Deserialize, Serialize};

/// Magic number opening every datagram (big-endian on the wire).
pub const MAGIC: u32 = 0xADBC_CBDA;
/// Schema version written on outgoing traffic.
pub const SCHEMA_VERSION: u32 = 3;
/// Lowest schema version accepted on inbound traffic.
pub const MIN_SCHEMA_VERSION: u32 = 2;
/// Highest schema version accepted on inbound traffic.
pub const MAX_SCHEMA_VERSION: u32 = 3;
/// Largest datagram the bridge expects to receive.
pub const MAX_DATAGRAM_SIZE: usize = 4096;
/// Length of magic + schema + type tag.
pub const HEADER_LEN: usize = 9;

/// One-byte message type tag at offset 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    Heartbeat = 0,
    Status = 1,
    Decode = 2,
    Reply = 3,
    HaltTx = 4,
    QsoLogged = 5,
    Close = 6,
    LoggedAdif = 10,
}

impl MessageType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Heartbeat),
            1 => Some(Self::Status),
            2 => Some(Self::Decode),
            3 => Some(Self::Reply),
            4 => Some(Self::HaltTx),
            5 => Some(Self::QsoLogged),
            6 => Some(Self::Close),
            10 => Some(Self::LoggedAdif),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// Presence ping and version negotiation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub id: u32,
    pub max_schema_version: u32,
    pub version: String,
    pub revision: String,
}

/// Snapshot of the application and rig state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: u32,
    pub dial_frequency_hz: u64,
    pub mode: String,
    pub dx_call: String,
    pub report: String,
    pub tx_mode: String,
    pub tx_enabled: bool,
    pub transmitting: bool,
    pub decoding: bool,
    pub rx_offset_hz: u32,
    pub tx_offset_hz: u32,
    pub de_call: String,
    pub de_grid: String,
    pub dx_grid: String,
    pub tx_watchdog: bool,
    pub sub_mode: String,
    pub fast_mode: bool,
    pub special_op_mode: u32,
    pub freq_tolerance_hz: u32,
    pub tr_period_sec: u32,
    pub configuration_name: String,
    pub tx_message: String,
}

/// One line of text demodulated from the air.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decode {
    pub id: u32,
    pub is_new: bool,
    pub epoch_millis: u64,
    /// Signed report; travels as the two's-complement bit pattern of a u32.
    pub snr_db: i32,
    pub delta_time_sec: f64,
    pub delta_freq_hz: u32,
    pub mode: String,
    pub text: String,
    pub low_confidence: bool,
    pub off_air: bool,
}

/// The upstream application logged a contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QsoLogged {
    pub id: u32,
    pub time_off: u64,
    pub dx_call: String,
    pub dx_grid: String,
    pub tx_frequency_hz: u64,
    pub mode: String,
    pub report_sent: String,
    pub report_received: String,
    pub tx_power: String,
    pub comments: String,
    pub operator_name: String,
    pub time_on: u64,
    pub operator_call: String,
    pub my_call: String,
    pub my_grid: String,
    pub exchange_sent: String,
    pub exchange_received: String,
}

/// The upstream application is shutting down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Close {
    pub id: u32,
}

/// ADIF record for a contact the upstream application just logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedAdif {
    pub id: u32,
    pub adif_record: String,
}

/// Any inbound message the bridge understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    Heartbeat(Heartbeat),
    Status(Status),
    Decode(Decode),
    QsoLogged(QsoLogged),
    Close(Close),
    LoggedAdif(LoggedAdif),
}

impl WireMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Heartbeat(_) => MessageType::Heartbeat,
            Self::Status(_) => MessageType::Status,
            Self::Decode(_) => MessageType::Decode,
            Self::QsoLogged(_) => MessageType::QsoLogged,
            Self::Close(_) => MessageType::Close,
            Self::LoggedAdif(_) => MessageType::LoggedAdif,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Self::Heartbeat(m) => m.id,
            Self::Status(m) => m.id,
            Self::Decode(m) => m.id,
            Self::QsoLogged(m) => m.id,
            Self::Close(m) => m.id,
            Self::LoggedAdif(m) => m.id,
        }
    }
}

/// A decoded datagram together with the schema version it arrived with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub schema: u32,
    #[serde(flatten)]
    pub message: WireMessage,
}

/// Commands the bridge sends to the upstream application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingMessage {
    /// Text to transmit, optionally at low priority.
    Reply { text: String, low_priority: bool },
    /// Stop the current transmission.
    HaltTx,
}

impl OutgoingMessage {
    pub fn reply(text: impl Into<String>) -> Self {
        Self::Reply {
            text: text.into(),
            low_priority: false,
        }
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Reply { .. } => MessageType::Reply,
            Self::HaltTx => MessageType::HaltTx,
        }
    }
}
