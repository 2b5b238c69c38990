// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Datagram encoding and decoding.
//!
//! Every datagram starts with the same 9-byte header:
//!
//! | offset | size | field          |
//! |--------|------|----------------|
//! | 0      | 4    | magic          |
//! | 4      | 4    | schema version |
//! | 8      | 1    | type tag       |
//!
//! followed by the u32 message id and the type-specific body. Decoding is
//! lenient: only a short header, a bad magic, an unsupported schema or an
//! unknown tag rejects the datagram.

use crate::types::{
    Close, Decode, Frame, Heartbeat, LoggedAdif, MessageType, OutgoingMessage, QsoLogged, Status,
    WireMessage, HEADER_LEN, MAGIC, MAX_SCHEMA_VERSION, MIN_SCHEMA_VERSION, SCHEMA_VERSION,
};
use crate::wire::{
    push_bool, push_f64_native, push_i32_be, push_u32_be, push_u64_be, push_u8, push_utf8,
    PacketReader,
};

/// Decode a datagram, or `None` when it is not a recognised message.
pub fn decode(packet: &[u8]) -> Option<Frame> {
    if packet.len() < HEADER_LEN {
        return None;
    }
    let mut header = PacketReader::new(packet, 0);
    if header.u32() != MAGIC {
        return None;
    }
    let schema = header.u32();
    if !(MIN_SCHEMA_VERSION..=MAX_SCHEMA_VERSION).contains(&schema) {
        return None;
    }
    let tag = header.u8();

    let mut r = PacketReader::new(packet, HEADER_LEN);
    let message = match MessageType::from_tag(tag)? {
        MessageType::Heartbeat => WireMessage::Heartbeat(read_heartbeat(&mut r)),
        MessageType::Status => WireMessage::Status(read_status(&mut r)),
        MessageType::Decode => WireMessage::Decode(read_decode(&mut r)),
        MessageType::QsoLogged => WireMessage::QsoLogged(read_qso_logged(&mut r)),
        MessageType::Close => WireMessage::Close(Close { id: r.u32() }),
        MessageType::LoggedAdif => WireMessage::LoggedAdif(LoggedAdif {
            id: r.u32(),
            adif_record: r.utf8(),
        }),
        // Outgoing-only commands are never accepted inbound.
        MessageType::Reply | MessageType::HaltTx => return None,
    };
    Some(Frame { schema, message })
}

/// Decode a datagram and drop the schema version.
pub fn decode_message(packet: &[u8]) -> Option<WireMessage> {
    decode(packet).map(|frame| frame.message)
}

fn read_heartbeat(r: &mut PacketReader<'_>) -> Heartbeat {
    Heartbeat {
        id: r.u32(),
        max_schema_version: r.u32(),
        version: r.utf8(),
        revision: r.utf8(),
    }
}

fn read_status(r: &mut PacketReader<'_>) -> Status {
    Status {
        id: r.u32(),
        dial_frequency_hz: r.u64(),
        mode: r.utf8(),
        dx_call: r.utf8(),
        report: r.utf8(),
        tx_mode: r.utf8(),
        tx_enabled: r.bool(),
        transmitting: r.bool(),
        decoding: r.bool(),
        rx_offset_hz: r.u32(),
        tx_offset_hz: r.u32(),
        de_call: r.utf8(),
        de_grid: r.utf8(),
        dx_grid: r.utf8(),
        tx_watchdog: r.bool(),
        sub_mode: r.utf8(),
        fast_mode: r.bool(),
        special_op_mode: r.u32(),
        freq_tolerance_hz: r.u32(),
        tr_period_sec: r.u32(),
        configuration_name: r.utf8(),
        tx_message: r.utf8(),
    }
}

fn read_decode(r: &mut PacketReader<'_>) -> Decode {
    Decode {
        id: r.u32(),
        is_new: r.bool(),
        epoch_millis: r.u64(),
        snr_db: r.i32(),
        delta_time_sec: r.f64_native(),
        delta_freq_hz: r.u32(),
        mode: r.utf8(),
        text: r.utf8(),
        low_confidence: r.bool(),
        off_air: r.bool(),
    }
}

fn read_qso_logged(r: &mut PacketReader<'_>) -> QsoLogged {
    QsoLogged {
        id: r.u32(),
        time_off: r.u64(),
        dx_call: r.utf8(),
        dx_grid: r.utf8(),
        tx_frequency_hz: r.u64(),
        mode: r.utf8(),
        report_sent: r.utf8(),
        report_received: r.utf8(),
        tx_power: r.utf8(),
        comments: r.utf8(),
        operator_name: r.utf8(),
        time_on: r.u64(),
        operator_call: r.utf8(),
        my_call: r.utf8(),
        my_grid: r.utf8(),
        exchange_sent: r.utf8(),
        exchange_received: r.utf8(),
    }
}

fn push_header(buf: &mut Vec<u8>, schema: u32, ty: MessageType, id: u32) {
    push_u32_be(buf, MAGIC);
    push_u32_be(buf, schema);
    push_u8(buf, ty.tag());
    push_u32_be(buf, id);
}

impl OutgoingMessage {
    /// Encode with schema 3 and message id 0; replies are never correlated.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        push_header(&mut out, SCHEMA_VERSION, self.message_type(), 0);
        match self {
            Self::Reply { text, low_priority } => {
                push_utf8(&mut out, text);
                push_bool(&mut out, *low_priority);
            }
            Self::HaltTx => {}
        }
        out
    }
}

/// Build a Reply datagram carrying `text`.
pub fn encode_reply(text: &str, low_priority: bool) -> Vec<u8> {
    OutgoingMessage::Reply {
        text: text.to_string(),
        low_priority,
    }
    .encode()
}

/// Build a Halt-Tx datagram.
pub fn encode_halt_tx() -> Vec<u8> {
    OutgoingMessage::HaltTx.encode()
}

impl WireMessage {
    /// Encode as the upstream application would emit it.
    pub fn encode(&self, schema: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(128);
        push_header(&mut out, schema, self.message_type(), self.id());
        match self {
            Self::Heartbeat(m) => {
                push_u32_be(&mut out, m.max_schema_version);
                push_utf8(&mut out, &m.version);
                push_utf8(&mut out, &m.revision);
            }
            Self::Status(m) => {
                push_u64_be(&mut out, m.dial_frequency_hz);
                push_utf8(&mut out, &m.mode);
                push_utf8(&mut out, &m.dx_call);
                push_utf8(&mut out, &m.report);
                push_utf8(&mut out, &m.tx_mode);
                push_bool(&mut out, m.tx_enabled);
                push_bool(&mut out, m.transmitting);
                push_bool(&mut out, m.decoding);
                push_u32_be(&mut out, m.rx_offset_hz);
                push_u32_be(&mut out, m.tx_offset_hz);
                push_utf8(&mut out, &m.de_call);
                push_utf8(&mut out, &m.de_grid);
                push_utf8(&mut out, &m.dx_grid);
                push_bool(&mut out, m.tx_watchdog);
                push_utf8(&mut out, &m.sub_mode);
                push_bool(&mut out, m.fast_mode);
                push_u32_be(&mut out, m.special_op_mode);
                push_u32_be(&mut out, m.freq_tolerance_hz);
                push_u32_be(&mut out, m.tr_period_sec);
                push_utf8(&mut out, &m.configuration_name);
                push_utf8(&mut out, &m.tx_message);
            }
            Self::Decode(m) => {
                push_bool(&mut out, m.is_new);
                push_u64_be(&mut out, m.epoch_millis);
                push_i32_be(&mut out, m.snr_db);
                push_f64_native(&mut out, m.delta_time_sec);
                push_u32_be(&mut out, m.delta_freq_hz);
                push_utf8(&mut out, &m.mode);
                push_utf8(&mut out, &m.text);
                push_bool(&mut out, m.low_confidence);
                push_bool(&mut out, m.off_air);
            }
            Self::QsoLogged(m) => {
                push_u64_be(&mut out, m.time_off);
                push_utf8(&mut out, &m.dx_call);
                push_utf8(&mut out, &m.dx_grid);
                push_u64_be(&mut out, m.tx_frequency_hz);
                push_utf8(&mut out, &m.mode);
                push_utf8(&mut out, &m.report_sent);
                push_utf8(&mut out, &m.report_received);
                push_utf8(&mut out, &m.tx_power);
                push_utf8(&mut out, &m.comments);
                push_utf8(&mut out, &m.operator_name);
                push_u64_be(&mut out, m.time_on);
                push_utf8(&mut out, &m.operator_call);
                push_utf8(&mut out, &m.my_call);
                push_utf8(&mut out, &m.my_grid);
                push_utf8(&mut out, &m.exchange_sent);
                push_utf8(&mut out, &m.exchange_received);
            }
            Self::Close(_) => {}
            Self::LoggedAdif(m) => push_utf8(&mut out, &m.adif_record),
        }
        out
    }
}
