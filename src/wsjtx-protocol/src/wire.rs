// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Primitive field readers and writers for the datagram format.
//!
//! Integers are big-endian. Strings are a u32 byte length followed by the
//! UTF-8 bytes. The one exception is the f64 delta-time field of a decode,
//! which WSJT-X peers emit in native byte order.

/// Lenient cursor over an inbound datagram.
///
/// Reads past the end never fail: fixed-width fields come back as zero and
/// the cursor still advances, so a truncated datagram decodes into a record
/// with default trailing fields.
pub(crate) struct PacketReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    pub(crate) fn new(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let start = self.pos;
        let end = start.saturating_add(N);
        self.pos = end;
        self.buf.get(start..end)?.try_into().ok()
    }

    pub(crate) fn u8(&mut self) -> u8 {
        self.take::<1>().map(|b| b[0]).unwrap_or(0)
    }

    pub(crate) fn bool(&mut self) -> bool {
        self.u8() != 0
    }

    pub(crate) fn u32(&mut self) -> u32 {
        self.take::<4>().map(u32::from_be_bytes).unwrap_or(0)
    }

    /// Signed view of a u32 field (two's complement).
    pub(crate) fn i32(&mut self) -> i32 {
        self.take::<4>().map(i32::from_be_bytes).unwrap_or(0)
    }

    pub(crate) fn u64(&mut self) -> u64 {
        self.take::<8>().map(u64::from_be_bytes).unwrap_or(0)
    }

    pub(crate) fn f64_native(&mut self) -> f64 {
        self.take::<8>().map(f64::from_ne_bytes).unwrap_or(0.0)
    }

    /// Read a length-prefixed UTF-8 string.
    ///
    /// Fewer than four bytes left: empty string, cursor unchanged.
    /// Zero or overrunning length: empty string, cursor past the prefix only.
    pub(crate) fn utf8(&mut self) -> String {
        if self.remaining() < 4 {
            return String::new();
        }
        let len = self.u32() as usize;
        if len == 0 || len > self.remaining() {
            return String::new();
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        String::from_utf8_lossy(bytes).into_owned()
    }
}

pub(crate) fn push_u8(buf: &mut Vec<u8>, value: u8) {
    buf.push(value);
}

pub(crate) fn push_bool(buf: &mut Vec<u8>, value: bool) {
    buf.push(u8::from(value));
}

pub(crate) fn push_u32_be(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

pub(crate) fn push_i32_be(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

pub(crate) fn push_u64_be(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_be_bytes());
}

pub(crate) fn push_f64_native(buf: &mut Vec<u8>, value: f64) {
    buf.extend_from_slice(&value.to_ne_bytes());
}

/// Length prefix for a string payload, saturating at `u32::MAX`.
fn utf8_prefix_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Strings longer than `u32::MAX` bytes are truncated so the prefix always
/// matches the payload that follows it.
pub(crate) fn push_utf8(buf: &mut Vec<u8>, value: &str) {
    let bytes = value.as_bytes();
    let len = utf8_prefix_len(bytes.len());
    push_u32_be(buf, len);
    buf.extend_from_slice(&bytes[..len as usize]);
}
