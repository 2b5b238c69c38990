// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use wsjtx_protocol::Decode;

/// Number of decodes kept for the operator view.
pub const DECODE_HISTORY_CAPACITY: usize = 100;

/// Position in the contact exchange with the current DX station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStep {
    #[default]
    Idle = 0,
    /// Call + report + grid sent.
    FirstResponseSent = 1,
    /// RRR (or 73) sent.
    Acknowledged = 2,
    /// 73 sent; nothing more to say.
    FinalSent = 3,
}

impl ExchangeStep {
    /// The following step, saturating at `FinalSent`.
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::FirstResponseSent,
            Self::FirstResponseSent => Self::Acknowledged,
            Self::Acknowledged | Self::FinalSent => Self::FinalSent,
        }
    }
}

impl fmt::Display for ExchangeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::FirstResponseSent => write!(f, "FirstResponseSent"),
            Self::Acknowledged => write!(f, "Acknowledged"),
            Self::FinalSent => write!(f, "FinalSent"),
        }
    }
}

/// Bounded FIFO of recent decodes; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct DecodeHistory {
    entries: VecDeque<Decode>,
    capacity: usize,
}

impl Default for DecodeHistory {
    fn default() -> Self {
        Self::with_capacity(DECODE_HISTORY_CAPACITY)
    }
}

impl DecodeHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, decode: Decode) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(decode);
    }

    /// Up to `limit` newest entries, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<Decode> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decode> {
        self.entries.iter()
    }
}

/// Mutable state owned by the automation engine for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct QsoAutomationState {
    enabled: bool,
    step: ExchangeStep,
    current_dx_call: Option<String>,
    recent_decodes: DecodeHistory,
}

impl QsoAutomationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn step(&self) -> ExchangeStep {
        self.step
    }

    pub fn current_dx_call(&self) -> Option<&str> {
        self.current_dx_call.as_deref()
    }

    pub fn recent_decodes(&self) -> &DecodeHistory {
        &self.recent_decodes
    }

    /// Switch automation on or off. Either direction forgets the exchange.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.reset_exchange();
    }

    pub fn reset_exchange(&mut self) {
        self.step = ExchangeStep::Idle;
        self.current_dx_call = None;
    }

    /// Record a reply sent to `peer_call` and move one step forward.
    pub fn record_reply(&mut self, peer_call: String) {
        self.current_dx_call = Some(peer_call);
        self.step = self.step.next();
    }

    pub fn push_decode(&mut self, decode: Decode) {
        self.recent_decodes.push(decode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(n: u32) -> Decode {
        Decode {
            id: n,
            is_new: true,
            text: format!("CQ K{n}ABC FN42"),
            ..Decode::default()
        }
    }

    #[test]
    fn step_saturates_at_final() {
        let mut step = ExchangeStep::Idle;
        for _ in 0..6 {
            step = step.next();
        }
        assert_eq!(step, ExchangeStep::FinalSent);
    }

    #[test]
    fn history_evicts_oldest_beyond_capacity() {
        let mut history = DecodeHistory::default();
        for n in 0..105 {
            history.push(decode(n));
        }
        assert_eq!(history.len(), DECODE_HISTORY_CAPACITY);
        let ids: Vec<u32> = history.iter().map(|d| d.id).collect();
        assert_eq!(ids, (5..105).collect::<Vec<_>>());
    }

    #[test]
    fn recent_returns_newest_oldest_first() {
        let mut history = DecodeHistory::default();
        for n in 0..20 {
            history.push(decode(n));
        }
        let ids: Vec<u32> = history.recent(3).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![17, 18, 19]);
        assert_eq!(history.recent(500).len(), 20);
        assert!(history.recent(0).is_empty());
    }

    #[test]
    fn toggling_forgets_the_exchange() {
        let mut state = QsoAutomationState::new();
        state.set_enabled(true);
        state.record_reply("K1ABC".to_string());
        state.push_decode(decode(1));
        assert_eq!(state.step(), ExchangeStep::FirstResponseSent);

        state.set_enabled(false);
        assert_eq!(state.step(), ExchangeStep::Idle);
        assert_eq!(state.current_dx_call(), None);
        assert_eq!(state.recent_decodes().len(), 1);
    }
}
