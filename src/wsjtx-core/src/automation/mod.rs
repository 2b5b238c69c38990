// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Automatic contact exchange driven by inbound decodes.

pub mod engine;
pub mod responder;
pub mod state;

pub use engine::AutomationEngine;
pub use responder::{plan_reply, PlannedReply, Station};
pub use state::{DecodeHistory, ExchangeStep, QsoAutomationState, DECODE_HISTORY_CAPACITY};
