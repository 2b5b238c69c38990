// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Reply heuristics for the contact exchange.
//!
//! This is pattern matching, not an FT8 message grammar. Any 3-15 character
//! upper-case alphanumeric word can be taken for a callsign, including mode
//! names and grid squares, and the generated replies depend on exactly that
//! behaviour.

use std::sync::OnceLock;

use regex::Regex;

use super::state::ExchangeStep;

/// Report used when the message carries none.
pub const DEFAULT_RST: &str = "+00";

/// Words that look like callsigns but never are.
const NON_CALL_TOKENS: [&str; 4] = ["CQ", "DE", "RRR", "73"];

fn call_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?-u:\b)[A-Z0-9]{3,15}(?-u:\b)").expect("callsign pattern"))
}

fn rst_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[+-]?[0-9]{2}").expect("report pattern"))
}

fn grid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?-u:\b)[A-R]{2}[0-9]{2}[A-X]{0,2}(?-u:\b)").expect("grid pattern")
    })
}

/// Own station identity used when composing replies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Station {
    pub callsign: String,
    pub grid: String,
}

impl Station {
    pub fn new(callsign: impl Into<String>, grid: impl Into<String>) -> Self {
        Self {
            callsign: callsign.into(),
            grid: grid.into(),
        }
    }
}

/// First callsign-shaped word in `message` other than the literal
/// non-call tokens and `own_call` (compared case-insensitively).
///
/// Word boundaries are ASCII, so a non-ASCII letter ends a word. A leading
/// literal such as `RRR` is skipped rather than ending the search.
pub fn extract_call(message: &str, own_call: &str) -> Option<String> {
    call_regex()
        .find_iter(message)
        .map(|m| m.as_str())
        .find(|token| {
            !NON_CALL_TOKENS.contains(token)
                && (own_call.is_empty() || !token.eq_ignore_ascii_case(own_call))
        })
        .map(str::to_string)
}

/// First signal-report-shaped run: optional sign and two digits.
///
/// There are no word boundaries, so the digits of a locator qualify too.
pub fn extract_rst(message: &str) -> Option<&str> {
    rst_regex().find(message).map(|m| m.as_str())
}

/// First Maidenhead-style locator (4-6 characters).
pub fn extract_grid(message: &str) -> Option<&str> {
    grid_regex().find(message).map(|m| m.as_str())
}

/// Whether `token` is a whole 4 or 6 character locator.
pub fn is_grid(token: &str) -> bool {
    matches!(token.len(), 4 | 6)
        && extract_grid(token).is_some_and(|grid| grid.len() == token.len())
}

/// Whether the message mentions our callsign at all. An empty own call
/// never matches.
pub fn is_addressed_to(message: &str, own_call: &str) -> bool {
    if own_call.is_empty() {
        return false;
    }
    contains_ignore_case(message, own_call)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_uppercase()
        .contains(&needle.to_ascii_uppercase())
}

/// A reply the engine should send, and who it is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedReply {
    pub peer_call: String,
    /// Locator found in the message; informational only.
    pub peer_grid: Option<String>,
    pub text: String,
}

/// Decide what to answer to `message` at `step`, if anything.
pub fn plan_reply(step: ExchangeStep, station: &Station, message: &str) -> Option<PlannedReply> {
    let peer_call = extract_call(message, &station.callsign)?;
    if !is_addressed_to(message, &station.callsign) {
        return None;
    }

    let text = match step {
        ExchangeStep::Idle => format!(
            "{} {} {} {}",
            peer_call,
            station.callsign,
            extract_rst(message).unwrap_or(DEFAULT_RST),
            station.grid
        ),
        ExchangeStep::FirstResponseSent => {
            if contains_ignore_case(message, "RRR") {
                format!("{peer_call} 73")
            } else {
                format!("{peer_call} RRR")
            }
        }
        ExchangeStep::Acknowledged => format!("{peer_call} 73"),
        ExchangeStep::FinalSent => return None,
    };

    Some(PlannedReply {
        peer_grid: extract_grid(message).map(str::to_string),
        peer_call,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w1aw() -> Station {
        Station::new("W1AW", "FN31")
    }

    #[test]
    fn extract_call_skips_own_call_and_literals() {
        assert_eq!(
            extract_call("W1AW K1ABC +05 FN42", "W1AW"),
            Some("K1ABC".to_string())
        );
        assert_eq!(
            extract_call("RRR K1ABC", "W1AW"),
            Some("K1ABC".to_string())
        );
        assert_eq!(extract_call("w1aw K1ABC", "W1AW"), Some("K1ABC".to_string()));
        assert_eq!(extract_call("CQ DE 73", "W1AW"), None);
        assert_eq!(extract_call("", "W1AW"), None);
    }

    #[test]
    fn extract_call_is_greedy_about_false_positives() {
        // grid squares and mode names qualify too
        assert_eq!(extract_call("CQ FN42", ""), Some("FN42".to_string()));
        assert_eq!(extract_call("FT8 K1ABC", ""), Some("FT8".to_string()));
        // lower case and over-long words do not
        assert_eq!(extract_call("cq k1abc", ""), None);
        assert_eq!(extract_call("ABCDEFGHIJKLMNOP", ""), None);
    }

    #[test]
    fn extract_rst_finds_first_report() {
        assert_eq!(extract_rst("W1AW K1ABC +05 FN42"), Some("+05"));
        assert_eq!(extract_rst("W1AW K1ABC R-12"), Some("-12"));
        assert_eq!(extract_rst("W1AW K1ABC 73"), Some("73"));
        assert_eq!(extract_rst("CQ K1ABC"), None);
    }

    #[test]
    fn grid_extraction() {
        assert_eq!(extract_grid("CQ K1ABC FN42"), Some("FN42"));
        assert_eq!(extract_grid("CQ SP2SJG JO93fx"), None);
        assert_eq!(extract_grid("CQ SP2SJG JO93FX"), Some("JO93FX"));
        assert_eq!(extract_grid("CQ K1ABC ZZ42"), None);
        assert!(is_grid("FN31"));
        assert!(is_grid("FN31PR"));
        assert!(!is_grid("FN3"));
        assert!(!is_grid("FN31P"));
        assert!(!is_grid("XX31"));
    }

    #[test]
    fn addressed_to_is_case_insensitive_substring() {
        assert!(is_addressed_to("K1ABC w1aw RRR", "W1AW"));
        assert!(is_addressed_to("K1ABC W1AWX RRR", "W1AW"));
        assert!(!is_addressed_to("CQ K1ABC FN42", "W1AW"));
        assert!(!is_addressed_to("CQ K1ABC FN42", ""));
    }

    #[test]
    fn idle_reply_uses_report_and_own_grid() {
        let reply = plan_reply(ExchangeStep::Idle, &w1aw(), "W1AW K1ABC +05 FN42").unwrap();
        assert_eq!(reply.text, "K1ABC W1AW +05 FN31");
        assert_eq!(reply.peer_call, "K1ABC");
        assert_eq!(reply.peer_grid.as_deref(), Some("FN42"));
    }

    #[test]
    fn idle_reply_defaults_report() {
        let reply = plan_reply(ExchangeStep::Idle, &w1aw(), "W1AW K1ABC").unwrap();
        assert_eq!(reply.text, "K1ABC W1AW +00 FN31");
        assert_eq!(reply.peer_grid, None);
    }

    #[test]
    fn locator_digits_pass_for_a_report() {
        assert_eq!(extract_rst("CQ K1ABC FN42"), Some("42"));
        let reply = plan_reply(ExchangeStep::Idle, &w1aw(), "W1AW K1ABC FN42").unwrap();
        assert_eq!(reply.text, "K1ABC W1AW 42 FN31");
    }

    #[test]
    fn word_boundaries_are_ascii() {
        assert_eq!(
            extract_call("K1ABC\u{e9} W1AW +05", "W1AW"),
            Some("K1ABC".to_string())
        );
        assert_eq!(extract_grid("K1ABC FN42\u{e9}"), Some("FN42"));
        assert_eq!(extract_grid("K1ABC \u{e9}FN42"), Some("FN42"));
    }

    #[test]
    fn second_step_acknowledges_or_closes() {
        let reply = plan_reply(ExchangeStep::FirstResponseSent, &w1aw(), "K1ABC W1AW RRR");
        assert_eq!(reply.unwrap().text, "K1ABC 73");
        let reply = plan_reply(ExchangeStep::FirstResponseSent, &w1aw(), "W1AW K1ABC R-10");
        assert_eq!(reply.unwrap().text, "K1ABC RRR");
    }

    #[test]
    fn later_steps() {
        let reply = plan_reply(ExchangeStep::Acknowledged, &w1aw(), "W1AW K1ABC RR73");
        assert_eq!(reply.unwrap().text, "K1ABC 73");
        assert_eq!(
            plan_reply(ExchangeStep::FinalSent, &w1aw(), "W1AW K1ABC 73"),
            None
        );
    }

    #[test]
    fn not_addressed_or_no_call_means_no_reply() {
        assert_eq!(plan_reply(ExchangeStep::Idle, &w1aw(), "CQ K1ABC FN42"), None);
        assert_eq!(plan_reply(ExchangeStep::Idle, &w1aw(), "W1AW"), None);
        let anonymous = Station::new("", "FN31");
        assert_eq!(
            plan_reply(ExchangeStep::Idle, &anonymous, "W1AW K1ABC +05 FN42"),
            None
        );
    }
}
