//! Free-text command interpretation.
//!
//! This module turns a raw text command into a typed [`Intent`] with
//! extracted fields and a confidence score. Classification is an ordered
//! list of (predicate, constructor) rules evaluated top to bottom:
//! create > query > find_time > delete > analyze > chat. The order is a
//! deliberate precedence, since several keyword families can appear in one
//! sentence, and must be preserved for reproducible behavior.
//!
//! Extraction is deterministic pattern matching only; ambiguity is not an
//! error, it is a lower confidence and ultimately the `chat` fallback.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use agenda_core::EventCategory;

/// Placeholder title used when a create command carries no recognizable one.
pub const PLACEHOLDER_TITLE: &str = "New event";

/// Time-of-day pattern: `H:M` or `H：M` (full-width colon) with optional
/// trailing unit words.
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})[:：](\d{2})(?:\s*(?:h|hrs|hours|o'clock))?").expect("invalid time regex")
});

/// Title boundary pattern for creation commands: the text between the
/// creation verb and the next time/location/date marker.
static CREATE_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:create|add|schedule|book)\s+(?:an?\s+)?(?:event\s+)?(.+?)(?:\s+(?:at|on|in|from|for|today|tomorrow)\b|\s+\d{1,2}[:：]\d{2}|\s*$)",
    )
    .expect("invalid create title regex")
});

/// Title boundary pattern for deletion commands.
static DELETE_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:delete|cancel|remove|clear)\s+(?:the\s+)?(?:event\s+)?(.+?)(?:\s+(?:at|on|from|today|tomorrow)\b|\s+\d{1,2}[:：]\d{2}|\s*$)",
    )
    .expect("invalid delete title regex")
});

/// Location pattern: `at`/`in` followed by text up to the next marker.
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:at|in)\s+(?:the\s+)?([[:alpha:]][\w .,'-]*?)(?:\s+(?:at|on|from|until|today|tomorrow)\b|\s+\d{1,2}[:：]\d{2}|\s*$)",
    )
    .expect("invalid location regex")
});

const CREATE_KEYWORDS: &[&str] = &["create", "add", "schedule", "book"];
const QUERY_KEYWORDS: &[&str] = &["view", "show", "list", "agenda", "today", "tomorrow"];
const FIND_TIME_KEYWORDS: &[&str] = &["free", "available", "availability", "time"];
const DELETE_KEYWORDS: &[&str] = &["delete", "cancel", "remove", "clear"];
const ANALYZE_KEYWORDS: &[&str] = &["analyze", "analysis", "statistics", "stats", "report"];
const ALL_DAY_KEYWORDS: &[&str] = &["all day", "all-day", "whole day"];

/// The operation a command asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Create,
    Query,
    Update,
    Delete,
    FindTime,
    Analyze,
    Chat,
}

/// Structured interpretation of a free-text command.
///
/// Transient parse result; never persisted. All extracted slots are
/// optional except `kind`. `confidence` is in `[0, 1]` and is used only
/// for user-facing hedging text, never for branching thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// The classified operation.
    pub kind: IntentKind,
    /// Extraction certainty in `[0, 1]`.
    pub confidence: f32,
    /// The original command text, retained for downstream filtering.
    pub text: String,
    /// Extracted event title, if any.
    pub title: Option<String>,
    /// Extracted time of day for the event start.
    pub start_time: Option<NaiveTime>,
    /// Extracted explicit end time of day, if stated.
    pub end_time: Option<NaiveTime>,
    /// Extracted location.
    pub location: Option<String>,
    /// Category derived by keyword lookup.
    pub category: Option<EventCategory>,
    /// Whether explicit all-day keywords were present.
    pub all_day: bool,
}

impl Intent {
    fn bare(kind: IntentKind, confidence: f32, text: &str) -> Self {
        Self {
            kind,
            confidence,
            text: text.to_string(),
            title: None,
            start_time: None,
            end_time: None,
            location: None,
            category: None,
            all_day: false,
        }
    }
}

/// One classification rule: a keyword predicate over the lowercased text
/// and a constructor over the original text.
struct Rule {
    kind: IntentKind,
    matches: fn(&str) -> bool,
    build: fn(&str) -> Intent,
}

fn contains_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| contains_word(lowered, k))
}

/// Checks whether `keyword` occurs in `text` on word boundaries, so that
/// "view" does not match inside "review" or "add" inside "address".
/// Keywords may themselves span several words ("all day").
fn contains_word(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(idx, hit)| {
        let before = text[..idx].chars().next_back();
        let after = text[idx + hit.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

static RULES: &[Rule] = &[
    Rule {
        kind: IntentKind::Create,
        matches: |t| contains_any(t, CREATE_KEYWORDS),
        build: build_create,
    },
    Rule {
        kind: IntentKind::Query,
        matches: |t| contains_any(t, QUERY_KEYWORDS),
        build: |t| Intent::bare(IntentKind::Query, 0.8, t),
    },
    Rule {
        kind: IntentKind::FindTime,
        matches: |t| contains_any(t, FIND_TIME_KEYWORDS),
        build: |t| Intent::bare(IntentKind::FindTime, 0.7, t),
    },
    Rule {
        kind: IntentKind::Delete,
        matches: |t| contains_any(t, DELETE_KEYWORDS),
        build: build_delete,
    },
    Rule {
        kind: IntentKind::Analyze,
        matches: |t| contains_any(t, ANALYZE_KEYWORDS),
        build: |t| Intent::bare(IntentKind::Analyze, 0.6, t),
    },
];

/// Parses a free-text command into an [`Intent`].
///
/// Never fails: input that matches no rule yields a `Chat` intent with
/// confidence 0.5.
pub fn parse_intent(text: &str) -> Intent {
    let lowered = text.to_lowercase();
    for rule in RULES {
        if (rule.matches)(&lowered) {
            let intent = (rule.build)(text);
            debug!(kind = ?rule.kind, confidence = intent.confidence, "matched intent rule");
            return intent;
        }
    }
    debug!("no intent rule matched, falling back to chat");
    Intent::bare(IntentKind::Chat, 0.5, text)
}

fn build_create(text: &str) -> Intent {
    let lowered = text.to_lowercase();
    let (start_time, end_time) = extract_times(text);
    let mut intent = Intent::bare(IntentKind::Create, 0.9, text);
    intent.title = Some(
        extract_title(text, &CREATE_TITLE_RE).unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
    );
    intent.start_time = start_time;
    intent.end_time = end_time;
    intent.location = extract_location(text);
    intent.category = Some(lookup_category(&lowered));
    intent.all_day = contains_any(&lowered, ALL_DAY_KEYWORDS);
    intent
}

fn build_delete(text: &str) -> Intent {
    let mut intent = Intent::bare(IntentKind::Delete, 0.8, text);
    intent.title = extract_title(text, &DELETE_TITLE_RE);
    intent
}

/// Extracts a title between a command verb and the next marker.
///
/// Returns `None` when nothing usable remains after trimming marker words.
fn extract_title(text: &str, pattern: &Regex) -> Option<String> {
    let captured = pattern.captures(text)?.get(1)?.as_str();
    let trimmed = captured.trim().trim_end_matches(['.', ',', '!', '?']);
    let lowered = trimmed.to_lowercase();
    if trimmed.is_empty() || matches!(lowered.as_str(), "at" | "in" | "on" | "for" | "event") {
        return None;
    }
    Some(trimmed.to_string())
}

/// Extracts up to two times of day: the first match is the start, a second
/// match (if any) is an explicit end.
fn extract_times(text: &str) -> (Option<NaiveTime>, Option<NaiveTime>) {
    let mut times = TIME_RE.captures_iter(text).filter_map(|caps| {
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        NaiveTime::from_hms_opt(hour, minute, 0)
    });
    (times.next(), times.next())
}

fn extract_location(text: &str) -> Option<String> {
    let captured = LOCATION_RE.captures(text)?.get(1)?.as_str().trim();
    if captured.is_empty() {
        return None;
    }
    Some(captured.to_string())
}

/// Maps descriptive keywords onto the fixed category set. Work is the
/// default when nothing more specific appears.
fn lookup_category(lowered: &str) -> EventCategory {
    const TABLE: &[(&[&str], EventCategory)] = &[
        (
            &["meeting", "standup", "sync", "1:1", "call", "interview"],
            EventCategory::Meeting,
        ),
        (
            &["doctor", "dentist", "gym", "workout", "therapy"],
            EventCategory::Health,
        ),
        (
            &["flight", "trip", "travel", "hotel", "train"],
            EventCategory::Travel,
        ),
        (&["holiday", "vacation", "day off"], EventCategory::Holiday),
        (
            &["birthday", "party", "dinner", "lunch", "family"],
            EventCategory::Personal,
        ),
    ];
    for (keywords, category) in TABLE {
        if contains_any(lowered, keywords) {
            return *category;
        }
    }
    EventCategory::Work
}

#[cfg(test)]
mod tests {
    use super::*;

    mod classification {
        use super::*;

        #[test]
        fn create_command() {
            let intent = parse_intent("create a meeting at 14:00");
            assert_eq!(intent.kind, IntentKind::Create);
            assert_eq!(intent.confidence, 0.9);
        }

        #[test]
        fn query_command() {
            let intent = parse_intent("view today");
            assert_eq!(intent.kind, IntentKind::Query);
            assert_eq!(intent.confidence, 0.8);
            assert_eq!(intent.text, "view today");
        }

        #[test]
        fn find_time_command() {
            let intent = parse_intent("when am I free?");
            assert_eq!(intent.kind, IntentKind::FindTime);
            assert_eq!(intent.confidence, 0.7);
        }

        #[test]
        fn delete_command() {
            let intent = parse_intent("delete Review");
            assert_eq!(intent.kind, IntentKind::Delete);
            assert_eq!(intent.confidence, 0.8);
            assert_eq!(intent.title.as_deref(), Some("Review"));
        }

        #[test]
        fn analyze_command() {
            let intent = parse_intent("give me a report");
            assert_eq!(intent.kind, IntentKind::Analyze);
            assert_eq!(intent.confidence, 0.6);
        }

        #[test]
        fn chat_fallback() {
            let intent = parse_intent("hello there");
            assert_eq!(intent.kind, IntentKind::Chat);
            assert_eq!(intent.confidence, 0.5);
        }

        #[test]
        fn create_beats_query() {
            // "today" is a query keyword, but the create verb wins.
            let intent = parse_intent("add dentist appointment today");
            assert_eq!(intent.kind, IntentKind::Create);
        }

        #[test]
        fn query_beats_find_time() {
            // "free" is a find_time keyword, "today" is a query keyword.
            let intent = parse_intent("show free slots today");
            assert_eq!(intent.kind, IntentKind::Query);
        }

        #[test]
        fn find_time_beats_delete() {
            let intent = parse_intent("free up and cancel nothing");
            assert_eq!(intent.kind, IntentKind::FindTime);
        }

        #[test]
        fn delete_beats_analyze() {
            let intent = parse_intent("cancel the statistics review");
            assert_eq!(intent.kind, IntentKind::Delete);
        }

        #[test]
        fn keyword_inside_longer_word_does_not_match() {
            // "view" inside "Review" must not classify as a query.
            let intent = parse_intent("delete Review");
            assert_eq!(intent.kind, IntentKind::Delete);

            // "add" inside "address" must not classify as a create.
            let intent = parse_intent("remove the address book entry");
            assert_eq!(intent.kind, IntentKind::Delete);

            // "time" inside "sometimes" must not classify as find_time.
            let intent = parse_intent("sometimes I wonder");
            assert_eq!(intent.kind, IntentKind::Chat);
        }

        #[test]
        fn keywords_match_next_to_punctuation() {
            assert_eq!(parse_intent("am I free?").kind, IntentKind::FindTime);
            assert_eq!(parse_intent("view: today").kind, IntentKind::Query);
        }
    }

    mod extraction {
        use super::*;

        #[test]
        fn title_between_verb_and_time() {
            let intent = parse_intent("create a sync at 14:30");
            assert_eq!(intent.title.as_deref(), Some("sync"));
        }

        #[test]
        fn title_placeholder_when_unmatched() {
            let intent = parse_intent("create at 14:00");
            assert_eq!(intent.title.as_deref(), Some(PLACEHOLDER_TITLE));
        }

        #[test]
        fn start_time_ascii_colon() {
            let intent = parse_intent("schedule standup at 9:30");
            assert_eq!(intent.start_time, NaiveTime::from_hms_opt(9, 30, 0));
            assert_eq!(intent.end_time, None);
        }

        #[test]
        fn start_time_fullwidth_colon() {
            let intent = parse_intent("schedule standup at 14：00");
            assert_eq!(intent.start_time, NaiveTime::from_hms_opt(14, 0, 0));
        }

        #[test]
        fn explicit_end_time() {
            let intent = parse_intent("create workshop from 14:00 to 16:00");
            assert_eq!(intent.start_time, NaiveTime::from_hms_opt(14, 0, 0));
            assert_eq!(intent.end_time, NaiveTime::from_hms_opt(16, 0, 0));
        }

        #[test]
        fn invalid_clock_values_ignored() {
            let intent = parse_intent("create thing at 25:99");
            assert_eq!(intent.start_time, None);
        }

        #[test]
        fn location_after_in() {
            let intent = parse_intent("create a sync at 14:30 in Room 4");
            assert_eq!(intent.location.as_deref(), Some("Room 4"));
        }

        #[test]
        fn location_stops_at_marker() {
            let intent = parse_intent("add lunch at Cafe Rio tomorrow");
            assert_eq!(intent.location.as_deref(), Some("Cafe Rio"));
        }

        #[test]
        fn category_lookup() {
            assert_eq!(
                parse_intent("create a standup at 9:00").category,
                Some(EventCategory::Meeting)
            );
            assert_eq!(
                parse_intent("book dentist at 10:00").category,
                Some(EventCategory::Health)
            );
            assert_eq!(
                parse_intent("add flight at 6:00").category,
                Some(EventCategory::Travel)
            );
            // Nothing specific: defaults to work.
            assert_eq!(
                parse_intent("create deep focus at 8:00").category,
                Some(EventCategory::Work)
            );
        }

        #[test]
        fn all_day_flag() {
            assert!(parse_intent("create all day retreat").all_day);
            assert!(parse_intent("add an all-day offsite").all_day);
            assert!(!parse_intent("create a sync at 14:30").all_day);
        }
    }

    #[test]
    fn serde_roundtrip() {
        let intent = parse_intent("create a sync at 14:30 in Room 4");
        let json = serde_json::to_string(&intent).unwrap();
        let parsed: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(intent, parsed);
    }
}
