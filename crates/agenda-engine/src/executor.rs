//! Command execution.
//!
//! The executor dispatches a parsed [`Intent`] against a snapshot of the
//! event list and produces a human-readable reply plus an optional
//! structured side effect. It is pure over its inputs: the caller applies
//! the side effect to its [`EventStore`] via [`CommandExecutor::apply`].
//!
//! Malformed input never errors here; every failure path is a guidance
//! string. The only hard failure is an unreachable store, surfaced by
//! `apply` as a [`StoreError`].

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use tracing::debug;

use agenda_core::{CalendarEvent, EventCategory, same_day, same_iso_week};

use crate::availability::{find_available_slots_default, find_conflict};
use crate::intent::{Intent, IntentKind, parse_intent};
use crate::store::{EventDraft, EventStore, StoreResult};

/// Cap on how many events a disambiguation listing names literally.
const DISAMBIGUATION_CAP: usize = 5;

/// Fixed fallback prompts for unclassifiable input.
const CHAT_PROMPTS: &[&str] = &[
    "I can create, list, delete and analyze events. What would you like to do?",
    "Try something like \"create a meeting at 14:00\" or \"view today\".",
    "Ask me about your schedule: \"when am I free?\" or \"view tomorrow\".",
    "I didn't catch that. You can say \"delete <event>\" or \"show statistics\".",
];

/// A structured side effect produced by the executor.
///
/// Side effects are data, not live store references; the caller commits
/// them with [`CommandExecutor::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// Create a new event from the given draft.
    CreateEvent(EventDraft),
    /// Delete the event with the given id. `title` is carried for logging
    /// and confirmation text only.
    DeleteEvent { id: String, title: String },
}

/// The executor's answer to one command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandReply {
    /// Human-readable response. Always non-empty.
    pub text: String,
    /// The structured side effect, when the command resolved to one.
    pub side_effect: Option<SideEffect>,
}

impl CommandReply {
    fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            side_effect: None,
        }
    }

    fn with_effect(text: impl Into<String>, effect: SideEffect) -> Self {
        Self {
            text: text.into(),
            side_effect: Some(effect),
        }
    }
}

/// Strategy for picking a chat fallback prompt.
///
/// Injected so the fallback stays testable; production callers may use
/// [`RandomSelector`], tests use the deterministic [`RoundRobinSelector`].
pub trait ResponseSelector: Send {
    /// Picks an index in `0..len`. `len` is always non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Deterministic selector cycling through prompts in order.
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    next: usize,
}

impl ResponseSelector for RoundRobinSelector {
    fn pick(&mut self, len: usize) -> usize {
        let idx = self.next % len;
        self.next = self.next.wrapping_add(1);
        idx
    }
}

/// Selector backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct RandomSelector;

impl ResponseSelector for RandomSelector {
    fn pick(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Dispatches free-text commands against an event snapshot.
pub struct CommandExecutor {
    selector: Box<dyn ResponseSelector>,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    /// Creates an executor with the deterministic round-robin chat
    /// selector.
    pub fn new() -> Self {
        Self {
            selector: Box::new(RoundRobinSelector::default()),
        }
    }

    /// Creates an executor with a custom chat selection strategy.
    pub fn with_selector(selector: Box<dyn ResponseSelector>) -> Self {
        Self { selector }
    }

    /// Processes one command against the given event snapshot.
    ///
    /// `now` anchors all relative dates (today/tomorrow/this week) and is
    /// injected for deterministic behavior.
    pub fn process(
        &mut self,
        text: &str,
        events: &[CalendarEvent],
        now: DateTime<Utc>,
    ) -> CommandReply {
        let intent = parse_intent(text);
        debug!(kind = ?intent.kind, "executing command");
        match intent.kind {
            IntentKind::Create => handle_create(&intent, events, now),
            IntentKind::Query => handle_query(&intent, events, now),
            IntentKind::FindTime => handle_find_time(events, now),
            IntentKind::Delete => handle_delete(&intent, events, now),
            IntentKind::Analyze => handle_analyze(events, now),
            IntentKind::Update => CommandReply::text_only(
                "To change an event, tell me which one and the new details, \
                 or use the edit form.",
            ),
            IntentKind::Chat => {
                let idx = self.selector.pick(CHAT_PROMPTS.len());
                CommandReply::text_only(CHAT_PROMPTS[idx])
            }
        }
    }

    /// Commits a side effect to the store.
    ///
    /// Returns the created event for `CreateEvent`, `None` for deletes.
    /// Store failures propagate unchanged.
    pub fn apply(
        effect: &SideEffect,
        store: &mut dyn EventStore,
    ) -> StoreResult<Option<CalendarEvent>> {
        match effect {
            SideEffect::CreateEvent(draft) => store.create(draft.clone()).map(Some),
            SideEffect::DeleteEvent { id, .. } => store.delete(id).map(|_| None),
        }
    }
}

fn handle_create(intent: &Intent, events: &[CalendarEvent], now: DateTime<Utc>) -> CommandReply {
    let Some(title) = intent.title.clone() else {
        return CommandReply::text_only(
            "I need a title to create an event. Try \"create <title> at 14:00\".",
        );
    };

    let today = now.date_naive();
    let (start, end) = if intent.all_day {
        let start = today.and_hms_opt(0, 0, 0).expect("valid time").and_utc();
        (start, start)
    } else {
        let Some(start_time) = intent.start_time else {
            return CommandReply::text_only(
                "I need a start time to create an event. Try \"create <title> at 14:00\".",
            );
        };
        let start = today.and_time(start_time).and_utc();
        let end = match intent.end_time {
            Some(end_time) if end_time > start_time => today.and_time(end_time).and_utc(),
            _ => start + Duration::hours(1),
        };
        (start, end)
    };

    let mut draft = EventDraft::new(&title, start, end)
        .with_all_day(intent.all_day)
        .with_category(intent.category.unwrap_or_default());
    if let Some(ref location) = intent.location {
        draft = draft.with_location(location.clone());
    }

    // The intent type is advisory; the conflict gate lives here.
    let window = draft.clone().into_event("candidate").effective_window();
    if let Some(conflict) = find_conflict(window.start, window.end, events) {
        return CommandReply::text_only(format!(
            "That clashes with \"{}\" ({}-{}). Nothing was created.",
            conflict.title,
            conflict.start.format("%H:%M"),
            conflict.end.format("%H:%M"),
        ));
    }

    let mut text = if intent.all_day {
        format!("Created \"{}\" on {} (all day", title, today)
    } else {
        format!(
            "Created \"{}\" on {} at {}-{} ({}",
            title,
            today,
            start.format("%H:%M"),
            end.format("%H:%M"),
            draft.category.display_name(),
        )
    };
    if let Some(ref location) = draft.location {
        text.push_str(&format!(", at {location}"));
    }
    text.push_str(").");

    CommandReply::with_effect(text, SideEffect::CreateEvent(draft))
}

fn handle_query(intent: &Intent, events: &[CalendarEvent], now: DateTime<Utc>) -> CommandReply {
    let matches: Vec<&CalendarEvent> = match relative_date(&intent.text, now) {
        Some(RelativeDate::Day(day)) => events.iter().filter(|e| same_day(e.start, day)).collect(),
        Some(RelativeDate::Week) => events
            .iter()
            .filter(|e| same_iso_week(e.start, now))
            .collect(),
        None => {
            let needle = query_needle(&intent.text);
            if needle.is_empty() {
                events.iter().collect()
            } else {
                events.iter().filter(|e| e.matches_text(&needle)).collect()
            }
        }
    };

    if matches.is_empty() {
        return CommandReply::text_only("Nothing scheduled.");
    }

    let mut lines = vec![format!("{} event(s):", matches.len())];
    for event in &matches {
        lines.push(describe_event(event));
    }
    CommandReply::text_only(lines.join("\n"))
}

fn handle_find_time(events: &[CalendarEvent], now: DateTime<Utc>) -> CommandReply {
    // This flow always anchors on today.
    let slots = find_available_slots_default(now.date_naive(), events);
    if slots.is_empty() {
        return CommandReply::text_only("No free slots left in today's working hours.");
    }
    let ranges: Vec<String> = slots.iter().map(|s| s.format_range()).collect();
    CommandReply::text_only(format!("Free today: {}.", ranges.join(", ")))
}

fn handle_delete(intent: &Intent, events: &[CalendarEvent], now: DateTime<Utc>) -> CommandReply {
    let lowered_query = intent.text.to_lowercase();

    // Resolution precedence: extracted title substring, then raw query
    // substring over title/description, then title-inside-query.
    let mut candidates: Vec<&CalendarEvent> = match intent.title {
        Some(ref title) => {
            let needle = title.to_lowercase();
            events
                .iter()
                .filter(|e| e.title.to_lowercase().contains(&needle))
                .collect()
        }
        None => Vec::new(),
    };
    if candidates.is_empty() {
        candidates = events
            .iter()
            .filter(|e| e.matches_text(&lowered_query))
            .collect();
    }
    if candidates.is_empty() {
        candidates = events
            .iter()
            .filter(|e| !e.title.is_empty() && lowered_query.contains(&e.title.to_lowercase()))
            .collect();
    }

    // A relative-date keyword in the command narrows the matches.
    match relative_date(&intent.text, now) {
        Some(RelativeDate::Day(day)) => candidates.retain(|e| same_day(e.start, day)),
        Some(RelativeDate::Week) => candidates.retain(|e| same_iso_week(e.start, now)),
        None => {}
    }

    match candidates.len() {
        0 => CommandReply::text_only("I couldn't find a matching event to delete."),
        1 => {
            let event = candidates[0];
            CommandReply::with_effect(
                format!("Deleted \"{}\".", event.title),
                SideEffect::DeleteEvent {
                    id: event.id.clone(),
                    title: event.title.clone(),
                },
            )
        }
        n => {
            let mut lines = vec![format!("{n} events match; which one did you mean?")];
            for event in candidates.iter().take(DISAMBIGUATION_CAP) {
                lines.push(describe_event(event));
            }
            if n > DISAMBIGUATION_CAP {
                lines.push(format!("...and {} more.", n - DISAMBIGUATION_CAP));
            }
            CommandReply::text_only(lines.join("\n"))
        }
    }
}

fn handle_analyze(events: &[CalendarEvent], now: DateTime<Utc>) -> CommandReply {
    let total = events.len();
    let count_of = |category: EventCategory| events.iter().filter(|e| e.category == category).count();

    let week_events: Vec<&CalendarEvent> = events
        .iter()
        .filter(|e| same_iso_week(e.start, now))
        .collect();
    let avg_hours = if week_events.is_empty() {
        0.0
    } else {
        let total_minutes: i64 = week_events.iter().map(|e| e.duration_minutes()).sum();
        total_minutes as f64 / 60.0 / week_events.len() as f64
    };
    let busy_level = (week_events.len() * 10).min(100);

    CommandReply::text_only(format!(
        "You have {total} event(s): {} work, {} meeting, {} personal.\n\
         This week: {} event(s), {:.1}h average duration, busy level {}%.",
        count_of(EventCategory::Work),
        count_of(EventCategory::Meeting),
        count_of(EventCategory::Personal),
        week_events.len(),
        avg_hours,
        busy_level,
    ))
}

enum RelativeDate {
    Day(NaiveDate),
    Week,
}

/// Maps relative-date keywords in the command onto a concrete filter.
fn relative_date(text: &str, now: DateTime<Utc>) -> Option<RelativeDate> {
    let lowered = text.to_lowercase();
    if lowered.contains("tomorrow") {
        return Some(RelativeDate::Day(now.date_naive() + Duration::days(1)));
    }
    if lowered.contains("today") {
        return Some(RelativeDate::Day(now.date_naive()));
    }
    if lowered.contains("this week") {
        return Some(RelativeDate::Week);
    }
    None
}

/// Strips query verbs and filler from a command, leaving a search needle.
fn query_needle(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| {
            !matches!(
                word.to_lowercase().trim_end_matches(['?', '!', '.']),
                "view" | "show" | "list" | "my" | "me" | "the" | "agenda" | "events" | "event"
                    | "what" | "whats" | "what's"
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn describe_event(event: &CalendarEvent) -> String {
    let mut line = if event.all_day {
        format!("- {} on {} (all day", event.title, event.start.date_naive())
    } else {
        format!(
            "- {} {} {}-{} ({}",
            event.title,
            event.start.date_naive(),
            event.start.format("%H:%M"),
            event.end.format("%H:%M"),
            event.category.display_name(),
        )
    };
    if let Some(ref location) = event.location {
        line.push_str(&format!(", at {location}"));
    }
    line.push(')');
    line
}
