//! Bounded event log and objective journal.
//!
//! Both are presentation-owned auxiliary state: they ride along in the save
//! blob but are not part of [`GameState`](ash_core::GameState), and unlike
//! the decision trace the event log is bounded and lossy by design.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use ash_core::Scene;

/// Maximum entries the event log retains.
pub const EVENT_LOG_CAP: usize = 20;

/// Number of headline characters taken from a scene's first paragraph.
const HEADLINE_LEN: usize = 40;

/// Category of an event-log entry, used for display styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Direct fallout of a player choice.
    Consequence,
    /// Something that happened in the world around the player.
    WorldEvent,
    /// Information the player uncovered.
    Discovery,
}

/// One line in the recent-events feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    /// Display text.
    pub text: String,
    /// Display category.
    pub kind: EventKind,
    /// In-game hour the event happened at.
    pub time: u64,
}

/// A bounded recent-events feed, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    entries: VecDeque<EventEntry>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event to the front, dropping the oldest past the cap.
    pub fn push(&mut self, text: impl Into<String>, kind: EventKind, time: u64) {
        self.entries.push_front(EventEntry {
            text: text.into(),
            kind,
            time,
        });
        self.entries.truncate(EVENT_LOG_CAP);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &EventEntry> {
        self.entries.iter()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the contents wholesale (used by load/import).
    pub fn replace(&mut self, entries: Vec<EventEntry>) {
        self.entries = entries.into_iter().take(EVENT_LOG_CAP).collect();
    }

    /// Clone the contents out (used by save/export).
    pub fn to_vec(&self) -> Vec<EventEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// One objective record in the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Short summary line, unique within the journal.
    pub headline: String,
    /// Objective note, possibly empty.
    pub note: String,
}

/// An unbounded objectives list, deduplicated by headline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visited scene. Setpiece scenes are labeled as such; the
    /// headline is the first 40 characters of the scene's opening
    /// paragraph, and a headline already present is not recorded again.
    pub fn record_scene(&mut self, scene: &Scene) {
        let kind = if scene.is_setpiece() {
            "Set Piece"
        } else {
            "Scene"
        };
        let teaser: String = scene.text.first().chars().take(HEADLINE_LEN).collect();
        let headline = format!("{kind}: {teaser}…");
        if self.entries.iter().any(|e| e.headline == headline) {
            return;
        }
        self.entries.push(JournalEntry {
            headline,
            note: scene.notes.clone().unwrap_or_default(),
        });
    }

    /// Entries in recording order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Number of objectives.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the contents wholesale (used by load/import).
    pub fn replace(&mut self, entries: Vec<JournalEntry>) {
        self.entries = entries;
    }

    /// Clone the contents out (used by save/export).
    pub fn to_vec(&self) -> Vec<JournalEntry> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash_core::SceneText;

    #[test]
    fn event_log_newest_first_and_capped() {
        let mut log = EventLog::new();
        for i in 0..25 {
            log.push(format!("event {i}"), EventKind::WorldEvent, i);
        }
        assert_eq!(log.len(), EVENT_LOG_CAP);
        assert_eq!(log.entries().next().unwrap().text, "event 24");
        // Oldest entries fell off.
        assert!(log.entries().all(|e| e.time >= 5));
    }

    #[test]
    fn journal_dedupes_by_headline() {
        let scene = Scene {
            id: "hub".into(),
            text: SceneText::One("Your building is a maze of locked doors.".into()),
            notes: Some("Map the stairwells.".into()),
            ..Default::default()
        };
        let mut journal = Journal::new();
        journal.record_scene(&scene);
        journal.record_scene(&scene);
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.entries()[0].note, "Map the stairwells.");
    }

    #[test]
    fn setpiece_headline_labeled() {
        let scene = Scene {
            id: "finale".into(),
            text: SceneText::One("The refinery burns.".into()),
            tags: vec!["setpiece".into()],
            ..Default::default()
        };
        let mut journal = Journal::new();
        journal.record_scene(&scene);
        assert!(journal.entries()[0].headline.starts_with("Set Piece: "));
    }

    #[test]
    fn headline_truncates_long_text() {
        let scene = Scene {
            id: "long".into(),
            text: SceneText::One("x".repeat(200)),
            ..Default::default()
        };
        let mut journal = Journal::new();
        journal.record_scene(&scene);
        // "Scene: " + 40 chars + ellipsis
        assert_eq!(journal.entries()[0].headline.chars().count(), 7 + 40 + 1);
    }
}
