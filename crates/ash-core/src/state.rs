//! The player's game state.
//!
//! [`GameState`] is the single source of truth for a running game. It is
//! fully serializable, cloned at the start of every choice-resolution
//! transaction, and only committed back on success. All numeric mutation
//! helpers clamp on write, so a state can never hold an out-of-range stat.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::effect::ScheduledEffect;

/// Upper bound for stats, persona axes, and relationship scores.
pub const MAX_STAT: i32 = 100;
/// Lower bound for stats, persona axes, and relationship scores.
pub const MIN_STAT: i32 = -100;

/// Maximum length of the player name, in characters.
pub const MAX_NAME_LEN: usize = 40;
/// Placeholder player name before one is assigned.
pub const DEFAULT_NAME: &str = "Survivor";
/// Scene a fresh game starts on.
pub const DEFAULT_SCENE: &str = "act0_intro_apartment";
/// RNG seed of a fresh game.
pub const DEFAULT_SEED: u64 = 1776;

/// Clamp a stat-like value into `[MIN_STAT, MAX_STAT]`.
pub fn clamp_stat(value: i32) -> i32 {
    value.clamp(MIN_STAT, MAX_STAT)
}

/// Coarse read-out of the stress stat for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressBand {
    /// Stress below 30.
    Stable,
    /// Stress in `30..60`.
    Strained,
    /// Stress at 60 or above.
    Critical,
}

impl std::fmt::Display for StressBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StressBand::Stable => write!(f, "Stable"),
            StressBand::Strained => write!(f, "Strained"),
            StressBand::Critical => write!(f, "Critical"),
        }
    }
}

/// The full state of one playthrough.
///
/// Serialized as camelCase JSON so save blobs stay readable; every field has
/// a default, so loading a partial blob overlays it onto the fresh-game
/// template and missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    /// Id of the current scene.
    pub scene_id: String,
    /// Hours elapsed since the start of the game.
    pub time: u64,
    /// Visible stats (health, stamina, stress, morality, extensible).
    pub stats: BTreeMap<String, i32>,
    /// Latent alignment axes, tracked independently of the stats.
    pub persona: BTreeMap<String, i32>,
    /// Held item ids, in acquisition order. Duplicates allowed.
    pub inventory: Vec<String>,
    /// The player's name, capped at [`MAX_NAME_LEN`] characters.
    pub player_name: String,
    /// Chosen background, if any. Re-selection overwrites.
    pub background: Option<String>,
    /// Set flags. Mutual-exclusion groups are enforced at set time.
    pub flags: BTreeSet<String>,
    /// Relationship scores per NPC or faction name.
    pub relationships: BTreeMap<String, i32>,
    /// Seed for the deterministic RNG stream.
    pub rng_seed: u64,
    /// Append-only audit log of every resolved `(scene, choice)` pair.
    pub decision_trace: Vec<String>,
    /// Pending deferred effects, in insertion order.
    pub schedule: Vec<ScheduledEffect>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            scene_id: DEFAULT_SCENE.to_string(),
            time: 0,
            stats: BTreeMap::from([
                ("health".to_string(), 90),
                ("stamina".to_string(), 12),
                ("stress".to_string(), 8),
                ("morality".to_string(), 0),
            ]),
            persona: BTreeMap::from([
                ("protector".to_string(), 0),
                ("warlord".to_string(), 0),
                ("fixer".to_string(), 0),
                ("killer".to_string(), 0),
                ("sociopath".to_string(), 0),
            ]),
            inventory: vec![
                "pocketknife".to_string(),
                "old_radio".to_string(),
                "flare".to_string(),
            ],
            player_name: DEFAULT_NAME.to_string(),
            background: None,
            flags: BTreeSet::new(),
            relationships: BTreeMap::new(),
            rng_seed: DEFAULT_SEED,
            decision_trace: Vec::new(),
            schedule: Vec::new(),
        }
    }
}

impl GameState {
    /// Current value of a stat. Unset stats read as 0.
    pub fn stat(&self, name: &str) -> i32 {
        self.stats.get(name).copied().unwrap_or(0)
    }

    /// Add a delta to a stat, clamped on write.
    pub fn adjust_stat(&mut self, name: &str, delta: i32) {
        let value = clamp_stat(self.stat(name).saturating_add(delta));
        self.stats.insert(name.to_string(), value);
    }

    /// Current value of a persona axis. Unset axes read as 0.
    pub fn persona_axis(&self, name: &str) -> i32 {
        self.persona.get(name).copied().unwrap_or(0)
    }

    /// Add a delta to a persona axis, clamped on write.
    pub fn adjust_persona(&mut self, name: &str, delta: i32) {
        let value = clamp_stat(self.persona_axis(name).saturating_add(delta));
        self.persona.insert(name.to_string(), value);
    }

    /// Current relationship score for a name. Unknown names read as 0.
    pub fn relationship(&self, name: &str) -> i32 {
        self.relationships.get(name).copied().unwrap_or(0)
    }

    /// Add a delta to a relationship score, clamped on write.
    pub fn adjust_relationship(&mut self, name: &str, delta: i32) {
        let value = clamp_stat(self.relationship(name).saturating_add(delta));
        self.relationships.insert(name.to_string(), value);
    }

    /// Advance (or rewind) the clock, never dropping below zero.
    pub fn apply_time_delta(&mut self, delta: i64) {
        self.time = self.time.saturating_add_signed(delta);
    }

    /// Whether the inventory holds at least one of the named item.
    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|i| i == item)
    }

    /// Append an item to the inventory.
    pub fn add_item(&mut self, item: impl Into<String>) {
        self.inventory.push(item.into());
    }

    /// Remove the first occurrence of an item. No-op when absent.
    pub fn remove_item(&mut self, item: &str) -> bool {
        if let Some(pos) = self.inventory.iter().position(|i| i == item) {
            self.inventory.remove(pos);
            true
        } else {
            false
        }
    }

    /// Whether a flag is currently set.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Set a flag with no exclusivity handling.
    ///
    /// Callers that respect mutual-exclusion groups should go through
    /// [`crate::mutex::MutexGroups::set_flag`] instead.
    pub fn set_flag_raw(&mut self, flag: impl Into<String>) {
        self.flags.insert(flag.into());
    }

    /// Clear a flag. No-op when absent.
    pub fn clear_flag(&mut self, flag: &str) {
        self.flags.remove(flag);
    }

    /// Assign the player name: trimmed, capped at [`MAX_NAME_LEN`]
    /// characters. An empty or whitespace-only input keeps the prior name.
    pub fn set_player_name(&mut self, raw: &str) {
        let name: String = raw.trim().chars().take(MAX_NAME_LEN).collect();
        if !name.is_empty() {
            self.player_name = name;
        }
    }

    /// Clamp every stat, persona axis, and relationship score in place.
    pub fn clamp_all(&mut self) {
        for value in self.stats.values_mut() {
            *value = clamp_stat(*value);
        }
        for value in self.persona.values_mut() {
            *value = clamp_stat(*value);
        }
        for value in self.relationships.values_mut() {
            *value = clamp_stat(*value);
        }
    }

    /// In-game day, at 24 hours per day.
    pub fn day(&self) -> u64 {
        self.time / 24
    }

    /// Hour of the in-game day.
    pub fn hour(&self) -> u64 {
        self.time % 24
    }

    /// Coarse stress band for display.
    pub fn stress_band(&self) -> StressBand {
        match self.stat("stress") {
            i32::MIN..30 => StressBand::Stable,
            30..60 => StressBand::Strained,
            _ => StressBand::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_template() {
        let state = GameState::default();
        assert_eq!(state.scene_id, DEFAULT_SCENE);
        assert_eq!(state.stat("health"), 90);
        assert_eq!(state.stat("stress"), 8);
        assert_eq!(state.persona_axis("protector"), 0);
        assert_eq!(state.inventory.len(), 3);
        assert_eq!(state.player_name, DEFAULT_NAME);
        assert!(state.flags.is_empty());
        assert!(state.decision_trace.is_empty());
    }

    #[test]
    fn stats_clamp_on_write() {
        let mut state = GameState::default();
        state.adjust_stat("stress", 500);
        assert_eq!(state.stat("stress"), MAX_STAT);
        state.adjust_stat("stress", -500);
        assert_eq!(state.stat("stress"), MIN_STAT);
    }

    #[test]
    fn unknown_stat_reads_zero() {
        let mut state = GameState::default();
        assert_eq!(state.stat("luck"), 0);
        state.adjust_stat("luck", 7);
        assert_eq!(state.stat("luck"), 7);
    }

    #[test]
    fn time_never_negative() {
        let mut state = GameState::default();
        state.apply_time_delta(5);
        state.apply_time_delta(-99);
        assert_eq!(state.time, 0);
    }

    #[test]
    fn remove_first_occurrence_only() {
        let mut state = GameState {
            inventory: vec!["rope".into(), "rope".into(), "knife".into()],
            ..GameState::default()
        };
        assert!(state.remove_item("rope"));
        assert_eq!(state.inventory, vec!["rope".to_string(), "knife".to_string()]);
        assert!(!state.remove_item("crowbar"));
        assert_eq!(state.inventory.len(), 2);
    }

    #[test]
    fn player_name_trimmed_and_capped() {
        let mut state = GameState::default();
        state.set_player_name("  Mara  ");
        assert_eq!(state.player_name, "Mara");
        state.set_player_name("");
        assert_eq!(state.player_name, "Mara");
        state.set_player_name(&"x".repeat(80));
        assert_eq!(state.player_name.chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn stress_bands() {
        let mut state = GameState::default();
        state.stats.insert("stress".into(), 10);
        assert_eq!(state.stress_band(), StressBand::Stable);
        state.stats.insert("stress".into(), 45);
        assert_eq!(state.stress_band(), StressBand::Strained);
        state.stats.insert("stress".into(), 75);
        assert_eq!(state.stress_band(), StressBand::Critical);
    }

    #[test]
    fn partial_blob_keeps_defaults() {
        let state: GameState = serde_json::from_str(r#"{"sceneId": "loft", "time": 3}"#).unwrap();
        assert_eq!(state.scene_id, "loft");
        assert_eq!(state.time, 3);
        assert_eq!(state.stat("health"), 90);
        assert_eq!(state.player_name, DEFAULT_NAME);
    }

    #[test]
    fn day_and_hour() {
        let state = GameState {
            time: 50,
            ..GameState::default()
        };
        assert_eq!(state.day(), 2);
        assert_eq!(state.hour(), 2);
    }
}
