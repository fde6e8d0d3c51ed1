//! Effect and cost delta descriptors.
//!
//! An [`Effect`] describes a bundle of deltas applied to a [`GameState`]
//! when a choice succeeds or a scheduled entry fires; a [`Cost`] is the
//! smaller subset charged unconditionally before the effects. Both are plain
//! data — application order and mutex handling live in the engine.
//!
//! [`GameState`]: crate::state::GameState

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A deferred effect: fires after `steps` scene transitions.
///
/// Used both as an insertion descriptor inside [`Effect::schedule`] and as a
/// pending entry in the state's schedule queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEffect {
    /// Transitions remaining before the effect fires. Insertions with a
    /// zero or negative count are normalized to 1 by the engine.
    pub steps: i32,
    /// The effect to apply when the countdown reaches zero.
    pub apply: Effect,
}

/// A bundle of state deltas.
///
/// Every field is optional; an empty effect is a no-op. Application order is
/// fixed by the engine: time, stats, persona, inventory additions, inventory
/// removals, flag sets, flag unsets, relationships, schedule insertions,
/// trace note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Effect {
    /// Hours to add to the clock (may be negative; clock floors at 0).
    pub time: Option<i64>,
    /// Stat deltas, clamped on write.
    pub stats: BTreeMap<String, i32>,
    /// Persona axis deltas, clamped on write.
    pub persona: BTreeMap<String, i32>,
    /// Items appended to the inventory.
    pub inventory_add: Vec<String>,
    /// Items removed from the inventory (first occurrence each, no-op when
    /// absent).
    pub inventory_remove: Vec<String>,
    /// Flags to set, routed through mutual-exclusion groups.
    pub flags_set: Vec<String>,
    /// Flags to clear.
    pub flags_unset: Vec<String>,
    /// Relationship score deltas, clamped on write.
    pub relationships: BTreeMap<String, i32>,
    /// Deferred effects to enqueue.
    pub schedule: Vec<ScheduledEffect>,
    /// Event-log line for the presentation layer. Not part of the state.
    pub push_event: Option<String>,
    /// Extra note appended to the decision trace.
    pub decision_trace: Option<String>,
}

impl Effect {
    /// Whether the effect carries no deltas at all.
    pub fn is_empty(&self) -> bool {
        self.time.is_none()
            && self.stats.is_empty()
            && self.persona.is_empty()
            && self.inventory_add.is_empty()
            && self.inventory_remove.is_empty()
            && self.flags_set.is_empty()
            && self.flags_unset.is_empty()
            && self.relationships.is_empty()
            && self.schedule.is_empty()
            && self.push_event.is_none()
            && self.decision_trace.is_none()
    }
}

/// The unconditional price of a choice, charged before its effects.
///
/// Stat values here are magnitudes to subtract, matching how story content
/// writes costs (`{"stats": {"stamina": 2}}` spends two stamina).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cost {
    /// Hours the choice takes.
    pub time: Option<i64>,
    /// Stat amounts to spend, clamped on write.
    pub stats: BTreeMap<String, i32>,
    /// Items consumed (first occurrence each, no-op when absent).
    pub items: Vec<String>,
}

impl Cost {
    /// Whether the cost charges nothing.
    pub fn is_empty(&self) -> bool {
        self.time.is_none() && self.stats.is_empty() && self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_effect_roundtrip() {
        let effect: Effect = serde_json::from_str("{}").unwrap();
        assert!(effect.is_empty());
    }

    #[test]
    fn effect_from_story_json() {
        let effect: Effect = serde_json::from_str(
            r#"{
                "time": 1,
                "stats": {"stress": -2},
                "persona": {"fixer": 1},
                "inventoryAdd": ["neighbor_supplies"],
                "flagsSet": ["route_fixer"],
                "relationships": {"Neighbors": 5},
                "schedule": [{"steps": 2, "apply": {"stats": {"stress": 3}}}],
                "pushEvent": "You take what you need."
            }"#,
        )
        .unwrap();
        assert_eq!(effect.time, Some(1));
        assert_eq!(effect.stats["stress"], -2);
        assert_eq!(effect.schedule.len(), 1);
        assert_eq!(effect.schedule[0].steps, 2);
        assert!(!effect.is_empty());
    }

    #[test]
    fn cost_from_story_json() {
        let cost: Cost =
            serde_json::from_str(r#"{"time": 2, "stats": {"stamina": 3}, "items": ["flare"]}"#)
                .unwrap();
        assert_eq!(cost.time, Some(2));
        assert_eq!(cost.stats["stamina"], 3);
        assert_eq!(cost.items, vec!["flare".to_string()]);
    }
}
