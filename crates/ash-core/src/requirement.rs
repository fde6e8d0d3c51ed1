//! Requirement predicates gating choices.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::GameState;

/// Inclusive bounds on a single stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBound {
    /// The stat must be at least this value.
    pub gte: Option<i32>,
    /// The stat must be at most this value.
    pub lte: Option<i32>,
}

/// A predicate over [`GameState`] deciding whether a choice is legal.
///
/// All supplied clauses must pass; absent clauses are vacuously true, so the
/// empty requirement always passes. Evaluation is pure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Requirement {
    /// Items that must all be held.
    pub items: Vec<String>,
    /// Flags that must all be set.
    pub flags: Vec<String>,
    /// Flags that must all be absent.
    pub flags_none: Vec<String>,
    /// Per-stat bounds. Unset stats are evaluated as 0.
    pub stats: BTreeMap<String, StatBound>,
}

impl Requirement {
    /// Evaluate the requirement against a state.
    pub fn met_by(&self, state: &GameState) -> bool {
        if self.items.iter().any(|item| !state.has_item(item)) {
            return false;
        }
        if self.flags.iter().any(|flag| !state.has_flag(flag)) {
            return false;
        }
        if self.flags_none.iter().any(|flag| state.has_flag(flag)) {
            return false;
        }
        for (stat, bound) in &self.stats {
            let value = state.stat(stat);
            if bound.gte.is_some_and(|min| value < min) {
                return false;
            }
            if bound.lte.is_some_and(|max| value > max) {
                return false;
            }
        }
        true
    }

    /// Human-readable summary used as the default block reason for choices
    /// the player does not currently qualify for.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        for (stat, bound) in &self.stats {
            if let Some(min) = bound.gte {
                parts.push(format!("{stat} ≥ {min}"));
            }
            if let Some(max) = bound.lte {
                parts.push(format!("{stat} ≤ {max}"));
            }
        }
        if !self.items.is_empty() {
            parts.push(format!("Need: {}", self.items.join(", ")));
        }
        if !self.flags.is_empty() {
            parts.push(format!("Flags: {}", self.flags.join(", ")));
        }
        parts.join(" · ")
    }
}
