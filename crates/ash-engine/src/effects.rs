//! Cost and effect application.
//!
//! Both entry points mutate a state snapshot in place and are safe to call
//! with empty descriptors. They are always applied to the *clone* inside a
//! controller transaction, never to the live state.

use ash_core::{Cost, Effect, GameState, MutexGroups, ScheduledEffect};

/// Charge a cost: time passes, stat amounts are spent, items are consumed.
pub fn apply_cost(state: &mut GameState, cost: &Cost) {
    if let Some(time) = cost.time {
        state.apply_time_delta(time);
    }
    for (stat, amount) in &cost.stats {
        state.adjust_stat(stat, -amount);
    }
    for item in &cost.items {
        state.remove_item(item);
    }
}

/// Apply an effect bundle in the fixed order: time, stats, persona,
/// inventory additions, inventory removals, flag sets, flag unsets,
/// relationships, schedule insertions, trace note.
///
/// `push_event` is deliberately not handled here — it is presentation
/// output, read by the controller, not state.
pub fn apply_effects(state: &mut GameState, groups: &MutexGroups, effects: &Effect) {
    if let Some(time) = effects.time {
        state.apply_time_delta(time);
    }
    for (stat, delta) in &effects.stats {
        state.adjust_stat(stat, *delta);
    }
    for (axis, delta) in &effects.persona {
        state.adjust_persona(axis, *delta);
    }
    for item in &effects.inventory_add {
        state.add_item(item.clone());
    }
    for item in &effects.inventory_remove {
        state.remove_item(item);
    }
    for flag in &effects.flags_set {
        groups.set_flag(state, flag);
    }
    for flag in &effects.flags_unset {
        state.clear_flag(flag);
    }
    for (name, delta) in &effects.relationships {
        state.adjust_relationship(name, *delta);
    }
    for entry in &effects.schedule {
        state.schedule.push(ScheduledEffect {
            steps: entry.steps.max(1),
            apply: entry.apply.clone(),
        });
    }
    if let Some(note) = &effects.decision_trace {
        state.decision_trace.push(note.clone());
    }
}
