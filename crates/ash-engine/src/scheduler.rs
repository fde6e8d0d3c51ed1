//! The deferred-effect scheduler.
//!
//! Every scene transition advances all pending entries by exactly one step.
//! Entries reaching zero fire synchronously, before the destination scene's
//! own entry effects, so a fired effect and the new scene can influence the
//! same render.

use ash_core::{GameState, MutexGroups};

use crate::effects::apply_effects;

/// Advance the schedule by one step and fire due entries.
///
/// Surviving entries keep their original relative order. An entry inserted
/// *by* a firing effect survives the tick and joins the queue after the
/// survivors, with its own full countdown.
///
/// Returns the `push_event` texts of fired entries, oldest first, for the
/// event log.
pub fn tick(state: &mut GameState, groups: &MutexGroups) -> Vec<String> {
    let pending = std::mem::take(&mut state.schedule);
    let mut survivors = Vec::with_capacity(pending.len());
    let mut fired_events = Vec::new();

    for mut entry in pending {
        entry.steps -= 1;
        if entry.steps <= 0 {
            if let Some(event) = &entry.apply.push_event {
                fired_events.push(event.clone());
            }
            // May push fresh entries into state.schedule.
            apply_effects(state, groups, &entry.apply);
        } else {
            survivors.push(entry);
        }
    }

    let inserted = std::mem::replace(&mut state.schedule, survivors);
    state.schedule.extend(inserted);
    fired_events
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash_core::{Effect, ScheduledEffect};
    use std::collections::BTreeMap;

    fn stress_effect(delta: i32) -> Effect {
        Effect {
            stats: BTreeMap::from([("stress".to_string(), delta)]),
            ..Default::default()
        }
    }

    fn schedule(state: &mut GameState, steps: i32, apply: Effect) {
        state.schedule.push(ScheduledEffect { steps, apply });
    }

    #[test]
    fn two_step_entry_fires_on_second_tick() {
        let groups = MutexGroups::standard();
        let mut state = GameState::default();
        let base = state.stat("stress");
        schedule(&mut state, 2, stress_effect(10));

        tick(&mut state, &groups);
        assert_eq!(state.stat("stress"), base);
        assert_eq!(state.schedule.len(), 1);

        tick(&mut state, &groups);
        assert_eq!(state.stat("stress"), base + 10);
        assert!(state.schedule.is_empty());
    }

    #[test]
    fn survivors_keep_relative_order() {
        let groups = MutexGroups::standard();
        let mut state = GameState::default();
        schedule(&mut state, 3, stress_effect(1));
        schedule(&mut state, 1, stress_effect(2));
        schedule(&mut state, 5, stress_effect(3));

        tick(&mut state, &groups);
        let steps: Vec<i32> = state.schedule.iter().map(|s| s.steps).collect();
        assert_eq!(steps, vec![2, 4]);
    }

    #[test]
    fn firing_effect_may_schedule_again() {
        let groups = MutexGroups::standard();
        let mut state = GameState::default();
        let chained = Effect {
            schedule: vec![ScheduledEffect {
                steps: 2,
                apply: stress_effect(5),
            }],
            ..Default::default()
        };
        schedule(&mut state, 1, chained);
        schedule(&mut state, 4, stress_effect(1));

        tick(&mut state, &groups);

        // Survivor first, then the entry the firing effect inserted.
        let steps: Vec<i32> = state.schedule.iter().map(|s| s.steps).collect();
        assert_eq!(steps, vec![3, 2]);
    }

    #[test]
    fn fired_events_reported() {
        let groups = MutexGroups::standard();
        let mut state = GameState::default();
        let mut noisy = stress_effect(2);
        noisy.push_event = Some("The infection spreads.".into());
        schedule(&mut state, 1, noisy);

        let events = tick(&mut state, &groups);
        assert_eq!(events, vec!["The infection spreads.".to_string()]);
    }
}
