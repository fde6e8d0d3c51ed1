//! Mutual-exclusion flag groups.
//!
//! A group names a set of flags of which at most one may be set at a time:
//! joining the militia clears `joined_raiders`, committing to one route
//! clears the others. Membership is declared up front — explicit member
//! lists plus name-prefix rules — and resolved against a story graph at
//! load, instead of pattern-matching flag names on every application.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::graph::StoryGraph;
use crate::state::GameState;

/// Name of the faction exclusivity group.
pub const FACTION_GROUP: &str = "faction";
/// Name of the route exclusivity group.
pub const ROUTE_GROUP: &str = "route";
/// Flag-name prefix owned by the route group.
pub const ROUTE_PREFIX: &str = "route_";

/// Declared mutual-exclusion groups with a resolved membership index.
#[derive(Debug, Clone, Default)]
pub struct MutexGroups {
    /// Group name to known member flags.
    members: BTreeMap<String, BTreeSet<String>>,
    /// Flag-name prefix to owning group.
    prefixes: BTreeMap<String, String>,
    /// Resolved flag-to-group index.
    index: HashMap<String, String>,
}

impl MutexGroups {
    /// An empty group table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard groups of the base game: a `faction` group with its
    /// three declared members, and a `route` group owning the `route_`
    /// name prefix.
    pub fn standard() -> Self {
        let mut groups = Self::new();
        groups.declare_members(
            FACTION_GROUP,
            ["joined_militia", "joined_raiders", "faction_neutral"],
        );
        groups.declare_prefix(ROUTE_GROUP, ROUTE_PREFIX);
        groups
    }

    /// Declare explicit member flags for a group.
    pub fn declare_members<I, S>(&mut self, group: &str, flags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = self.members.entry(group.to_string()).or_default();
        for flag in flags {
            let flag = flag.into();
            self.index.insert(flag.clone(), group.to_string());
            set.insert(flag);
        }
    }

    /// Declare a name prefix owned by a group. Any flag starting with the
    /// prefix belongs to the group.
    pub fn declare_prefix(&mut self, group: &str, prefix: impl Into<String>) {
        self.members.entry(group.to_string()).or_default();
        self.prefixes.insert(prefix.into(), group.to_string());
    }

    /// Register every prefix-matched flag the story graph mentions, so the
    /// full membership of prefix-owned groups is known up front and
    /// inspectable rather than discovered one flag at a time.
    pub fn resolve(&mut self, graph: &StoryGraph) {
        for flag in graph.referenced_flags() {
            if self.index.contains_key(&flag) {
                continue;
            }
            if let Some(group) = self.prefix_group(&flag) {
                let group = group.to_string();
                self.index.insert(flag.clone(), group.clone());
                self.members.entry(group).or_default().insert(flag);
            }
        }
    }

    fn prefix_group(&self, flag: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(prefix, _)| flag.starts_with(prefix.as_str()))
            .map(|(_, group)| group.as_str())
    }

    /// The group a flag belongs to, if any. Consults the resolved index
    /// first, then the prefix rules, so flags that never appear in the
    /// graph (e.g. from an imported save) still group correctly.
    pub fn group_of(&self, flag: &str) -> Option<&str> {
        self.index
            .get(flag)
            .map(String::as_str)
            .or_else(|| self.prefix_group(flag))
    }

    /// Known members of a group.
    pub fn members(&self, group: &str) -> Option<&BTreeSet<String>> {
        self.members.get(group)
    }

    /// Set a flag on a state, clearing every other member of the flag's
    /// group in the same operation. Flags outside any group are set
    /// independently.
    pub fn set_flag(&self, state: &mut GameState, flag: &str) {
        if let Some(group) = self.group_of(flag) {
            let evicted: Vec<String> = state
                .flags
                .iter()
                .filter(|set| set.as_str() != flag && self.group_of(set) == Some(group))
                .cloned()
                .collect();
            for old in evicted {
                state.clear_flag(&old);
            }
        }
        state.set_flag_raw(flag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;
    use crate::scene::{Choice, Scene};

    #[test]
    fn faction_flags_are_exclusive() {
        let groups = MutexGroups::standard();
        let mut state = GameState::default();
        groups.set_flag(&mut state, "joined_militia");
        groups.set_flag(&mut state, "joined_raiders");
        assert!(!state.has_flag("joined_militia"));
        assert!(state.has_flag("joined_raiders"));
    }

    #[test]
    fn route_prefix_flags_are_exclusive() {
        let groups = MutexGroups::standard();
        let mut state = GameState::default();
        groups.set_flag(&mut state, "route_protector");
        groups.set_flag(&mut state, "route_killer");
        let routes: Vec<&String> = state
            .flags
            .iter()
            .filter(|f| f.starts_with(ROUTE_PREFIX))
            .collect();
        assert_eq!(routes, vec!["route_killer"]);
    }

    #[test]
    fn ungrouped_flags_accumulate() {
        let groups = MutexGroups::standard();
        let mut state = GameState::default();
        groups.set_flag(&mut state, "door_reinforced");
        groups.set_flag(&mut state, "area_mapped");
        assert!(state.has_flag("door_reinforced"));
        assert!(state.has_flag("area_mapped"));
    }

    #[test]
    fn resolve_registers_graph_flags() {
        let scene = Scene {
            id: "a".into(),
            choices: vec![Choice {
                text: "Commit".into(),
                effects: Some(Effect {
                    flags_set: vec!["route_warlord".into(), "held_line".into()],
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        };
        let graph = StoryGraph::from_scenes([scene]).unwrap();

        let mut groups = MutexGroups::standard();
        groups.resolve(&graph);

        let routes = groups.members(ROUTE_GROUP).unwrap();
        assert!(routes.contains("route_warlord"));
        assert_eq!(groups.group_of("held_line"), None);
    }

    #[test]
    fn unresolved_prefix_flag_still_groups() {
        // Flag never mentioned in any graph, e.g. arriving via import.
        let groups = MutexGroups::standard();
        assert_eq!(groups.group_of("route_ghost"), Some(ROUTE_GROUP));
    }
}
