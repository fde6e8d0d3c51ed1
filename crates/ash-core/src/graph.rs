//! The story graph and content validation.
//!
//! A [`StoryGraph`] maps scene ids to [`Scene`] records. It is supplied as
//! static data at startup and never mutated by the engine. Because story
//! content is generated in bulk, a broken reference is a *content issue* to
//! report, never a reason to crash.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::effect::Effect;
use crate::error::{AshError, AshResult};
use crate::scene::Scene;

/// A problem found while validating story content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentIssue {
    /// The declared start scene does not exist.
    MissingStart {
        /// The start scene id.
        start: String,
    },
    /// A reachable choice points at a scene that does not exist.
    MissingTarget {
        /// Scene the choice belongs to.
        scene: String,
        /// Choice label.
        choice: String,
        /// The unresolved destination id.
        target: String,
    },
    /// A choice has neither a destination nor effects; it will never be
    /// shown to the player.
    InertChoice {
        /// Scene the choice belongs to.
        scene: String,
        /// Choice label.
        choice: String,
    },
}

impl std::fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentIssue::MissingStart { start } => {
                write!(f, "start scene \"{start}\" does not exist")
            }
            ContentIssue::MissingTarget {
                scene,
                choice,
                target,
            } => write!(
                f,
                "{scene} :: {choice} points at missing scene \"{target}\""
            ),
            ContentIssue::InertChoice { scene, choice } => {
                write!(f, "{scene} :: {choice} has no destination and no effects")
            }
        }
    }
}

impl ContentIssue {
    /// Whether the issue breaks play (as opposed to an authoring smell).
    pub fn is_error(&self) -> bool {
        !matches!(self, ContentIssue::InertChoice { .. })
    }
}

/// An immutable mapping from scene id to scene definition.
#[derive(Debug, Clone, Default)]
pub struct StoryGraph {
    scenes: HashMap<String, Scene>,
}

impl StoryGraph {
    /// Build a graph from scenes, rejecting duplicate ids.
    pub fn from_scenes(scenes: impl IntoIterator<Item = Scene>) -> AshResult<Self> {
        let mut map = HashMap::new();
        for scene in scenes {
            if scene.id.is_empty() {
                return Err(AshError::Validation("scene with empty id".into()));
            }
            if map.contains_key(&scene.id) {
                return Err(AshError::DuplicateScene(scene.id));
            }
            map.insert(scene.id.clone(), scene);
        }
        Ok(Self { scenes: map })
    }

    /// Parse a graph from JSON.
    ///
    /// Accepts either shape story tooling produces: a map from scene id to
    /// scene record (ids filled in from the keys when omitted), or a flat
    /// list of scene records.
    pub fn from_json_str(source: &str) -> AshResult<Self> {
        if let Ok(map) = serde_json::from_str::<HashMap<String, Scene>>(source) {
            let scenes = map.into_iter().map(|(id, mut scene)| {
                if scene.id.is_empty() {
                    scene.id = id;
                }
                scene
            });
            return Self::from_scenes(scenes);
        }
        let list: Vec<Scene> = serde_json::from_str(source)?;
        Self::from_scenes(list)
    }

    /// Look up a scene by id.
    pub fn get(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Whether a scene id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the graph has no scenes.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Iterate over all scenes, in no particular order.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    /// Every flag name set anywhere in the graph: scene entry flags and
    /// choice effects, including effects nested in schedule insertions.
    pub fn referenced_flags(&self) -> BTreeSet<String> {
        fn collect(effect: &Effect, out: &mut BTreeSet<String>) {
            out.extend(effect.flags_set.iter().cloned());
            for entry in &effect.schedule {
                collect(&entry.apply, out);
            }
        }

        let mut flags = BTreeSet::new();
        for scene in self.scenes.values() {
            flags.extend(scene.flags_set.iter().cloned());
            for choice in &scene.choices {
                if let Some(effect) = &choice.effects {
                    collect(effect, &mut flags);
                }
            }
        }
        flags
    }

    /// Validate the graph: walk every scene reachable from `start` and
    /// report unresolved choice targets plus authoring smells.
    pub fn validate(&self, start: &str) -> Vec<ContentIssue> {
        let mut issues = Vec::new();
        if !self.contains(start) {
            issues.push(ContentIssue::MissingStart {
                start: start.to_string(),
            });
            return issues;
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);

        while let Some(id) = queue.pop_front() {
            let Some(scene) = self.get(id) else { continue };
            for choice in &scene.choices {
                if !choice.is_actionable() {
                    issues.push(ContentIssue::InertChoice {
                        scene: scene.id.clone(),
                        choice: choice.label().to_string(),
                    });
                    continue;
                }
                let Some(target) = choice.target() else {
                    continue;
                };
                match self.scenes.get_key_value(target) {
                    Some((key, _)) => {
                        if seen.insert(key.as_str()) {
                            queue.push_back(key.as_str());
                        }
                    }
                    None => issues.push(ContentIssue::MissingTarget {
                        scene: scene.id.clone(),
                        choice: choice.label().to_string(),
                        target: target.to_string(),
                    }),
                }
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Choice;

    fn scene(id: &str, targets: &[&str]) -> Scene {
        Scene {
            id: id.to_string(),
            choices: targets
                .iter()
                .map(|t| Choice {
                    text: format!("go to {t}"),
                    go_to: Some((*t).to_string()),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = StoryGraph::from_scenes([scene("a", &[]), scene("a", &[])]);
        assert!(matches!(result, Err(AshError::DuplicateScene(id)) if id == "a"));
    }

    #[test]
    fn parses_map_shape_and_fills_ids() {
        let graph = StoryGraph::from_json_str(
            r#"{"intro": {"text": "It begins.", "choices": []}}"#,
        )
        .unwrap();
        assert_eq!(graph.get("intro").unwrap().id, "intro");
    }

    #[test]
    fn parses_list_shape() {
        let graph = StoryGraph::from_json_str(
            r#"[{"id": "intro", "text": "It begins.", "choices": []}]"#,
        )
        .unwrap();
        assert!(graph.contains("intro"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(StoryGraph::from_json_str("nonsense {").is_err());
    }

    #[test]
    fn validate_reports_missing_targets_reachable_from_start() {
        let graph = StoryGraph::from_scenes([
            scene("a", &["b", "ghost"]),
            scene("b", &["a"]),
            // unreachable; its broken target is not reported
            scene("island", &["other_ghost"]),
        ])
        .unwrap();

        let issues = graph.validate("a");
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0],
            ContentIssue::MissingTarget { target, .. } if target == "ghost"
        ));
    }

    #[test]
    fn validate_reports_missing_start() {
        let graph = StoryGraph::from_scenes([scene("a", &[])]).unwrap();
        let issues = graph.validate("nowhere");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }

    #[test]
    fn inert_choice_is_a_warning() {
        let mut broken = scene("a", &[]);
        broken.choices.push(Choice {
            text: "Do nothing".into(),
            ..Default::default()
        });
        let graph = StoryGraph::from_scenes([broken]).unwrap();
        let issues = graph.validate("a");
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn referenced_flags_includes_scheduled_effects() {
        let mut s = scene("a", &[]);
        s.flags_set = vec!["on_entry".into()];
        s.choices.push(Choice {
            text: "Act".into(),
            effects: Some(crate::effect::Effect {
                flags_set: vec!["route_fixer".into()],
                schedule: vec![crate::effect::ScheduledEffect {
                    steps: 2,
                    apply: crate::effect::Effect {
                        flags_set: vec!["deferred_flag".into()],
                        ..Default::default()
                    },
                }],
                ..Default::default()
            }),
            ..Default::default()
        });
        let graph = StoryGraph::from_scenes([s]).unwrap();
        let flags = graph.referenced_flags();
        assert!(flags.contains("on_entry"));
        assert!(flags.contains("route_fixer"));
        assert!(flags.contains("deferred_flag"));
    }
}
