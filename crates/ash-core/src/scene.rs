//! Scene and choice definitions.
//!
//! Scenes are the nodes of the story graph and choices its edges. Both are
//! immutable at runtime; the engine only reads them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effect::{Cost, Effect};
use crate::requirement::Requirement;

/// Scene body text: a single string or an ordered list of paragraphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneText {
    /// One paragraph.
    One(String),
    /// Several paragraphs, rendered in order.
    Many(Vec<String>),
}

impl Default for SceneText {
    fn default() -> Self {
        SceneText::One(String::new())
    }
}

impl SceneText {
    /// The paragraphs in render order.
    pub fn paragraphs(&self) -> &[String] {
        match self {
            SceneText::One(text) => std::slice::from_ref(text),
            SceneText::Many(lines) => lines,
        }
    }

    /// The first paragraph, used for journal headlines.
    pub fn first(&self) -> &str {
        self.paragraphs().first().map(String::as_str).unwrap_or("")
    }
}

/// An edge in the story graph: one option the player may take from a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Choice {
    /// Stable id, used in the decision trace. Falls back to the text.
    pub id: Option<String>,
    /// Display label. May contain interpolation placeholders.
    pub text: String,
    /// Destination scene id. Absent means the choice stays on its scene.
    #[serde(alias = "next")]
    pub go_to: Option<String>,
    /// Prerequisites gating the choice.
    pub req: Option<Requirement>,
    /// Author-supplied reason shown when the requirement fails.
    pub blocked_reason: Option<String>,
    /// Unconditional price charged before the effects.
    pub cost: Option<Cost>,
    /// State deltas applied on success.
    pub effects: Option<Effect>,
    /// Whether taking this choice assigns the player name.
    pub assign_name: bool,
    /// Background key this choice selects. Overwrites any prior choice.
    pub set_background: Option<String>,
    /// Consequence popup text, when the choice warrants one.
    pub popup_text: Option<String>,
    /// Labels used for presentation (choice coloring, filtering).
    pub tags: Vec<String>,
}

impl Choice {
    /// The destination scene id, if one is set and non-empty.
    pub fn target(&self) -> Option<&str> {
        self.go_to.as_deref().filter(|t| !t.is_empty())
    }

    /// The identifier recorded in the decision trace: the id when present,
    /// otherwise the display text.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.text)
    }

    /// Whether the choice does anything at all. Choices with neither a
    /// destination nor effects are authoring leftovers and are not shown.
    pub fn is_actionable(&self) -> bool {
        self.target().is_some() || self.effects.is_some()
    }
}

/// A node in the story graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scene {
    /// Unique scene id.
    pub id: String,
    /// Narrative text.
    pub text: SceneText,
    /// Options offered to the player, in display order.
    pub choices: Vec<Choice>,
    /// Labels (e.g. `setpiece`) used for journaling and presentation.
    pub tags: Vec<String>,
    /// Hours charged once, on entering the scene.
    pub time_delta: Option<i64>,
    /// Flags set once, on entering the scene.
    pub flags_set: Vec<String>,
    /// Whether the scene ends the game.
    pub is_ending: bool,
    /// Ending category, for ending scenes.
    pub ending_type: Option<String>,
    /// Objective note recorded in the journal when the scene is entered.
    pub notes: Option<String>,
    /// Per-persona flavor lines appended to the scene text by the
    /// presentation layer.
    pub persona_flavor: BTreeMap<String, String>,
}

impl Scene {
    /// Whether the scene carries the `setpiece` tag.
    pub fn is_setpiece(&self) -> bool {
        self.tags.iter().any(|t| t == "setpiece")
    }
}
