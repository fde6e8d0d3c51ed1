//! Renderable output for the presentation layer.
//!
//! The engine hands the frontend everything a render needs and nothing it
//! must compute: interpolated text, the ordered choice list with block
//! reasons, and ending information. Interpolation happens here, at render
//! time only — placeholder text is never persisted pre-substituted.

/// Label used for `{{background}}` before a background is chosen.
pub const GENERIC_BACKGROUND: &str = "survivor";

/// Substitute `{{name}}` and `{{background}}` placeholders,
/// case-insensitively. Unrecognized placeholders are left verbatim.
pub fn interpolate(text: &str, name: &str, background: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                let key = after[..close].trim();
                if key.eq_ignore_ascii_case("name") {
                    out.push_str(name);
                } else if key.eq_ignore_ascii_case("background") {
                    out.push_str(background);
                } else {
                    out.push_str(&rest[open..open + 2 + close + 2]);
                }
                rest = &after[close + 2..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// One choice as the frontend should present it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChoice {
    /// Stable label (choice id, or its text when no id is set).
    pub id: String,
    /// Interpolated display text.
    pub text: String,
    /// Whether the player currently qualifies for the choice.
    pub enabled: bool,
    /// Why the choice is blocked, for disabled choices.
    pub blocked_reason: Option<String>,
    /// Whether taking the choice should prompt for a player name first.
    pub assign_name: bool,
    /// Primary tag, for choice styling.
    pub tag: Option<String>,
    /// Whether this is the synthesized fail-forward choice rather than
    /// part of the story graph.
    pub fallback: bool,
}

/// A fully prepared scene render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScene {
    /// Id of the rendered scene.
    pub scene_id: String,
    /// Interpolated paragraphs, in order.
    pub paragraphs: Vec<String>,
    /// Persona flavor lines, as `(axis, line)` pairs.
    pub flavor: Vec<(String, String)>,
    /// Choices in display order. Selecting index `i` here is what
    /// [`GameController::choose`](crate::GameController::choose) expects.
    pub choices: Vec<RenderedChoice>,
    /// Whether the scene ends the game.
    pub is_ending: bool,
    /// Ending category, for ending scenes.
    pub ending_type: Option<String>,
    /// Whether the current scene id was missing from the story graph and a
    /// placeholder render was produced instead.
    pub missing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_case_insensitively() {
        let text = "{{NAME}} leans on {{Name}}'s {{background}} training.";
        assert_eq!(
            interpolate(text, "Mara", "Field Medic"),
            "Mara leans on Mara's Field Medic training."
        );
    }

    #[test]
    fn unknown_placeholders_left_alone() {
        assert_eq!(
            interpolate("{{weather}} outside", "Mara", "survivor"),
            "{{weather}} outside"
        );
    }

    #[test]
    fn unterminated_braces_left_alone() {
        assert_eq!(interpolate("broken {{name", "Mara", "survivor"), "broken {{name");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(interpolate("no placeholders", "X", "Y"), "no placeholders");
    }
}
