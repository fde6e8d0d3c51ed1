pub mod check;
pub mod info;
pub mod play;

use std::path::Path;

use ash_core::StoryGraph;

/// Load and parse a story file.
fn load_story(path: &Path) -> Result<StoryGraph, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {e}", path.display()))?;
    StoryGraph::from_json_str(&source)
        .map_err(|e| format!("cannot parse '{}': {e}", path.display()))
}
