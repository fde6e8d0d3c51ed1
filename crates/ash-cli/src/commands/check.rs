use std::path::Path;

use colored::Colorize;

use ash_core::state::DEFAULT_SCENE;

pub fn run(path: &Path, start: Option<&str>) -> Result<(), String> {
    let story = super::load_story(path)?;
    let start = start.unwrap_or(DEFAULT_SCENE);

    if !story.contains(start) {
        return Err(format!("start scene '{start}' is not in the story"));
    }

    let issues = story.validate(start);
    let errors = issues.iter().filter(|i| i.is_error()).count();
    let warnings = issues.len() - errors;

    for issue in &issues {
        if issue.is_error() {
            eprintln!("  {} {issue}", "error:".red().bold());
        } else {
            eprintln!("  {} {issue}", "warning:".yellow());
        }
    }

    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
        return Err("validation failed".into());
    }

    let choices: usize = story.scenes().map(|s| s.choices.len()).sum();
    println!("  All checks passed.");
    println!("  {} scenes, {} choices from '{start}'", story.len(), choices);
    if warnings > 0 {
        println!("  {warnings} warning{}", if warnings == 1 { "" } else { "s" });
    }

    Ok(())
}
