use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(path: &Path) -> Result<(), String> {
    let story = super::load_story(path)?;

    let choices: usize = story.scenes().map(|s| s.choices.len()).sum();
    let setpieces = story.scenes().filter(|s| s.is_setpiece()).count();
    let flags = story.referenced_flags();

    println!("  {} scenes, {} choices", story.len(), choices);
    println!("  {} set pieces, {} flags referenced", setpieces, flags.len());

    let mut endings: Vec<_> = story.scenes().filter(|s| s.is_ending).collect();
    endings.sort_by(|a, b| a.id.cmp(&b.id));

    if endings.is_empty() {
        println!("  No ending scenes.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Ending", "Type", "Teaser"]);
    for scene in &endings {
        let teaser = scene.text.first();
        let teaser = if teaser.len() > 60 {
            let cut: String = teaser.chars().take(57).collect();
            format!("{cut}...")
        } else {
            teaser.to_string()
        };
        table.add_row(vec![
            scene.id.as_str(),
            scene.ending_type.as_deref().unwrap_or("—"),
            &teaser,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} endings", endings.len());

    Ok(())
}
