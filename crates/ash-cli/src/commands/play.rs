use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use ash_core::StressBand;
use ash_engine::{DirStore, EngineConfig, GameController, TurnOutcome};

pub fn run(story_path: &Path, save_dir: &Path, fresh: bool, seed: Option<u64>) -> Result<(), String> {
    let story = super::load_story(story_path)?;
    let mut config = EngineConfig::default();
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let mut game = GameController::new(story, config, Box::new(DirStore::new(save_dir)));

    let resumed = if fresh {
        false
    } else {
        game.continue_game()
            .map_err(|e| format!("failed to load save: {e}"))?
    };
    if resumed {
        println!("  {} where you left off.", "Resuming".bold());
    } else {
        println!("  {} a new game.", "Starting".bold());
        if let Some(warning) = game.new_game() {
            println!("{}", format!("  could not save: {warning}").yellow());
        }
    }
    println!("  Type a choice number, 'help' for commands, 'quit' to exit.\n");

    print_scene(&game);

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Ok(number) = input.parse::<usize>() {
            if number == 0 {
                println!("{}\n", "Choices start at 1.".yellow());
                continue;
            }
            if take_choice(&mut game, number - 1, &mut reader)? {
                break;
            }
            continue;
        }

        let (command, rest) = match input.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };
        match command.to_ascii_lowercase().as_str() {
            "help" | "h" => print_help(),
            "quit" | "q" => break,
            "look" | "l" => print_scene(&game),
            "stats" => print_stats(&game),
            "inventory" | "inv" | "i" => print_list("Inventory", &game.state().inventory),
            "relationships" | "rel" => print_scores(&game.state().relationships),
            "flags" => {
                let flags: Vec<String> = game.state().flags.iter().cloned().collect();
                print_list("Flags", &flags);
            }
            "trace" => print_list("Decisions", &game.state().decision_trace),
            "journal" | "j" => print_journal(&game),
            "events" => print_events(&game),
            "save" => match game.save() {
                Ok(()) => println!("  Saved.\n"),
                Err(e) => println!("{}\n", format!("  could not save: {e}").yellow()),
            },
            "export" => export(&game)?,
            "goto" => match game.jump_to(rest) {
                Ok(()) => print_scene(&game),
                Err(e) => println!("{}\n", format!("  {e}").yellow()),
            },
            "new" => {
                if let Some(warning) = game.new_game() {
                    println!("{}", format!("  could not save: {warning}").yellow());
                }
                println!("  Starting over.\n");
                print_scene(&game);
            }
            _ => println!("{}\n", "Unknown command. Type 'help'.".yellow()),
        }
    }

    Ok(())
}

/// Resolve the choice at `index`, prompting for a name first when the
/// choice assigns one. Returns `true` when the game reached an ending.
fn take_choice(
    game: &mut GameController,
    index: usize,
    reader: &mut impl BufRead,
) -> Result<bool, String> {
    let scene = game.render();
    let name = match scene.choices.get(index) {
        Some(choice) if choice.assign_name => Some(prompt_name(reader)?),
        _ => None,
    };

    match game.choose(index, name.as_deref()) {
        TurnOutcome::Applied(report) => {
            for event in &report.events {
                println!("  {}", event.text.dimmed());
            }
            if let Some(popup) = &report.popup {
                println!("\n  {}", popup.yellow().bold());
            }
            if let Some(warning) = &report.save_warning {
                println!("{}", format!("  could not save: {warning}").yellow());
            }
            println!();
            print_scene(game);
            Ok(report.ended)
        }
        TurnOutcome::Ignored(_) => {
            println!("{}\n", "That isn't an option right now.".yellow());
            Ok(false)
        }
    }
}

fn prompt_name(reader: &mut impl BufRead) -> Result<String, String> {
    print!("  Your name: ");
    io::stdout().flush().map_err(|e| e.to_string())?;
    let mut line = String::new();
    reader.read_line(&mut line).map_err(|e| e.to_string())?;
    Ok(line.trim().to_string())
}

fn print_scene(game: &GameController) {
    let scene = game.render();
    let state = game.state();

    let band = state.stress_band();
    let band_label = match band {
        StressBand::Stable => band.to_string().green(),
        StressBand::Strained => band.to_string().yellow(),
        StressBand::Critical => band.to_string().red().bold(),
    };
    println!(
        "{} {band_label}\n",
        format!("── Day {} · {:02}:00 · stress:", state.day(), state.hour()).dimmed()
    );

    if scene.missing {
        for paragraph in &scene.paragraphs {
            println!("  {}", paragraph.red());
        }
        println!();
        return;
    }

    for paragraph in &scene.paragraphs {
        println!("  {paragraph}\n");
    }

    // One flavor line, for the strongest persona leaning.
    if let Some((axis, _)) = state
        .persona
        .iter()
        .filter(|(_, v)| **v > 0)
        .max_by_key(|(_, v)| **v)
        && let Some((_, line)) = scene.flavor.iter().find(|(a, _)| a == axis)
    {
        println!("  {}\n", line.dimmed().italic());
    }

    if scene.is_ending {
        let kind = scene.ending_type.as_deref().unwrap_or("unknown");
        println!("  {} ({kind})\n", "THE END".bold());
        return;
    }

    for (n, choice) in scene.choices.iter().enumerate() {
        let tag = choice
            .tag
            .as_deref()
            .map(|t| format!(" [{t}]"))
            .unwrap_or_default();
        if choice.enabled {
            println!("  {}) {}{}", n + 1, choice.text, tag.dimmed());
        } else {
            let reason = choice
                .blocked_reason
                .as_deref()
                .map(|r| format!("  ({r})"))
                .unwrap_or_default();
            println!("{}", format!("  {}) {}{}", n + 1, choice.text, reason).dimmed());
        }
    }
    println!();
}

fn print_stats(game: &GameController) {
    let state = game.state();
    println!("  {} ({})", state.player_name, state.background.as_deref().unwrap_or("survivor"));
    for (stat, value) in &state.stats {
        println!("  {stat:>10}: {value}");
    }
    if !state.persona.is_empty() {
        println!();
        for (axis, value) in &state.persona {
            println!("  {axis:>10}: {value}");
        }
    }
    println!();
}

fn print_scores(scores: &std::collections::BTreeMap<String, i32>) {
    if scores.is_empty() {
        println!("  Nobody knows you yet.\n");
        return;
    }
    for (name, value) in scores {
        println!("  {name}: {value:+}");
    }
    println!();
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        println!("  {label}: none\n");
        return;
    }
    println!("  {label}:");
    for item in items {
        println!("    - {item}");
    }
    println!();
}

fn print_journal(game: &GameController) {
    if game.journal().is_empty() {
        println!("  The journal is empty.\n");
        return;
    }
    for entry in game.journal().entries() {
        println!("  {}", entry.headline);
        if !entry.note.is_empty() {
            println!("    {}", entry.note.dimmed());
        }
    }
    println!();
}

fn print_events(game: &GameController) {
    if game.events().is_empty() {
        println!("  Nothing noteworthy yet.\n");
        return;
    }
    for event in game.events().entries() {
        println!("  {} {}", format!("[{}h]", event.time).dimmed(), event.text);
    }
    println!();
}

fn export(game: &GameController) -> Result<(), String> {
    let blob = game.export_blob().map_err(|e| e.to_string())?;
    let file = game.export_file_name();
    std::fs::write(&file, blob).map_err(|e| e.to_string())?;
    println!("  Exported to {file}\n");
    Ok(())
}

fn print_help() {
    println!(
        "  <number>         take that choice
  look (l)         reprint the scene
  stats            stats and persona
  inventory (i)    carried items
  relationships    who remembers you
  flags            set story flags
  trace            decisions so far
  journal (j)      objective journal
  events           recent events
  save             save now
  export           write a portable save file
  goto <scene>     jump to a scene (debug)
  new              start over
  quit (q)         exit
"
    );
}
