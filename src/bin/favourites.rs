//! Manage the favourites list.
//!
//! Usage:
//!   favourites list [--favourites <FILE>]
//!   favourites add <TRACK> <ARTIST> [--favourites <FILE>]
//!   favourites remove <TRACK> [--favourites <FILE>]
//!   favourites clear [--favourites <FILE>]

use tabscout::favourites::{Favourites, DEFAULT_FILENAME};
use tabscout::Config;

fn usage() -> ! {
    eprintln!("Usage: favourites <list|add|remove|clear> [ARGS] [--favourites <FILE>]");
    std::process::exit(2);
}

/// Capitalise each word, matching how tracks are stored from lookups.
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() {
    colog::init();

    let args: Vec<String> = std::env::args().collect();
    let command = match args.get(1) {
        Some(c) => c.as_str(),
        None => usage(),
    };

    let favourites_override = args
        .iter()
        .position(|a| a == "--favourites")
        .and_then(|idx| args.get(idx + 1).cloned());
    let defaults = Config::load().unwrap_or_default();
    let path = favourites_override
        .or_else(|| defaults.favourites.clone())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    let store = Favourites::new(&path);

    match command {
        "list" => {
            let entries = store.read_all().unwrap_or_else(|e| {
                eprintln!("Could not read {}: {}", path, e);
                std::process::exit(1);
            });
            if entries.is_empty() {
                println!("The favourites list is empty.");
            } else {
                println!("=== My Favourite ({}) ===", entries.len());
                for entry in &entries {
                    println!("  {:<40} {}", entry.track, entry.artist);
                }
            }
        }
        "add" => {
            let track = args.get(2).cloned().unwrap_or_default();
            let artist = args.get(3).cloned().unwrap_or_default();
            if track.is_empty() || artist.is_empty() || track.starts_with("--") {
                usage();
            }
            match store.append(&track, &artist) {
                Ok(()) => println!("Successfully saved."),
                Err(e) => {
                    eprintln!("Could not save favourite: {}", e);
                    std::process::exit(1);
                }
            }
        }
        "remove" => {
            let track = args.get(2).cloned().unwrap_or_default();
            if track.is_empty() || track.starts_with("--") {
                usage();
            }
            match store.remove_by_track(&title_case(&track)) {
                Ok(0) => println!("Track cannot be found in the favourites list."),
                Ok(n) => println!("Successfully removed {} record(s).", n),
                Err(e) => {
                    eprintln!("Could not update {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        "clear" => match store.clear() {
            Ok(()) => println!("The favourites list has been cleared."),
            Err(e) => {
                eprintln!("Could not clear {}: {}", path, e);
                std::process::exit(1);
            }
        },
        _ => usage(),
    }
}
