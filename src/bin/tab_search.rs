//! Full track lookup: tab deep link plus catalog metadata.
//!
//! Usage:
//!   tab_search <TRACK> <ARTIST> [--save] [--favourites <FILE>]

use std::time::Duration;

use tabscout::catalog::{self, Catalog};
use tabscout::display;
use tabscout::error::LookupError;
use tabscout::favourites::{Favourites, DEFAULT_FILENAME};
use tabscout::songsterr::TabFinder;
use tabscout::Config;

fn main() {
    colog::init();

    let args: Vec<String> = std::env::args().collect();
    let track = args.get(1).cloned().unwrap_or_default();
    let artist = args.get(2).cloned().unwrap_or_default();
    if track.is_empty() || artist.is_empty() || track.starts_with("--") {
        eprintln!("Usage: tab_search <TRACK> <ARTIST> [--save] [--favourites <FILE>]");
        std::process::exit(2);
    }

    let save = args.iter().any(|a| a == "--save");
    let favourites_override = args
        .iter()
        .position(|a| a == "--favourites")
        .and_then(|idx| args.get(idx + 1).cloned());

    let defaults = Config::load().unwrap_or_default();
    let favourites_path = favourites_override
        .or_else(|| defaults.favourites.clone())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
    let timeout = Duration::from_secs(defaults.timeout_secs.unwrap_or(10));

    let finder = TabFinder::with_timeout(timeout);

    println!("=== Tab Lookup ===");
    match finder.find_track_tab(&track, &artist) {
        Ok(Some(tab)) => println!("Interactive tab: {}", tab.url),
        Ok(None) => println!("Tab service could not be reached."),
        Err(e) => println!("{}", e),
    }

    let catalog = match catalog::load_credentials() {
        Some(credentials) => match Catalog::connect_with_timeout(&credentials, timeout) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => {
            println!("No catalog credentials found; metadata lookups disabled.");
            Catalog::unauthenticated()
        }
    };

    println!();
    println!("=== Search Result ===");
    match catalog.resolve_track(&track, &artist) {
        Ok(Some(resolved)) => {
            println!("{} by {}", resolved.name, resolved.artist);
            println!("Popularity: {}", display::popularity_flames(resolved.popularity));
            if save {
                let store = Favourites::new(&favourites_path);
                match store.append(&resolved.name, &resolved.artist) {
                    Ok(()) => println!("Saved to {}.", favourites_path),
                    Err(e) => eprintln!("Could not save favourite: {}", e),
                }
            }
        }
        Ok(None) => println!("Catalog could not be reached."),
        Err(e @ LookupError::InvalidInput(_)) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
        Err(e) => println!("{}", e),
    }

    println!();
    println!("=== Album ===");
    match catalog.resolve_album(&track, &artist) {
        Ok(Some(album)) => {
            println!("Name:           {}", album.name);
            println!("Artist:         {}", album.artist);
            println!("Popularity:     {}", display::popularity_flames(album.popularity));
            if let Some(date) = &album.release_date {
                println!("Release date:   {}", date);
            }
            if let Some(label) = &album.label {
                println!("Label:          {}", label);
            }
            println!("Tracks:         {}", album.track_count);
            for title in &album.tracks {
                println!("  - {}", title);
            }
            if let Some(url) = &album.album_url {
                println!("Catalog page:   {}", url);
            }
        }
        Ok(None) => println!("(unavailable)"),
        Err(e) => println!("{}", e),
    }

    println!();
    println!("=== Artist ===");
    match catalog.resolve_artist(&artist) {
        Ok(Some(summary)) => {
            println!("Name:           {}", summary.name);
            println!("Popularity:     {}", display::popularity_flames(summary.popularity));
            if !summary.genres.is_empty() {
                println!("Genres:         {}", summary.genres.join(", "));
            }
            if let Some(url) = &summary.profile_url {
                println!("Catalog page:   {}", url);
            }
        }
        Ok(None) => println!("(unavailable)"),
        Err(e) => println!("{}", e),
    }

    match catalog.resolve_related_artists(&artist) {
        Ok(Some(related)) if !related.is_empty() => {
            println!("Related artists:");
            for artist in &related {
                println!("  - {}", artist.name);
            }
        }
        _ => {}
    }

    match catalog.resolve_top_tracks(&artist) {
        Ok(Some(top)) if !top.is_empty() => {
            println!("Top tracks:");
            for track in &top {
                println!(
                    "  {:<40} {}",
                    track.title,
                    display::popularity_flames(track.popularity)
                );
            }
        }
        _ => {}
    }

    println!();
    println!("=== Audio Features ===");
    match catalog.resolve_audio_features(&track, &artist) {
        Ok(Some(features)) => {
            println!("Key:            {}", display::key_name(features.key));
            println!("Mode:           {}", display::mode_name(features.mode));
            println!("BPM:            {}", features.tempo.round());
            println!(
                "Time signature: {}",
                display::time_signature(features.time_signature)
            );
        }
        Ok(None) => println!("(unavailable)"),
        Err(e) => println!("{}", e),
    }
}
