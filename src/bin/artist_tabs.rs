//! Artist-wide tab listing plus artist metadata.
//!
//! Usage:
//!   artist_tabs <ARTIST>

use std::time::Duration;

use tabscout::catalog::{self, Catalog};
use tabscout::display;
use tabscout::songsterr::{self, TabFinder};
use tabscout::Config;

fn main() {
    colog::init();

    let args: Vec<String> = std::env::args().collect();
    let artist = args.get(1).cloned().unwrap_or_default();
    if artist.is_empty() || artist.starts_with("--") {
        eprintln!("Usage: artist_tabs <ARTIST>");
        std::process::exit(2);
    }

    let defaults = Config::load().unwrap_or_default();
    let timeout = Duration::from_secs(defaults.timeout_secs.unwrap_or(10));

    let finder = TabFinder::with_timeout(timeout);

    match finder.artist_catalog(&artist) {
        Ok(Some(entries)) => {
            let matched = songsterr::filter_by_artist(entries, &artist);
            match songsterr::distinct_sorted_titles(&matched) {
                Ok(titles) => {
                    println!("=== Available Tabs ({}) ===", titles.len());
                    for title in &titles {
                        println!("  - {}", title);
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
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
}
