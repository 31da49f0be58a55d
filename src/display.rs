//! Human-readable conversions for catalog values.

/// Pitch-class name for the catalog's 0..=11 key index, sharp/flat
/// dual-labelled.
pub fn key_name(key: i32) -> &'static str {
    match key {
        0 => "C",
        1 => "C♯ / D♭",
        2 => "D",
        3 => "D♯ / E♭",
        4 => "E",
        5 => "F",
        6 => "F♯ / G♭",
        7 => "G",
        8 => "G♯ / A♭",
        9 => "A",
        10 => "A♯ / B♭",
        11 => "B",
        _ => "No key detected",
    }
}

/// Major/minor from the catalog's 0/1 modality flag.
pub fn mode_name(mode: i32) -> &'static str {
    if mode == 1 {
        "Major"
    } else {
        "Minor"
    }
}

/// Time signature as "<beats> / 4".
pub fn time_signature(beats: i32) -> String {
    format!("{} / 4", beats)
}

/// Popularity tier in 0..=5 for a popularity score in [0, 100].
pub fn popularity_tier(popularity: u32) -> u32 {
    ((popularity + 10) / 10) / 2
}

/// Popularity rendered as a row of flame emojis, one per tier.
pub fn popularity_flames(popularity: u32) -> String {
    "🔥".repeat(popularity_tier(popularity) as usize)
}
