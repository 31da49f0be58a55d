//! Line-oriented favourites store.
//!
//! One record per line, "track, artist" comma-space separated.  Every
//! mutation is a whole-file read-modify-write; concurrent writers are out
//! of scope.  Blank lines are tolerated when reading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Separator between the track and artist fields of a record.
const FIELD_SEPARATOR: &str = ", ";

/// File name used when no path is configured.
pub const DEFAULT_FILENAME: &str = "my_favourite.txt";

/// One persisted favourite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavouriteEntry {
    pub track: String,
    pub artist: String,
}

/// File-backed favourites list.
pub struct Favourites {
    path: PathBuf,
}

impl Favourites {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record.
    pub fn append(&self, track: &str, artist: &str) -> io::Result<()> {
        use std::io::Write;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}{}{}", track, FIELD_SEPARATOR, artist)
    }

    /// All records in storage order.  A missing file reads as empty.
    pub fn read_all(&self) -> io::Result<Vec<FavouriteEntry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| match line.split_once(FIELD_SEPARATOR) {
                Some((track, artist)) => FavouriteEntry {
                    track: track.to_string(),
                    artist: artist.to_string(),
                },
                None => FavouriteEntry {
                    track: line.to_string(),
                    artist: String::new(),
                },
            })
            .collect())
    }

    /// Rewrite the store omitting every line whose track field equals
    /// `track`, preserving the order of the remaining lines.  Returns the
    /// number of removed records.
    pub fn remove_by_track(&self, track: &str) -> io::Result<usize> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        let kept: Vec<&str> = content
            .lines()
            .filter(|line| {
                let name = line.split(FIELD_SEPARATOR).next().unwrap_or("");
                if !line.trim().is_empty() && name == track {
                    removed += 1;
                    false
                } else {
                    true
                }
            })
            .collect();

        let mut out = kept.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        fs::write(&self.path, out)?;
        Ok(removed)
    }

    /// Truncate the store.
    pub fn clear(&self) -> io::Result<()> {
        fs::write(&self.path, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, Favourites) {
        let dir = tempfile::tempdir().unwrap();
        let favourites = Favourites::new(dir.path().join("favourites.txt"));
        (dir, favourites)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (_dir, store) = store();
        assert_eq!(store.read_all().unwrap(), Vec::new());
    }

    #[test]
    fn test_append_and_read_preserve_order() {
        let (_dir, store) = store();
        store.append("Sultans of Swing", "Dire Straits").unwrap();
        store.append("Black Dog", "Led Zeppelin").unwrap();

        let entries = store.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].track, "Sultans of Swing");
        assert_eq!(entries[0].artist, "Dire Straits");
        assert_eq!(entries[1].track, "Black Dog");
    }

    #[test]
    fn test_blank_lines_tolerated() {
        let (_dir, store) = store();
        fs::write(
            store.path(),
            "\nSultans of Swing, Dire Straits\n\nBlack Dog, Led Zeppelin\n",
        )
        .unwrap();

        let entries = store.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].artist, "Led Zeppelin");
    }

    #[test]
    fn test_remove_by_track_removes_all_matches_in_order() {
        let (_dir, store) = store();
        store.append("Crossroads", "Cream").unwrap();
        store.append("Sultans of Swing", "Dire Straits").unwrap();
        store.append("Crossroads", "John Mayer").unwrap();
        store.append("Black Dog", "Led Zeppelin").unwrap();

        let removed = store.remove_by_track("Crossroads").unwrap();
        assert_eq!(removed, 2);

        let entries = store.read_all().unwrap();
        let tracks: Vec<&str> = entries.iter().map(|e| e.track.as_str()).collect();
        assert_eq!(tracks, vec!["Sultans of Swing", "Black Dog"]);
    }

    #[test]
    fn test_remove_unknown_track_is_noop() {
        let (_dir, store) = store();
        store.append("Black Dog", "Led Zeppelin").unwrap();

        assert_eq!(store.remove_by_track("Kashmir").unwrap(), 0);
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_matches_full_track_field_only() {
        let (_dir, store) = store();
        store.append("Black Dog", "Led Zeppelin").unwrap();
        store.append("Black", "Pearl Jam").unwrap();

        assert_eq!(store.remove_by_track("Black").unwrap(), 1);
        let entries = store.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].track, "Black Dog");
    }

    #[test]
    fn test_clear_truncates() {
        let (_dir, store) = store();
        store.append("Black Dog", "Led Zeppelin").unwrap();
        store.clear().unwrap();
        assert_eq!(store.read_all().unwrap(), Vec::new());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
    }
}
