use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use lofty::tag::ItemKey;

/// One playable audio source and the metadata shown for it.
#[derive(Debug, Clone)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    /// Total duration as reported by the container, when readable.
    pub duration: Option<Duration>,
    pub display: String,
}

impl Track {
    /// Build a track from a file path, probing tags for title/artist and
    /// duration. Unreadable or untagged files fall back to the file stem.
    pub fn from_path(path: &Path) -> Self {
        let default_title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        let mut title = default_title;
        let mut artist: Option<String> = None;
        let mut duration: Option<Duration> = None;

        if let Ok(tagged) = lofty::read_from_path(path) {
            duration = Some(tagged.properties().duration());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
                    if !v.trim().is_empty() {
                        title = v.to_string();
                    }
                }
                if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
                    let v = v.trim();
                    if !v.is_empty() {
                        artist = Some(v.to_string());
                    }
                }
            }
        }

        let display = make_display(&title, artist.as_deref());

        Self {
            path: path.to_path_buf(),
            title,
            artist,
            duration,
            display,
        }
    }
}

fn make_display(title: &str, artist: Option<&str>) -> String {
    match artist {
        Some(a) if !a.trim().is_empty() => format!("{} - {}", a.trim(), title),
        _ => title.to_string(),
    }
}
