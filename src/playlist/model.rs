use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::library::Track;

/// An ordered sequence of tracks plus the position and mode state used to
/// pick what plays next.
///
/// The current index is only meaningful while the sequence is non-empty;
/// every mutation keeps it inside `[0, len)`.
pub struct Playlist {
    tracks: Vec<Track>,
    current: usize,
    shuffle: bool,
    repeat: bool,
    rng: Box<dyn RngCore>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::with_rng(Box::new(StdRng::from_os_rng()))
    }

    /// Build a playlist drawing shuffle indices from `rng`. Tests pass a
    /// seeded [`StdRng`] to make shuffle selection deterministic.
    pub fn with_rng(rng: Box<dyn RngCore>) -> Self {
        Self {
            tracks: Vec::new(),
            current: 0,
            shuffle: false,
            repeat: false,
            rng,
        }
    }

    /// Replace the whole sequence and reset the position to the first track.
    ///
    /// An empty `tracks` is ignored: the sequence and index are left exactly
    /// as they were, so index and sequence can never disagree mid-replace.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            return;
        }
        self.tracks = tracks;
        self.current = 0;
    }

    /// The track at the current position, or `None` while empty.
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    /// Commit the next position per mode policy and return the new current
    /// track.
    ///
    /// Precedence: repeat keeps the index unchanged (the caller restarts
    /// playback from zero); otherwise shuffle draws uniformly over the whole
    /// sequence, immediate repeats included; otherwise the index advances
    /// sequentially and wraps.
    pub fn advance(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        if self.repeat {
            // keep index
        } else if self.shuffle {
            self.current = self.rng.random_range(0..self.tracks.len());
        } else {
            self.current = (self.current + 1) % self.tracks.len();
        }
        self.current()
    }

    /// Step back to the sequential-previous track, wrapping at the front.
    /// Shuffle and repeat do not apply to retreat.
    pub fn retreat(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.current = (self.current + self.tracks.len() - 1) % self.tracks.len();
        self.current()
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.shuffle = on;
    }

    pub fn set_repeat(&mut self, on: bool) {
        self.repeat = on;
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The current position, or `None` while empty.
    pub fn current_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new()
    }
}
