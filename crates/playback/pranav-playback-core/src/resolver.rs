//! Active-item resolution over the sequence cursor and the manual override.
//!
//! `active = manual_track ?? playlist[current_index]`. Everything downstream
//! reads [`Sequencer::active_item`]; nothing else looks at the cursor.

use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;
use crate::item::PlaylistItem;
use crate::playlist::Playlist;

/// Where a `select_track` call landed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum Selection {
    /// The track is part of the sequence; the cursor moved to this index.
    Sequence(usize),
    /// The track is library-only and now overrides the cursor.
    Manual,
}

#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    playlist: Playlist,
    current_index: usize,
    manual_track: Option<PlaylistItem>,
}

impl Sequencer {
    pub fn new(playlist: Playlist) -> Self {
        Self {
            playlist,
            current_index: 0,
            manual_track: None,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn manual_track(&self) -> Option<&PlaylistItem> {
        self.manual_track.as_ref()
    }

    pub fn is_manual(&self) -> bool {
        self.manual_track.is_some()
    }

    pub fn active_item(&self) -> Option<&PlaylistItem> {
        self.manual_track
            .as_ref()
            .or_else(|| self.playlist.get(self.current_index))
    }

    /// Jump the cursor. Clears any manual override.
    pub fn select_index(&mut self, index: usize) -> Result<(), PlaybackError> {
        if index >= self.playlist.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: self.playlist.len(),
            });
        }
        self.manual_track = None;
        self.current_index = index;
        log::debug!("resolver: select_index -> {}", index);
        Ok(())
    }

    /// Select an arbitrary track. Tracks already in the sequence re-anchor the
    /// cursor; anything else becomes the manual override.
    pub fn select_track(&mut self, track: PlaylistItem) -> Selection {
        match self.playlist.position_of(&track) {
            Some(index) => {
                self.manual_track = None;
                self.current_index = index;
                log::debug!("resolver: select_track '{}' -> index {}", track.id(), index);
                Selection::Sequence(index)
            }
            None => {
                log::debug!("resolver: select_track '{}' -> manual", track.id());
                self.manual_track = Some(track);
                Selection::Manual
            }
        }
    }

    /// Move to the next sequence item. A manual override is dropped and the
    /// cursor still steps forward from where it was.
    pub fn advance(&mut self) {
        if self.manual_track.take().is_some() {
            log::debug!("resolver: manual track finished");
        }
        self.current_index = next_index(self.current_index, self.playlist.len());
        log::debug!("resolver: advance -> {}", self.current_index);
    }

    /// Move to the previous sequence item. Index 0 is never a "previous"
    /// target; landing on it wraps to the last item.
    pub fn retreat(&mut self) {
        self.manual_track = None;
        self.current_index = prev_index(self.current_index, self.playlist.len());
        log::debug!("resolver: retreat -> {}", self.current_index);
    }

    /// Swap in a rebuilt playlist, keeping the current item if it survived.
    pub fn replace_playlist(&mut self, playlist: Playlist) {
        let anchor = self
            .playlist
            .get(self.current_index)
            .and_then(|item| playlist.index_of_id(item.id()));
        self.current_index = match anchor {
            Some(index) => index,
            None if playlist.is_empty() => 0,
            None => self.current_index.min(playlist.len() - 1),
        };
        self.playlist = playlist;
    }
}

/// `cur + 1`, wrapping past the end to 1 (index 0 is the first-visit greeting).
pub fn next_index(cur: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = cur + 1;
    if next >= len {
        if len > 1 {
            1
        } else {
            0
        }
    } else {
        next
    }
}

/// `cur - 1`, wrapping to the last index on underflow or when it would land on 0.
pub fn prev_index(cur: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let prev = if cur == 0 { len - 1 } else { cur - 1 };
    if prev == 0 {
        len - 1
    } else {
        prev
    }
}
