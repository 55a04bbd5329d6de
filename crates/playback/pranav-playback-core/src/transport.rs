//! Transport view model and the library panel.
//!
//! Neither holds playback state of its own: the panel only knows whether it is
//! open and which library-only tracks exist, and every click resolves to a
//! resolver selection.

use serde::{Deserialize, Serialize};

use crate::item::PlaylistItem;
use crate::playlist::Playlist;
use crate::resolver::Sequencer;

/// One row of the library panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub item: PlaylistItem,
    /// Position in the session sequence; `None` for library-only tracks.
    pub sequence_index: Option<usize>,
    pub is_current: bool,
}

/// What clicking a library row does.
#[derive(Clone, Debug, PartialEq)]
pub enum LibraryAction {
    SelectIndex(usize),
    SelectTrack(PlaylistItem),
}

impl LibraryEntry {
    pub fn action(&self) -> LibraryAction {
        match self.sequence_index {
            Some(index) => LibraryAction::SelectIndex(index),
            None => LibraryAction::SelectTrack(self.item.clone()),
        }
    }
}

#[derive(Debug, Default)]
pub struct LibraryPanel {
    open: bool,
    extras: Vec<PlaylistItem>,
}

impl LibraryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn extras(&self) -> &[PlaylistItem] {
        &self.extras
    }

    /// Add library-only tracks, skipping anything already in the sequence or
    /// already listed. Returns how many were added.
    pub fn add_tracks(
        &mut self,
        tracks: impl IntoIterator<Item = PlaylistItem>,
        playlist: &Playlist,
    ) -> usize {
        let mut added = 0;
        for track in tracks {
            let in_sequence = playlist.position_of(&track).is_some();
            let listed = self.extras.iter().any(|t| t.same_media(&track));
            if !in_sequence && !listed {
                self.extras.push(track);
                added += 1;
            }
        }
        added
    }

    /// Sequence rows in order, then library-only rows.
    pub fn entries(&self, sequencer: &Sequencer) -> Vec<LibraryEntry> {
        let manual = sequencer.manual_track();
        let cursor = sequencer.current_index();
        let mut rows: Vec<LibraryEntry> = sequencer
            .playlist()
            .iter()
            .enumerate()
            .map(|(i, item)| LibraryEntry {
                item: item.clone(),
                sequence_index: Some(i),
                is_current: manual.is_none() && i == cursor,
            })
            .collect();
        rows.extend(self.extras.iter().map(|item| LibraryEntry {
            item: item.clone(),
            sequence_index: None,
            is_current: manual.is_some_and(|m| m.same_media(item)),
        }));
        rows
    }
}

/// Snapshot for the lightweight player bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportView {
    pub active: Option<PlaylistItem>,
    pub is_paused: bool,
    pub is_muted: bool,
    /// Mute was forced by an autoplay block; the UI shows a tap-to-unmute hint.
    pub muted_by_autoplay: bool,
    pub is_loading: bool,
    pub position: f64,
    pub duration: f64,
    /// `position / duration` in `0..=1`, `0` while the duration is unknown.
    pub progress: f64,
    pub position_label: String,
    pub duration_label: String,
    pub library_open: bool,
}

/// `m:ss`, or `h:mm:ss` from one hour on. Non-finite or negative input reads `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".to_string();
    }
    let total = secs.floor() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

pub fn progress_ratio(position: f64, duration: f64) -> f64 {
    if !(duration.is_finite() && duration > 0.0) || !position.is_finite() {
        return 0.0;
    }
    (position / duration).clamp(0.0, 1.0)
}
