//! Input contracts for the session reducer.
//!
//! The host translates user actions and DOM media events into
//! [`SessionInput`]s and passes them to `Session::update()` in arrival order.

use serde::{Deserialize, Serialize};

use crate::ids::{BufferId, Element, SlotLayer, SpeechToken};
use crate::item::PlaylistItem;
use crate::manifest::{ManifestKind, MediaManifest};

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    #[serde(default)]
    pub events: Vec<SessionInput>,
}

impl Inputs {
    pub fn one(input: SessionInput) -> Self {
        Self {
            events: vec![input],
        }
    }
}

impl From<Vec<SessionInput>> for Inputs {
    fn from(events: Vec<SessionInput>) -> Self {
        Self { events }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionInput {
    // Transport / library.
    SelectIndex {
        index: usize,
    },
    SelectTrack {
        track: PlaylistItem,
    },
    Next,
    Previous,
    TogglePause,
    SetPaused {
        paused: bool,
    },
    ToggleMute,
    SetMuted {
        muted: bool,
    },
    Seek {
        time: f64,
    },
    ToggleLibrary,
    SetFirstTime {
        is_first_time: Option<bool>,
    },

    // Primary element events.
    TimeUpdate {
        element: Element,
        current_time: f64,
        duration: f64,
    },
    Ended {
        element: Element,
    },
    PlayFailed {
        element: Element,
        failure: PlayFailure,
    },
    Playing {
        element: Element,
    },
    Paused {
        element: Element,
    },
    Waiting {
        element: Element,
    },
    CanPlay {
        element: Element,
    },
    MediaError {
        element: Element,
        code: u16,
        #[serde(default)]
        message: Option<String>,
    },

    // Double-buffered layers.
    MediaReady {
        layer: SlotLayer,
        buffer: BufferId,
    },
    SlotEnded {
        layer: SlotLayer,
        buffer: BufferId,
    },
    IntroTap,

    // Manifests.
    ManifestLoaded {
        kind: ManifestKind,
        manifest: MediaManifest,
    },
    ManifestFailed {
        kind: ManifestKind,
        reason: String,
    },

    // Narration.
    SpeakRequested {
        text: String,
    },
    SpeechEnded {
        token: SpeechToken,
    },
    CancelSpeech,
}

/// Classified rejection of an element's `play()` promise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayFailure {
    /// Superseded by a newer load (`AbortError`).
    Abort,
    /// Blocked by the autoplay policy (`NotAllowedError`).
    NotAllowed,
    Other,
}

impl PlayFailure {
    /// Classify a DOMException name.
    pub fn from_dom_name(name: &str) -> Self {
        match name {
            "AbortError" => PlayFailure::Abort,
            "NotAllowedError" => PlayFailure::NotAllowed,
            _ => PlayFailure::Other,
        }
    }
}
