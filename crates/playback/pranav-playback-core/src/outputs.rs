//! Output contracts from the session reducer.
//!
//! Outputs carry the side-effect commands the host must execute against its
//! media elements this step, and a separate list of semantic events for the UI.

use serde::{Deserialize, Serialize};

use crate::ids::{BufferId, Element, SlotLayer, SpeechToken};
use crate::item::PlaylistItem;
use crate::manifest::ManifestKind;
use crate::slot::SlotContent;

/// One side effect for the host, in execution order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Replace the element's source.
    Load { element: Element, src: String },
    /// Write the element's `currentTime`.
    Seek { element: Element, time: f64 },
    /// Call `play()`; failures come back as `PlayFailed`.
    Play { element: Element, muted: bool },
    Pause { element: Element },
    SetMuted { element: Element, muted: bool },
    /// Load content into a hidden (always muted) buffer; report `MediaReady`
    /// once it can render.
    StageSlot {
        layer: SlotLayer,
        buffer: BufferId,
        content: SlotContent,
    },
    /// Bring a buffer to the front (cross-fade).
    ShowSlot { layer: SlotLayer, buffer: BufferId },
    ShowIntroText { segment: usize, text: String },
    /// Start the text fade-out.
    HideIntroText,
    /// Fade the whole intro overlay away.
    FadeOutIntro { secs: f64 },
    Speak { token: SpeechToken, text: String },
    CancelSpeech,
}

/// Discrete semantic signals emitted during a step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum SessionEvent {
    ActiveItemChanged {
        item: Option<PlaylistItem>,
        index: Option<usize>,
        manual: bool,
    },
    /// Autoplay was blocked and the element is now muted; the UI should offer unmute.
    MutedByAutoplay { element: Element },
    LoadingChanged { element: Element, loading: bool },
    MediaFailed {
        element: Element,
        code: u16,
        message: Option<String>,
    },
    AmbientSwapped {
        buffer: BufferId,
        content: SlotContent,
    },
    IntroClipChanged { clip: usize },
    IntroCompleted { skipped: bool },
    PoolDegraded { kind: ManifestKind, reason: String },
    SpeechFinished { token: SpeechToken },
    PausedChanged { paused: bool },
    MutedChanged { muted: bool },
}

/// Outputs returned by `Session::update()`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub commands: Vec<Command>,
    #[serde(default)]
    pub events: Vec<SessionEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.commands.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    #[inline]
    pub fn push_event(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.events.is_empty()
    }

    /// Commands targeting one primary element, in order.
    pub fn commands_for(&self, element: Element) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(move |c| match c {
            Command::Load { element: e, .. }
            | Command::Seek { element: e, .. }
            | Command::Play { element: e, .. }
            | Command::Pause { element: e }
            | Command::SetMuted { element: e, .. } => *e == element,
            _ => false,
        })
    }
}
