//! Sequential media driver: keeps the single `<video>` and single `<audio>`
//! element consistent with the active item.
//!
//! The driver mirrors what it has asked each element to do (`src`, play
//! intent, mute) so repeated syncs are idempotent and only emit commands when
//! something actually has to change.

use serde::Serialize;

use crate::ids::Element;
use crate::inputs::PlayFailure;
use crate::item::{encode_media_src, MantraItem, PlaylistItem, VideoItem};
use crate::outputs::{Command, Outputs, SessionEvent};

/// Last known state of one primary element.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ElementState {
    /// Source the driver last loaded (audio sources are stored encoded).
    pub src: Option<String>,
    pub current_time: f64,
    pub duration: f64,
    pub muted: bool,
    /// Whether the last play/pause command issued was `Play`.
    pub wants_play: bool,
    pub loading: bool,
    /// A muted retry was already attempted for the current source.
    #[serde(skip)]
    retried_muted: bool,
}

/// Session flags the driver obeys.
#[derive(Copy, Clone, Debug, Default)]
pub struct DriverFlags {
    pub paused: bool,
    pub mantra_playing: bool,
    pub muted: bool,
    pub speaking: bool,
}

/// What happened after a rejected `play()`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailureOutcome {
    Ignored,
    RetriedMuted,
    /// Autoplay blocked the mantra; it was retried muted and the UI must show it.
    MutedByAutoplay,
    GaveUp,
}

#[derive(Debug, Default)]
pub struct MediaDriver {
    video: ElementState,
    audio: ElementState,
    /// Id of the item the last sync ran against.
    synced: Option<String>,
    trim_fired: bool,
}

impl MediaDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, element: Element) -> &ElementState {
        match element {
            Element::Video => &self.video,
            Element::Audio => &self.audio,
        }
    }

    fn element_mut(&mut self, element: Element) -> &mut ElementState {
        match element {
            Element::Video => &mut self.video,
            Element::Audio => &mut self.audio,
        }
    }

    /// Bring both elements in line with `active` under `flags`.
    ///
    /// Entering an item whose source is already loaded rewinds the element to
    /// the item's start instead of resuming from wherever it was left.
    pub fn sync(&mut self, active: Option<&PlaylistItem>, flags: DriverFlags, out: &mut Outputs) {
        let entered = self.synced.as_deref() != active.map(PlaylistItem::id);
        if entered {
            self.synced = active.map(|item| item.id().to_string());
            self.trim_fired = false;
        }
        match active {
            Some(PlaylistItem::Video(v)) => {
                self.pause(Element::Audio, out);
                self.sync_video(v, flags, entered, out);
            }
            Some(PlaylistItem::Mantra(m)) => {
                self.pause(Element::Video, out);
                self.sync_audio(m, flags, entered, out);
            }
            None => {
                self.pause(Element::Video, out);
                self.pause(Element::Audio, out);
            }
        }
    }

    /// Treat the next sync as a fresh entry even if the active item is
    /// unchanged (a sequence that wraps onto the same item).
    pub fn rearm(&mut self) {
        self.synced = None;
    }

    fn sync_video(
        &mut self,
        item: &VideoItem,
        flags: DriverFlags,
        entered: bool,
        out: &mut Outputs,
    ) {
        if self.video.src.as_deref() != Some(item.src.as_str()) {
            self.load(Element::Video, item.src.clone(), item.start_time, out);
        } else if entered {
            self.rewind(Element::Video, item.start_time.unwrap_or(0.0), out);
        }
        if flags.paused || flags.mantra_playing {
            self.pause(Element::Video, out);
        } else {
            self.play(Element::Video, flags.muted, out);
        }
    }

    fn sync_audio(
        &mut self,
        item: &MantraItem,
        flags: DriverFlags,
        entered: bool,
        out: &mut Outputs,
    ) {
        let encoded = encode_media_src(&item.src);
        if self.audio.src.as_deref() != Some(encoded.as_str()) {
            self.load(Element::Audio, encoded, None, out);
        } else if entered {
            self.rewind(Element::Audio, 0.0, out);
        }
        if flags.paused || flags.speaking {
            self.pause(Element::Audio, out);
        } else {
            self.play(Element::Audio, flags.muted, out);
        }
    }

    fn load(&mut self, element: Element, src: String, start: Option<f64>, out: &mut Outputs) {
        log::debug!("driver: load {:?} <- {}", element, src);
        out.push_command(Command::Load {
            element,
            src: src.clone(),
        });
        if let Some(time) = start {
            out.push_command(Command::Seek { element, time });
        }
        let state = self.element_mut(element);
        state.src = Some(src);
        state.current_time = start.unwrap_or(0.0);
        state.duration = 0.0;
        state.wants_play = false;
        state.retried_muted = false;
        self.set_loading(element, true, out);
    }

    fn rewind(&mut self, element: Element, time: f64, out: &mut Outputs) {
        log::debug!("driver: rewind {:?} to {:.2}", element, time);
        out.push_command(Command::Seek { element, time });
        self.element_mut(element).current_time = time;
    }

    fn play(&mut self, element: Element, muted: bool, out: &mut Outputs) {
        let state = self.element_mut(element);
        if state.wants_play {
            return;
        }
        state.wants_play = true;
        let muted = muted || state.muted;
        out.push_command(Command::Play { element, muted });
    }

    fn pause(&mut self, element: Element, out: &mut Outputs) {
        let state = self.element_mut(element);
        if !state.wants_play {
            return;
        }
        state.wants_play = false;
        out.push_command(Command::Pause { element });
    }

    /// Apply the user's mute toggle to both elements.
    pub fn set_muted(&mut self, muted: bool, out: &mut Outputs) {
        for element in [Element::Video, Element::Audio] {
            let state = self.element_mut(element);
            if state.muted != muted {
                state.muted = muted;
                out.push_command(Command::SetMuted { element, muted });
            }
        }
    }

    /// Write the active element's position.
    pub fn seek(&mut self, active: Option<&PlaylistItem>, time: f64, out: &mut Outputs) {
        let Some(item) = active else {
            return;
        };
        let element = item.element();
        let state = self.element_mut(element);
        let mut time = time.max(0.0);
        if state.duration.is_finite() && state.duration > 0.0 {
            time = time.min(state.duration);
        }
        state.current_time = time;
        out.push_command(Command::Seek { element, time });
    }

    /// Record a position report. Returns `true` when the active video has
    /// entered its `trimEnd` margin and the session should move on now.
    pub fn on_time_update(
        &mut self,
        element: Element,
        current_time: f64,
        duration: f64,
        active: Option<&PlaylistItem>,
    ) -> bool {
        {
            let state = self.element_mut(element);
            state.current_time = current_time;
            if duration.is_finite() {
                state.duration = duration;
            }
        }
        if element != Element::Video || self.trim_fired {
            return false;
        }
        let Some(PlaylistItem::Video(v)) = active else {
            return false;
        };
        let Some(trim) = v.trim_end else {
            return false;
        };
        let loaded = self.video.src.as_deref() == Some(v.src.as_str());
        if !loaded || !self.video.wants_play || !(duration.is_finite() && duration > 0.0) {
            return false;
        }
        if duration - current_time <= trim {
            log::debug!(
                "driver: trimEnd reached on '{}' at {:.2}/{:.2}",
                v.id,
                current_time,
                duration
            );
            self.trim_fired = true;
            return true;
        }
        false
    }

    /// Natural end of a primary element. Returns `true` when the session should
    /// advance; ends for superseded sources or already-trimmed videos are dropped.
    pub fn on_ended(&mut self, element: Element, active: Option<&PlaylistItem>) -> bool {
        let Some(item) = active else {
            return false;
        };
        if item.element() != element {
            log::debug!("driver: ignoring ended from inactive {:?}", element);
            return false;
        }
        let expected = match item {
            PlaylistItem::Video(v) => v.src.clone(),
            PlaylistItem::Mantra(m) => encode_media_src(&m.src),
        };
        let state = self.element_mut(element);
        state.wants_play = false;
        if state.src.as_deref() != Some(expected.as_str()) {
            return false;
        }
        !(element == Element::Video && self.trim_fired)
    }

    /// React to a rejected `play()` promise.
    pub fn on_play_failed(
        &mut self,
        element: Element,
        failure: PlayFailure,
        out: &mut Outputs,
    ) -> FailureOutcome {
        if failure == PlayFailure::Abort {
            log::debug!("driver: play() on {:?} superseded", element);
            return FailureOutcome::Ignored;
        }
        let autoplay_block = element == Element::Audio && failure == PlayFailure::NotAllowed;
        let retryable = element == Element::Video || autoplay_block;
        if !retryable || self.element(element).retried_muted {
            log::warn!("driver: play() on {:?} failed ({:?}); giving up", element, failure);
            self.element_mut(element).wants_play = false;
            self.set_loading(element, false, out);
            return FailureOutcome::GaveUp;
        }
        log::warn!(
            "driver: play() on {:?} rejected ({:?}); retrying muted",
            element,
            failure
        );
        let state = self.element_mut(element);
        state.retried_muted = true;
        state.muted = true;
        state.wants_play = true;
        out.push_command(Command::SetMuted {
            element,
            muted: true,
        });
        out.push_command(Command::Play {
            element,
            muted: true,
        });
        if autoplay_block {
            out.push_event(SessionEvent::MutedByAutoplay { element });
            FailureOutcome::MutedByAutoplay
        } else {
            FailureOutcome::RetriedMuted
        }
    }

    /// Unexpected decode/network failure. Logged and surfaced; no retry.
    pub fn on_media_error(
        &mut self,
        element: Element,
        code: u16,
        message: Option<String>,
        out: &mut Outputs,
    ) {
        log::error!(
            "driver: media error on {:?} (src={:?}): code {} {}",
            element,
            self.element(element).src,
            code,
            message.as_deref().unwrap_or("")
        );
        self.element_mut(element).wants_play = false;
        self.set_loading(element, false, out);
        out.push_event(SessionEvent::MediaFailed {
            element,
            code,
            message,
        });
    }

    pub fn set_loading(&mut self, element: Element, loading: bool, out: &mut Outputs) {
        let state = self.element_mut(element);
        if state.loading != loading {
            state.loading = loading;
            out.push_event(SessionEvent::LoadingChanged { element, loading });
        }
    }
}
