//! Session: state ownership and the single `update(dt, inputs)` reducer.
//!
//! Per step:
//! 1. apply inputs in arrival order (selection, element events, slot signals),
//! 2. advance timers by `dt` (intro text, intro fade, and ambient dwell while
//!    a mantra is on screen),
//! 3. resolve the active item once and sync the primary elements to it.
//!
//! Because the driver only runs in step 3, a burst of selections inside one
//! step converges on the last one.

use serde::{Deserialize, Serialize};

use crate::ambient::AmbientEngine;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::driver::{DriverFlags, FailureOutcome, MediaDriver};
use crate::error::PlaybackError;
use crate::ids::{Element, SessionId, SlotLayer};
use crate::inputs::{Inputs, SessionInput};
use crate::intro::IntroSequencer;
use crate::item::PlaylistItem;
use crate::manifest::ManifestKind;
use crate::narration::NarrationGate;
use crate::outputs::{Command, Outputs, SessionEvent};
use crate::playlist::{Playlist, PlaylistBuilder};
use crate::resolver::Sequencer;
use crate::slot::AssetKind;
use crate::transport::{format_time, progress_ratio, LibraryEntry, LibraryPanel, TransportView};

/// Independent flags governing play/pause decisions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFlags {
    pub is_session_paused: bool,
    pub is_mantra_playing: bool,
    pub is_muted: bool,
    pub muted_by_autoplay: bool,
}

#[derive(Debug)]
pub struct Session {
    id: SessionId,
    cfg: Config,
    is_first_time: Option<bool>,
    builder: PlaylistBuilder,
    sequencer: Sequencer,
    driver: MediaDriver,
    ambient: AmbientEngine,
    intro: IntroSequencer,
    library: LibraryPanel,
    narration: NarrationGate,
    flags: SessionFlags,
    /// (sequence index or `None` for manual, item id) last announced to the host.
    announced: Option<(Option<usize>, String)>,
    started: bool,
    outputs: Outputs,
}

impl Session {
    pub fn new(
        cfg: Config,
        catalog: Catalog,
        is_first_time: Option<bool>,
    ) -> Result<Self, PlaybackError> {
        catalog.validate()?;
        let mut builder = PlaylistBuilder::new(catalog);
        let playlist = builder.playlist(is_first_time).clone();
        if playlist.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        let mut library = LibraryPanel::new();
        library.add_tracks(builder.catalog().library.iter().cloned(), &playlist);
        let intro = IntroSequencer::new(builder.catalog().intro.clone(), cfg.intro.clone());
        let session = Self {
            id: SessionId::new(),
            ambient: AmbientEngine::new(&cfg),
            flags: SessionFlags {
                is_session_paused: !cfg.autoplay,
                ..SessionFlags::default()
            },
            cfg,
            is_first_time,
            builder,
            sequencer: Sequencer::new(playlist),
            driver: MediaDriver::new(),
            intro,
            library,
            narration: NarrationGate::new(),
            announced: None,
            started: false,
            outputs: Outputs::default(),
        };
        log::debug!(
            "session {}: created with {} items (is_first_time={:?})",
            session.id,
            session.sequencer.playlist().len(),
            is_first_time
        );
        Ok(session)
    }

    /// Built-in catalog and default tuning.
    pub fn with_defaults(is_first_time: Option<bool>) -> Result<Self, PlaybackError> {
        Self::new(Config::default(), Catalog::default(), is_first_time)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn is_first_time(&self) -> Option<bool> {
        self.is_first_time
    }

    pub fn playlist(&self) -> &Playlist {
        self.sequencer.playlist()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn active_item(&self) -> Option<&PlaylistItem> {
        self.sequencer.active_item()
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    pub fn driver(&self) -> &MediaDriver {
        &self.driver
    }

    pub fn ambient(&self) -> &AmbientEngine {
        &self.ambient
    }

    pub fn intro(&self) -> &IntroSequencer {
        &self.intro
    }

    pub fn is_speaking(&self) -> bool {
        self.narration.is_speaking()
    }

    pub fn library_entries(&self) -> Vec<LibraryEntry> {
        self.library.entries(&self.sequencer)
    }

    /// Number of times the playlist has been (re)built.
    pub fn playlist_builds(&self) -> usize {
        self.builder.builds()
    }

    pub fn transport_view(&self) -> TransportView {
        let active = self.sequencer.active_item();
        let element = active.map(PlaylistItem::element).unwrap_or(Element::Video);
        let state = self.driver.element(element);
        TransportView {
            active: active.cloned(),
            is_paused: self.flags.is_session_paused,
            is_muted: self.flags.is_muted,
            muted_by_autoplay: self.flags.muted_by_autoplay,
            is_loading: active.is_some() && state.loading,
            position: state.current_time,
            duration: state.duration,
            progress: progress_ratio(state.current_time, state.duration),
            position_label: format_time(state.current_time),
            duration_label: format_time(state.duration),
            library_open: self.library.is_open(),
        }
    }

    /// Step the session by `dt` seconds with the given inputs.
    pub fn update(&mut self, dt: f64, inputs: Inputs) -> &Outputs {
        let mut out = std::mem::take(&mut self.outputs);
        out.clear();

        if !self.started {
            self.started = true;
            self.intro.start(&mut out);
        }

        for input in inputs.events {
            self.apply(input, &mut out);
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.intro.tick(dt, &mut out);
        self.ambient.follow(self.sequencer.active_item());
        if self.backdrop_visible() {
            self.ambient.tick(dt, &mut out);
        }

        self.sync(&mut out);

        self.outputs = out;
        &self.outputs
    }

    fn apply(&mut self, input: SessionInput, out: &mut Outputs) {
        match input {
            SessionInput::SelectIndex { index } => match self.sequencer.select_index(index) {
                Ok(()) => self.set_paused(false, out),
                Err(e) => log::warn!("session {}: ignoring selection: {}", self.id, e),
            },
            SessionInput::SelectTrack { track } => {
                self.sequencer.select_track(track);
                self.set_paused(false, out);
            }
            SessionInput::Next => self.advance(),
            SessionInput::Previous => {
                self.sequencer.retreat();
                self.driver.rearm();
            }
            SessionInput::TogglePause => {
                let paused = !self.flags.is_session_paused;
                self.set_paused(paused, out);
            }
            SessionInput::SetPaused { paused } => self.set_paused(paused, out),
            SessionInput::ToggleMute => {
                let muted = !self.flags.is_muted;
                self.set_muted(muted, out);
            }
            SessionInput::SetMuted { muted } => self.set_muted(muted, out),
            SessionInput::Seek { time } => {
                self.driver.seek(self.sequencer.active_item(), time, out);
            }
            SessionInput::ToggleLibrary => self.library.toggle(),
            SessionInput::SetFirstTime { is_first_time } => self.set_first_time(is_first_time),

            SessionInput::TimeUpdate {
                element,
                current_time,
                duration,
            } => {
                let active = self.sequencer.active_item();
                if self
                    .driver
                    .on_time_update(element, current_time, duration, active)
                {
                    self.advance();
                }
            }
            SessionInput::Ended { element } => {
                if element == Element::Audio {
                    self.flags.is_mantra_playing = false;
                }
                if self.driver.on_ended(element, self.sequencer.active_item()) {
                    self.advance();
                }
            }
            SessionInput::PlayFailed { element, failure } => {
                let outcome = self.driver.on_play_failed(element, failure, out);
                if outcome == FailureOutcome::MutedByAutoplay {
                    self.flags.muted_by_autoplay = true;
                    if !self.flags.is_muted {
                        self.flags.is_muted = true;
                        out.push_event(SessionEvent::MutedChanged { muted: true });
                    }
                }
            }
            SessionInput::Playing { element } => {
                self.driver.set_loading(element, false, out);
                let mantra_active =
                    matches!(self.sequencer.active_item(), Some(PlaylistItem::Mantra(_)));
                if element == Element::Audio && mantra_active {
                    self.flags.is_mantra_playing = true;
                }
            }
            SessionInput::Paused { element } => {
                if element == Element::Audio {
                    self.flags.is_mantra_playing = false;
                }
            }
            SessionInput::Waiting { element } => self.driver.set_loading(element, true, out),
            SessionInput::CanPlay { element } => self.driver.set_loading(element, false, out),
            SessionInput::MediaError {
                element,
                code,
                message,
            } => self.driver.on_media_error(element, code, message, out),

            SessionInput::MediaReady { layer, buffer } => match layer {
                SlotLayer::Ambient => {
                    self.ambient.on_ready(buffer, out);
                }
                SlotLayer::Intro => self.intro.on_ready(buffer, out),
            },
            SessionInput::SlotEnded { layer, buffer } => match layer {
                SlotLayer::Ambient => {
                    if self.backdrop_visible() {
                        self.ambient.on_ended(buffer, out);
                    }
                }
                SlotLayer::Intro => self.intro.on_video_ended(buffer, out),
            },
            SessionInput::IntroTap => self.intro.skip(out),

            SessionInput::ManifestLoaded { kind, manifest } => match kind {
                ManifestKind::Audio => {
                    let added = self
                        .library
                        .add_tracks(manifest.audio_tracks(), self.sequencer.playlist());
                    log::debug!("session {}: {} library tracks added", self.id, added);
                }
                ManifestKind::Images => self
                    .ambient
                    .extend_pool(manifest.ambient_assets(AssetKind::Image)),
                ManifestKind::Videos => self
                    .ambient
                    .extend_pool(manifest.ambient_assets(AssetKind::Video)),
            },
            SessionInput::ManifestFailed { kind, reason } => {
                log::warn!(
                    "session {}: {:?} manifest unavailable ({}); continuing without it",
                    self.id,
                    kind,
                    reason
                );
                out.push_event(SessionEvent::PoolDegraded { kind, reason });
            }

            SessionInput::SpeakRequested { text } => {
                if self.narration.cancel().is_some() {
                    out.push_command(Command::CancelSpeech);
                }
                let token = self.narration.begin();
                out.push_command(Command::Speak { token, text });
            }
            SessionInput::SpeechEnded { token } => {
                if self.narration.finish(token) {
                    out.push_event(SessionEvent::SpeechFinished { token });
                }
            }
            SessionInput::CancelSpeech => {
                if self.narration.cancel().is_some() {
                    out.push_command(Command::CancelSpeech);
                }
            }
        }
    }

    fn advance(&mut self) {
        self.sequencer.advance();
        self.driver.rearm();
    }

    /// The ambient layer only shows behind a mantra once the intro is over.
    fn backdrop_visible(&self) -> bool {
        self.intro.is_complete()
            && matches!(self.sequencer.active_item(), Some(PlaylistItem::Mantra(_)))
    }

    fn set_paused(&mut self, paused: bool, out: &mut Outputs) {
        if self.flags.is_session_paused != paused {
            self.flags.is_session_paused = paused;
            out.push_event(SessionEvent::PausedChanged { paused });
        }
    }

    fn set_muted(&mut self, muted: bool, out: &mut Outputs) {
        if !muted {
            self.flags.muted_by_autoplay = false;
        }
        self.driver.set_muted(muted, out);
        if self.flags.is_muted != muted {
            self.flags.is_muted = muted;
            out.push_event(SessionEvent::MutedChanged { muted });
        }
    }

    fn set_first_time(&mut self, is_first_time: Option<bool>) {
        if self.is_first_time == is_first_time {
            return;
        }
        self.is_first_time = is_first_time;
        let playlist = self.builder.playlist(is_first_time).clone();
        self.sequencer.replace_playlist(playlist);
    }

    fn sync(&mut self, out: &mut Outputs) {
        if !self.intro.is_complete() {
            return;
        }
        let active = self.sequencer.active_item();

        // The mantra flag outlives the switch away from a mantra until the audio
        // element has been told to stop; video waits for that.
        let mantra_active = matches!(active, Some(PlaylistItem::Mantra(_)));
        if !mantra_active && !self.driver.element(Element::Audio).wants_play {
            self.flags.is_mantra_playing = false;
        }

        let flags = DriverFlags {
            paused: self.flags.is_session_paused,
            mantra_playing: self.flags.is_mantra_playing,
            muted: self.flags.is_muted,
            speaking: self.narration.is_speaking(),
        };
        self.driver.sync(active, flags, out);

        let manual = self.sequencer.is_manual();
        let index = if manual {
            None
        } else {
            Some(self.sequencer.current_index())
        };
        let key = active.map(|item| (index, item.id().to_string()));
        if key != self.announced {
            out.push_event(SessionEvent::ActiveItemChanged {
                item: active.cloned(),
                index,
                manual,
            });
            self.announced = key;
        }
    }
}
