//! One-time intro: short clips with timed text overlays, played before the
//! main session.
//!
//! `Playing(clip) -> FadingOut -> Complete`. A clip hands over to the next one
//! only after its video has ended *and* its text timeline is done. A tap jumps
//! straight to `FadingOut`. Clips use the same hidden/visible slot pair as the
//! ambient backdrop, so the next clip is preloaded while the current one plays.

use serde::{Deserialize, Serialize};

use crate::config::IntroTimings;
use crate::ids::{BufferId, SlotLayer};
use crate::outputs::{Command, Outputs, SessionEvent};
use crate::slot::{AssetKind, SlotContent, SlotPair};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntroClip {
    pub src: String,
    /// Overlay lines shown in order over this clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
}

impl IntroClip {
    fn segments(&self) -> &[String] {
        self.text.as_deref().unwrap_or(&[])
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IntroPhase {
    Playing { clip: usize },
    FadingOut,
    Complete,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum TextStage {
    Showing { segment: usize, remaining: f64 },
    Fading { segment: usize, remaining: f64 },
    Gap { next: usize, remaining: f64 },
    Done,
}

#[derive(Debug)]
pub struct IntroSequencer {
    clips: Vec<IntroClip>,
    timings: IntroTimings,
    phase: IntroPhase,
    slots: SlotPair<usize>,
    /// Waiting for the staged clip to become ready before showing it.
    awaiting_swap: bool,
    shown: Option<usize>,
    video_ended: bool,
    text_done: bool,
    text: TextStage,
    fade_remaining: f64,
    skipped: bool,
}

impl IntroSequencer {
    pub fn new(clips: Vec<IntroClip>, timings: IntroTimings) -> Self {
        let phase = if clips.is_empty() {
            IntroPhase::Complete
        } else {
            IntroPhase::Playing { clip: 0 }
        };
        Self {
            clips,
            timings,
            phase,
            slots: SlotPair::new(),
            awaiting_swap: false,
            shown: None,
            video_ended: false,
            text_done: false,
            text: TextStage::Done,
            fade_remaining: 0.0,
            skipped: false,
        }
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == IntroPhase::Complete
    }

    /// Clip currently on screen.
    pub fn current_clip(&self) -> Option<usize> {
        self.shown
    }

    pub fn text_done(&self) -> bool {
        self.text_done
    }

    pub fn video_ended(&self) -> bool {
        self.video_ended
    }

    pub fn clips(&self) -> &[IntroClip] {
        &self.clips
    }

    /// Stage the first clip. No-op once started or when there is nothing to play.
    pub fn start(&mut self, out: &mut Outputs) {
        if self.is_complete() || self.shown.is_some() || self.awaiting_swap {
            return;
        }
        self.stage_clip(0, out);
        self.awaiting_swap = true;
    }

    fn stage_clip(&mut self, clip: usize, out: &mut Outputs) {
        let Some(src) = self.clips.get(clip).map(|c| c.src.clone()) else {
            return;
        };
        let buffer = self.slots.stage(clip);
        out.push_command(Command::StageSlot {
            layer: SlotLayer::Intro,
            buffer,
            content: SlotContent {
                src,
                kind: AssetKind::Video,
                start: None,
                animation_index: None,
            },
        });
    }

    fn segment_secs(&self, clip: usize, segment: usize) -> f64 {
        if clip == 0 && segment == 0 {
            self.timings.first_segment_secs
        } else {
            self.timings.segment_secs
        }
    }

    fn show_visible_clip(&mut self, out: &mut Outputs) {
        let Some(&clip) = self.slots.visible() else {
            return;
        };
        log::debug!("intro: showing clip {}", clip);
        self.phase = IntroPhase::Playing { clip };
        self.shown = Some(clip);
        self.video_ended = false;
        out.push_command(Command::ShowSlot {
            layer: SlotLayer::Intro,
            buffer: self.slots.active_id(),
        });
        out.push_event(SessionEvent::IntroClipChanged { clip });

        let first = self.clips[clip].segments().first().cloned();
        match first {
            Some(text) => {
                self.text_done = false;
                self.text = TextStage::Showing {
                    segment: 0,
                    remaining: self.segment_secs(clip, 0),
                };
                out.push_command(Command::ShowIntroText { segment: 0, text });
            }
            None => {
                self.text_done = true;
                self.text = TextStage::Done;
            }
        }

        if clip + 1 < self.clips.len() {
            self.stage_clip(clip + 1, out);
        }
    }

    /// Host signal that an intro buffer can play through.
    pub fn on_ready(&mut self, buffer: BufferId, out: &mut Outputs) {
        if !self.slots.mark_ready(buffer) {
            log::warn!("intro: ready from {:?} with nothing staged", buffer);
            return;
        }
        if self.awaiting_swap && self.slots.swap_if_ready().is_some() {
            self.awaiting_swap = false;
            self.show_visible_clip(out);
        }
    }

    /// The visible clip's video finished.
    pub fn on_video_ended(&mut self, buffer: BufferId, out: &mut Outputs) {
        if self.shown.is_none() || buffer != self.slots.active_id() {
            return;
        }
        if matches!(self.phase, IntroPhase::Playing { .. }) {
            self.video_ended = true;
            self.try_advance(out);
        }
    }

    /// User tap: abandon the rest of the intro.
    pub fn skip(&mut self, out: &mut Outputs) {
        if !matches!(self.phase, IntroPhase::Playing { .. }) {
            return;
        }
        log::debug!("intro: skipped");
        if matches!(self.text, TextStage::Showing { .. }) {
            out.push_command(Command::HideIntroText);
        }
        self.text = TextStage::Done;
        self.awaiting_swap = false;
        self.skipped = true;
        self.begin_fade_out(out);
    }

    pub fn tick(&mut self, dt: f64, out: &mut Outputs) {
        match self.phase {
            IntroPhase::Playing { .. } if self.shown.is_some() => self.step_text(dt, out),
            IntroPhase::FadingOut => {
                self.fade_remaining -= dt;
                if self.fade_remaining <= 0.0 {
                    self.complete(out);
                }
            }
            _ => {}
        }
    }

    fn step_text(&mut self, dt: f64, out: &mut Outputs) {
        let Some(clip) = self.shown else {
            return;
        };
        let mut dt = dt;
        while dt > 0.0 {
            match self.text {
                TextStage::Showing { segment, remaining } => {
                    if remaining > dt {
                        self.text = TextStage::Showing {
                            segment,
                            remaining: remaining - dt,
                        };
                        return;
                    }
                    dt -= remaining;
                    out.push_command(Command::HideIntroText);
                    self.text = TextStage::Fading {
                        segment,
                        remaining: self.timings.text_fade_secs,
                    };
                }
                TextStage::Fading { segment, remaining } => {
                    if remaining > dt {
                        self.text = TextStage::Fading {
                            segment,
                            remaining: remaining - dt,
                        };
                        return;
                    }
                    dt -= remaining;
                    if segment + 1 < self.clips[clip].segments().len() {
                        self.text = TextStage::Gap {
                            next: segment + 1,
                            remaining: self.timings.segment_gap_secs,
                        };
                    } else {
                        self.text = TextStage::Done;
                        self.text_done = true;
                        self.try_advance(out);
                        return;
                    }
                }
                TextStage::Gap { next, remaining } => {
                    if remaining > dt {
                        self.text = TextStage::Gap {
                            next,
                            remaining: remaining - dt,
                        };
                        return;
                    }
                    dt -= remaining;
                    let text = self.clips[clip].segments()[next].clone();
                    out.push_command(Command::ShowIntroText {
                        segment: next,
                        text,
                    });
                    self.text = TextStage::Showing {
                        segment: next,
                        remaining: self.segment_secs(clip, next),
                    };
                }
                TextStage::Done => return,
            }
        }
    }

    fn try_advance(&mut self, out: &mut Outputs) {
        let IntroPhase::Playing { clip } = self.phase else {
            return;
        };
        if !(self.video_ended && self.text_done) {
            return;
        }
        if clip + 1 < self.clips.len() {
            self.awaiting_swap = true;
            if self.slots.swap_if_ready().is_some() {
                self.awaiting_swap = false;
                self.show_visible_clip(out);
            } else {
                log::debug!("intro: clip {} finished, waiting on clip {}", clip, clip + 1);
            }
        } else {
            self.begin_fade_out(out);
        }
    }

    fn begin_fade_out(&mut self, out: &mut Outputs) {
        self.phase = IntroPhase::FadingOut;
        self.fade_remaining = self.timings.fade_out_secs;
        out.push_command(Command::FadeOutIntro {
            secs: self.timings.fade_out_secs,
        });
        if self.fade_remaining <= 0.0 {
            self.complete(out);
        }
    }

    fn complete(&mut self, out: &mut Outputs) {
        log::debug!("intro: complete (skipped={})", self.skipped);
        self.phase = IntroPhase::Complete;
        out.push_event(SessionEvent::IntroCompleted {
            skipped: self.skipped,
        });
    }
}
