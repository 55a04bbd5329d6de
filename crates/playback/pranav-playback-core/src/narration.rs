//! Guided narration tokens.
//!
//! Every narration request gets a fresh [`SpeechToken`]; only the holder of
//! the current token may report completion. Starting a new narration or
//! cancelling invalidates whatever was in flight, so late `end` callbacks
//! from superseded utterances are dropped instead of resuming playback.

use crate::ids::{SpeechToken, TokenAllocator};

#[derive(Debug, Default)]
pub struct NarrationGate {
    tokens: TokenAllocator,
    current: Option<SpeechToken>,
}

impl NarrationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for a new utterance, superseding any previous one.
    pub fn begin(&mut self) -> SpeechToken {
        let token = self.tokens.alloc();
        if let Some(prev) = self.current.replace(token) {
            log::debug!("narration: {:?} superseded by {:?}", prev, token);
        }
        token
    }

    pub fn is_current(&self, token: SpeechToken) -> bool {
        self.current == Some(token)
    }

    pub fn is_speaking(&self) -> bool {
        self.current.is_some()
    }

    /// Close out `token`. Returns `false` for stale tokens.
    pub fn finish(&mut self, token: SpeechToken) -> bool {
        if !self.is_current(token) {
            log::debug!("narration: dropping stale end for {:?}", token);
            return false;
        }
        self.current = None;
        true
    }

    /// Invalidate the in-flight utterance, if any.
    pub fn cancel(&mut self) -> Option<SpeechToken> {
        self.current.take()
    }
}
