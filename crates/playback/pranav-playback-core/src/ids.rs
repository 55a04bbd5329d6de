//! Identifiers for session-level entities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier a host can use to correlate logs and outputs with one session.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One of the two alternating buffers of a slot pair.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferId {
    A,
    B,
}

impl BufferId {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            BufferId::A => BufferId::B,
            BufferId::B => BufferId::A,
        }
    }
}

/// The two primary media elements owned by the driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Video,
    Audio,
}

/// Which double-buffered layer a slot command targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotLayer {
    Ambient,
    Intro,
}

/// Token handed to a narration continuation; stale tokens are ignored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeechToken(pub u64);

/// Monotonic allocator for speech tokens.
#[derive(Default, Debug)]
pub struct TokenAllocator {
    next: u64,
}

impl TokenAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> SpeechToken {
        self.next = self.next.wrapping_add(1);
        SpeechToken(self.next)
    }
}
