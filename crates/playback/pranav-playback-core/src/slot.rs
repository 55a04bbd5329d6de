//! Double-buffered asset slots.
//!
//! Two containers alternate: new content is always written into the hidden
//! one, and it only becomes visible after the host reports it ready. Shared by
//! the ambient backdrop and the intro clips.

use serde::{Deserialize, Serialize};

use crate::ids::BufferId;

/// Media type of a slot asset.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Video,
    Image,
}

/// What a slot holds, as sent to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotContent {
    pub src: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_index: Option<u32>,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    content: Option<T>,
    ready: bool,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            content: None,
            ready: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SlotPair<T> {
    a: Slot<T>,
    b: Slot<T>,
    active: BufferId,
    /// Hidden buffer holding staged content that has not been shown yet.
    staged: Option<BufferId>,
}

impl<T> Default for SlotPair<T> {
    fn default() -> Self {
        Self {
            a: Slot::default(),
            b: Slot::default(),
            active: BufferId::A,
            staged: None,
        }
    }
}

impl<T> SlotPair<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: BufferId) -> &Slot<T> {
        match id {
            BufferId::A => &self.a,
            BufferId::B => &self.b,
        }
    }

    fn slot_mut(&mut self, id: BufferId) -> &mut Slot<T> {
        match id {
            BufferId::A => &mut self.a,
            BufferId::B => &mut self.b,
        }
    }

    pub fn active_id(&self) -> BufferId {
        self.active
    }

    /// Content of the visible buffer.
    pub fn visible(&self) -> Option<&T> {
        self.slot(self.active).content.as_ref()
    }

    pub fn get(&self, id: BufferId) -> Option<&T> {
        self.slot(id).content.as_ref()
    }

    /// Buffer with content waiting to be shown, if any.
    pub fn staged(&self) -> Option<BufferId> {
        self.staged
    }

    pub fn staged_content(&self) -> Option<&T> {
        self.staged.and_then(|id| self.get(id))
    }

    /// Write `content` into the hidden buffer and return its id. Replaces any
    /// previously staged content.
    pub fn stage(&mut self, content: T) -> BufferId {
        let target = self.active.other();
        let slot = self.slot_mut(target);
        slot.content = Some(content);
        slot.ready = false;
        self.staged = Some(target);
        target
    }

    /// Record a ready signal. Returns `false` for buffers with nothing staged
    /// (stale or duplicate signals).
    pub fn mark_ready(&mut self, id: BufferId) -> bool {
        if self.staged != Some(id) {
            return false;
        }
        self.slot_mut(id).ready = true;
        true
    }

    pub fn is_staged_ready(&self) -> bool {
        self.staged.is_some_and(|id| self.slot(id).ready)
    }

    /// Make the staged buffer visible if it has reported ready.
    pub fn swap_if_ready(&mut self) -> Option<BufferId> {
        let id = self.staged?;
        if !self.slot(id).ready {
            return None;
        }
        self.active = id;
        self.staged = None;
        Some(id)
    }

    /// Drop both buffers.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
