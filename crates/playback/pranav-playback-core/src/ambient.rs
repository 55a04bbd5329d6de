//! Ambient backdrop rotation behind mantra playback.
//!
//! Selection policy, in order:
//! - outside a peace mantra only video loops are eligible (stills join in
//!   during Agnihotra/Shanti); an all-image pool is used as-is,
//! - prefer an asset of a different type than the visible one,
//! - never repeat the visible source while anything else is eligible.
//!
//! Assets are staged into the hidden slot and only swapped in once the host
//! reports them ready, which re-arms the dwell timer.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::Config;
use crate::ids::{BufferId, SlotLayer};
use crate::item::PlaylistItem;
use crate::manifest::AmbientAsset;
use crate::outputs::{Command, Outputs, SessionEvent};
use crate::slot::{AssetKind, SlotContent, SlotPair};

/// `true` when `item` is a mantra whose English or Hindi title contains one of
/// `keywords` (case-insensitive).
pub fn is_agnihotra_mantra(item: &PlaylistItem, keywords: &[String]) -> bool {
    let PlaylistItem::Mantra(m) = item else {
        return false;
    };
    let title = m.title.to_lowercase();
    let title_hi = m.title_hi.to_lowercase();
    keywords.iter().any(|k| {
        let k = k.to_lowercase();
        !k.is_empty() && (title.contains(&k) || title_hi.contains(&k))
    })
}

#[derive(Debug)]
pub struct AmbientEngine {
    pool: Vec<AmbientAsset>,
    slots: SlotPair<SlotContent>,
    elapsed: f64,
    agnihotra: bool,
    keywords: Vec<String>,
    image_secs: f64,
    video_secs: f64,
    animations: u32,
    next_animation: u32,
    rng: StdRng,
}

impl AmbientEngine {
    pub fn new(cfg: &Config) -> Self {
        let rng = match cfg.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            pool: Vec::new(),
            slots: SlotPair::new(),
            elapsed: 0.0,
            agnihotra: false,
            keywords: cfg.agnihotra_keywords.clone(),
            image_secs: cfg.ambient_image_secs,
            video_secs: cfg.ambient_video_secs,
            animations: cfg.ambient_image_animations.max(1),
            next_animation: 0,
            rng,
        }
    }

    pub fn pool(&self) -> &[AmbientAsset] {
        &self.pool
    }

    /// Add assets, skipping sources already pooled.
    pub fn extend_pool(&mut self, assets: impl IntoIterator<Item = AmbientAsset>) {
        for asset in assets {
            if !self.pool.iter().any(|a| a.src == asset.src) {
                self.pool.push(asset);
            }
        }
        log::debug!("ambient: pool now has {} assets", self.pool.len());
    }

    pub fn slots(&self) -> &SlotPair<SlotContent> {
        &self.slots
    }

    pub fn visible(&self) -> Option<&SlotContent> {
        self.slots.visible()
    }

    pub fn is_agnihotra(&self) -> bool {
        self.agnihotra
    }

    pub fn set_agnihotra(&mut self, on: bool) {
        if self.agnihotra != on {
            log::debug!("ambient: agnihotra mode {}", on);
            self.agnihotra = on;
        }
    }

    /// Derive the mode from the active item.
    pub fn follow(&mut self, active: Option<&PlaylistItem>) {
        let on = active.is_some_and(|item| is_agnihotra_mantra(item, &self.keywords));
        self.set_agnihotra(on);
    }

    fn candidate_indices(&self) -> Vec<usize> {
        let mut allowed: Vec<usize> = (0..self.pool.len())
            .filter(|&i| self.agnihotra || self.pool[i].kind == AssetKind::Video)
            .collect();
        if allowed.is_empty() {
            allowed = (0..self.pool.len()).collect();
        }
        let Some(current) = self.slots.visible() else {
            return allowed;
        };
        let other_type: Vec<usize> = allowed
            .iter()
            .copied()
            .filter(|&i| self.pool[i].kind != current.kind)
            .collect();
        let preferred = if other_type.is_empty() {
            allowed
        } else {
            other_type
        };
        let fresh: Vec<usize> = preferred
            .iter()
            .copied()
            .filter(|&i| self.pool[i].src != current.src)
            .collect();
        if fresh.is_empty() {
            preferred
        } else {
            fresh
        }
    }

    /// Assets the next rotation may pick from.
    pub fn candidates(&self) -> Vec<&AmbientAsset> {
        self.candidate_indices()
            .into_iter()
            .map(|i| &self.pool[i])
            .collect()
    }

    pub fn pick_next(&mut self) -> Option<AmbientAsset> {
        let indices = self.candidate_indices();
        let pick = *indices.choose(&mut self.rng)?;
        Some(self.pool[pick].clone())
    }

    fn dwell_secs(&self) -> f64 {
        match self.slots.visible().map(|c| c.kind) {
            Some(AssetKind::Image) => self.image_secs,
            _ => self.video_secs,
        }
    }

    fn rotate(&mut self, out: &mut Outputs) {
        let Some(asset) = self.pick_next() else {
            return;
        };
        let animation_index = match asset.kind {
            AssetKind::Image => {
                let idx = self.next_animation % self.animations;
                self.next_animation = self.next_animation.wrapping_add(1);
                Some(idx)
            }
            AssetKind::Video => None,
        };
        let content = SlotContent {
            src: asset.src,
            kind: asset.kind,
            start: None,
            animation_index,
        };
        let buffer = self.slots.stage(content.clone());
        log::debug!("ambient: staging {} into {:?}", content.src, buffer);
        out.push_command(Command::StageSlot {
            layer: SlotLayer::Ambient,
            buffer,
            content,
        });
    }

    /// Advance the dwell timer, staging the next asset when it runs out.
    /// Nothing happens while a staged asset is still loading.
    pub fn tick(&mut self, dt: f64, out: &mut Outputs) {
        if self.pool.is_empty() || self.slots.staged().is_some() {
            return;
        }
        if self.slots.visible().is_none() {
            self.rotate(out);
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.dwell_secs() {
            self.rotate(out);
        }
    }

    /// Host signal that `buffer` can render (`canplaythrough` / `load`).
    pub fn on_ready(&mut self, buffer: BufferId, out: &mut Outputs) -> bool {
        if !self.slots.mark_ready(buffer) {
            log::warn!("ambient: ready from {:?} with nothing staged", buffer);
            return false;
        }
        let Some(shown) = self.slots.swap_if_ready() else {
            return false;
        };
        self.elapsed = 0.0;
        out.push_command(Command::ShowSlot {
            layer: SlotLayer::Ambient,
            buffer: shown,
        });
        if let Some(content) = self.slots.visible() {
            out.push_event(SessionEvent::AmbientSwapped {
                buffer: shown,
                content: content.clone(),
            });
        }
        true
    }

    /// A visible ambient video reached its end; rotate right away.
    pub fn on_ended(&mut self, buffer: BufferId, out: &mut Outputs) {
        if buffer == self.slots.active_id() && self.slots.staged().is_none() {
            self.rotate(out);
        }
    }
}
