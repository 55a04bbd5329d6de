//! Playlist construction and memoisation.
//!
//! Layout of a built playlist:
//! 1. the catalog's start sequence (guidance removed for returning visitors),
//! 2. videos and mantras zipped pairwise up to the shorter pool,
//! 3. the longer pool's leftovers in catalog order.

use hashbrown::HashMap;
use serde::Serialize;

use crate::catalog::{Catalog, GUIDANCE_ID};
use crate::item::PlaylistItem;

/// An immutable, ordered session sequence with an id index.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Playlist {
    items: Vec<PlaylistItem>,
    #[serde(skip)]
    by_id: HashMap<String, usize>,
}

impl Playlist {
    /// Build the session sequence. `is_first_time` is `None` until the visitor
    /// flag is resolved; an unknown visitor is treated as first-time.
    pub fn build(catalog: &Catalog, is_first_time: Option<bool>) -> Self {
        let mut items: Vec<PlaylistItem> = catalog
            .start_sequence
            .iter()
            .filter(|item| is_first_time != Some(false) || item.id() != GUIDANCE_ID)
            .cloned()
            .collect();

        let pairs = catalog.videos.len().min(catalog.mantras.len());
        for i in 0..pairs {
            items.push(catalog.videos[i].clone());
            items.push(catalog.mantras[i].clone());
        }
        items.extend(catalog.videos.iter().skip(pairs).cloned());
        items.extend(catalog.mantras.iter().skip(pairs).cloned());

        Self::from_items(items)
    }

    pub fn from_items(items: Vec<PlaylistItem>) -> Self {
        let mut by_id = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            by_id.entry(item.id().to_string()).or_insert(idx);
        }
        Self { items, by_id }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&PlaylistItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaylistItem> {
        self.items.iter()
    }

    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Position of `track` in the sequence, matched by id first, then by source.
    pub fn position_of(&self, track: &PlaylistItem) -> Option<usize> {
        self.index_of_id(track.id())
            .or_else(|| self.items.iter().position(|it| it.src() == track.src()))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(PlaylistItem::id).collect()
    }
}

/// Rebuilds the playlist only when the visitor flag changes, so item identity
/// stays stable for everything that matches selections back into it.
#[derive(Debug)]
pub struct PlaylistBuilder {
    catalog: Catalog,
    cached: Option<(Option<bool>, Playlist)>,
    builds: usize,
}

impl PlaylistBuilder {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            cached: None,
            builds: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn playlist(&mut self, is_first_time: Option<bool>) -> &Playlist {
        if !matches!(&self.cached, Some((key, _)) if *key == is_first_time) {
            self.cached = None;
        }
        let (_, playlist) = self.cached.get_or_insert_with(|| {
            self.builds += 1;
            log::debug!(
                "playlist: building for is_first_time={:?} (build #{})",
                is_first_time,
                self.builds
            );
            (is_first_time, Playlist::build(&self.catalog, is_first_time))
        });
        playlist
    }

    /// Number of times a playlist has actually been built.
    pub fn builds(&self) -> usize {
        self.builds
    }
}
