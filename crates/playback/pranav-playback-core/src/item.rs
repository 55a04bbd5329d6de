//! Typed playlist items.
//!
//! Items are a tagged union on `type` so video-only fields (`startTime`,
//! `trimEnd`) only exist on [`VideoItem`]. The serde shape matches what the
//! web host already exchanges: `{ "type": "video", "id": ..., "titleHi": ... }`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::ids::Element;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlaylistItem {
    Video(VideoItem),
    Mantra(MantraItem),
}

/// A darshan video segment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub src: String,
    pub title: String,
    #[serde(default)]
    pub title_hi: String,
    /// Seconds to seek to once the source is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    /// Seconds before the natural end at which the session moves on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_end: Option<f64>,
}

/// An audio mantra.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MantraItem {
    pub id: String,
    pub src: String,
    pub title: String,
    #[serde(default)]
    pub title_hi: String,
}

/// Media type of a playlist item.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Mantra,
}

impl PlaylistItem {
    pub fn video(id: &str, src: &str, title: &str, title_hi: &str) -> Self {
        PlaylistItem::Video(VideoItem {
            id: id.to_string(),
            src: src.to_string(),
            title: title.to_string(),
            title_hi: title_hi.to_string(),
            start_time: None,
            trim_end: None,
        })
    }

    pub fn mantra(id: &str, src: &str, title: &str, title_hi: &str) -> Self {
        PlaylistItem::Mantra(MantraItem {
            id: id.to_string(),
            src: src.to_string(),
            title: title.to_string(),
            title_hi: title_hi.to_string(),
        })
    }

    /// Set the load-time seek of a video. No-op on mantras.
    pub fn with_start_time(mut self, secs: f64) -> Self {
        if let PlaylistItem::Video(v) = &mut self {
            v.start_time = Some(secs);
        }
        self
    }

    /// Set the early-advance margin of a video. No-op on mantras.
    pub fn with_trim_end(mut self, secs: f64) -> Self {
        if let PlaylistItem::Video(v) = &mut self {
            v.trim_end = Some(secs);
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            PlaylistItem::Video(v) => &v.id,
            PlaylistItem::Mantra(m) => &m.id,
        }
    }

    pub fn src(&self) -> &str {
        match self {
            PlaylistItem::Video(v) => &v.src,
            PlaylistItem::Mantra(m) => &m.src,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            PlaylistItem::Video(v) => &v.title,
            PlaylistItem::Mantra(m) => &m.title,
        }
    }

    pub fn title_hi(&self) -> &str {
        match self {
            PlaylistItem::Video(v) => &v.title_hi,
            PlaylistItem::Mantra(m) => &m.title_hi,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            PlaylistItem::Video(_) => MediaKind::Video,
            PlaylistItem::Mantra(_) => MediaKind::Mantra,
        }
    }

    /// The primary element that renders this item.
    pub fn element(&self) -> Element {
        match self {
            PlaylistItem::Video(_) => Element::Video,
            PlaylistItem::Mantra(_) => Element::Audio,
        }
    }

    pub fn start_time(&self) -> Option<f64> {
        match self {
            PlaylistItem::Video(v) => v.start_time,
            PlaylistItem::Mantra(_) => None,
        }
    }

    /// Same item by id, or by source when ids differ (library entries built
    /// from a manifest carry their own ids).
    pub fn same_media(&self, other: &PlaylistItem) -> bool {
        self.id() == other.id() || self.src() == other.src()
    }
}

/// Percent-encode a media source the way the browser reports `element.src`
/// (`encodeURI` semantics). Existing `%XX` escapes are kept as-is so an
/// already-encoded path is not encoded twice.
pub fn encode_media_src(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(at) = find_escape(rest) {
        out.extend(utf8_percent_encode(&rest[..at], ENCODE_URI));
        out.push_str(&rest[at..at + 3]);
        rest = &rest[at + 3..];
    }
    out.extend(utf8_percent_encode(rest, ENCODE_URI));
    out
}

/// Everything `encodeURI` escapes: all but alphanumerics and the URI marks.
const ENCODE_URI: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Byte offset of the first well-formed `%XX` escape.
fn find_escape(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    (0..bytes.len()).find(|&i| {
        bytes[i] == b'%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
    })
}
