//! Media manifest ingestion.
//!
//! The site exposes directory listings as `{ "files": [{ "name", "path" }] }`.
//! Audio listings become library-only mantra tracks; image and video listings
//! become ambient backdrop assets. Entries with an unexpected extension are
//! dropped.

use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;
use crate::item::PlaylistItem;
use crate::slot::AssetKind;

const AUDIO_EXTS: &[&str] = &["mp3", "m4a", "ogg", "wav", "aac"];
const IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];
const VIDEO_EXTS: &[&str] = &["mp4", "webm", "mov", "m4v"];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    Audio,
    Images,
    Videos,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaManifest {
    #[serde(default)]
    pub files: Vec<ManifestFile>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub name: String,
    pub path: String,
}

/// A decorative backdrop asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmbientAsset {
    pub src: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
}

impl AmbientAsset {
    pub fn video(src: &str) -> Self {
        Self {
            src: src.to_string(),
            kind: AssetKind::Video,
        }
    }

    pub fn image(src: &str) -> Self {
        Self {
            src: src.to_string(),
            kind: AssetKind::Image,
        }
    }
}

pub fn parse_manifest(json: &str) -> Result<MediaManifest, PlaybackError> {
    serde_json::from_str(json).map_err(|e| PlaybackError::ManifestParse(e.to_string()))
}

impl MediaManifest {
    fn files_with_ext(
        &self,
        exts: &'static [&'static str],
    ) -> impl Iterator<Item = &ManifestFile> {
        self.files.iter().filter(move |f| {
            let ok = extension(&f.name).is_some_and(|e| exts.contains(&e.as_str()));
            if !ok {
                log::debug!("manifest: skipping '{}'", f.name);
            }
            ok
        })
    }

    /// Library tracks from an audio listing.
    pub fn audio_tracks(&self) -> Vec<PlaylistItem> {
        self.files_with_ext(AUDIO_EXTS)
            .map(|f| {
                let id = format!("lib_{}", slug(stem(&f.name)));
                PlaylistItem::mantra(&id, &f.path, &humanize(stem(&f.name)), "")
            })
            .collect()
    }

    /// Backdrop assets from an image or video listing.
    pub fn ambient_assets(&self, kind: AssetKind) -> Vec<AmbientAsset> {
        let exts = match kind {
            AssetKind::Image => IMAGE_EXTS,
            AssetKind::Video => VIDEO_EXTS,
        };
        self.files_with_ext(exts)
            .map(|f| AmbientAsset {
                src: f.path.clone(),
                kind,
            })
            .collect()
    }
}

fn extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

fn stem(name: &str) -> &str {
    name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name)
}

fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// "om-namah_shivaya" -> "Om Namah Shivaya"
fn humanize(s: &str) -> String {
    s.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_humanised_and_slugged() {
        assert_eq!(humanize("om-namah_shivaya"), "Om Namah Shivaya");
        assert_eq!(slug("Om Namah  Shivaya!"), "om_namah_shivaya");
        assert_eq!(stem("a.b.mp3"), "a.b");
    }
}
