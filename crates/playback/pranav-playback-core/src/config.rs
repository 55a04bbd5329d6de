//! Core configuration for pranav-playback-core.

use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

/// Session tuning. Every field has a default so hosts can pass a partial object.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds an ambient still image stays visible before rotating.
    pub ambient_image_secs: f64,
    /// Seconds an ambient video loop stays visible before rotating.
    pub ambient_video_secs: f64,
    /// Number of image motion presets the host cycles through.
    pub ambient_image_animations: u32,

    /// Intro text timing.
    pub intro: IntroTimings,

    /// Title keywords (matched case-insensitively) that mark a peace mantra,
    /// during which ambient stills are allowed alongside video loops.
    pub agnihotra_keywords: Vec<String>,

    /// Start playing as soon as the intro finishes.
    pub autoplay: bool,

    /// Fixed seed for ambient selection. `None` draws from entropy.
    pub rng_seed: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroTimings {
    pub first_segment_secs: f64,
    pub segment_secs: f64,
    pub text_fade_secs: f64,
    pub segment_gap_secs: f64,
    /// Duration of the whole-overlay fade once the intro is finished or skipped.
    pub fade_out_secs: f64,
}

impl Default for IntroTimings {
    fn default() -> Self {
        Self {
            first_segment_secs: 7.0,
            segment_secs: 5.0,
            text_fade_secs: 0.8,
            segment_gap_secs: 1.5,
            fade_out_secs: 1.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ambient_image_secs: 3.0,
            ambient_video_secs: 30.0,
            ambient_image_animations: 4,
            intro: IntroTimings::default(),
            agnihotra_keywords: [
                "agnihotra",
                "shanti",
                "shanthi",
                "shantih",
                "अग्निहोत्र",
                "शांति",
                "शान्ति",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            autoplay: true,
            rng_seed: None,
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self, PlaybackError> {
        serde_json::from_str(s).map_err(|e| PlaybackError::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{ "ambient_video_secs": 12.5, "rng_seed": 7 }"#).unwrap();
        assert_eq!(cfg.ambient_video_secs, 12.5);
        assert_eq!(cfg.ambient_image_secs, 3.0);
        assert_eq!(cfg.intro.first_segment_secs, 7.0);
        assert_eq!(cfg.rng_seed, Some(7));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            Config::from_json("{ nope"),
            Err(PlaybackError::ConfigParse(_))
        ));
    }
}
