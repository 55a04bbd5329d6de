//! Built-in media catalog for the meditation session.
//!
//! A [`Catalog`] is the raw material the playlist builder works from: the
//! fixed opening block, the video and mantra pools that get interleaved, the
//! library-only tracks, and the intro script. Hosts may ship their own catalog
//! as JSON; [`Catalog::default`] is the one the page ships with.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;
use crate::intro::IntroClip;
use crate::item::PlaylistItem;

/// Id of the first-visit greeting that opens the start sequence.
pub const GUIDANCE_ID: &str = "guidance";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Opening block, played in order before the interleaved pools.
    pub start_sequence: Vec<PlaylistItem>,
    /// Darshan pool for the alternating section.
    pub videos: Vec<PlaylistItem>,
    /// Mantra pool for the alternating section.
    pub mantras: Vec<PlaylistItem>,
    /// Tracks offered in the library panel but not part of the sequence.
    #[serde(default)]
    pub library: Vec<PlaylistItem>,
    #[serde(default)]
    pub intro: Vec<IntroClip>,
}

impl Catalog {
    pub fn from_json(s: &str) -> Result<Self, PlaybackError> {
        let catalog: Catalog =
            serde_json::from_str(s).map_err(|e| PlaybackError::CatalogParse(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Ids must be unique across everything that can end up in one playlist.
    pub fn validate(&self) -> Result<(), PlaybackError> {
        let mut seen = HashSet::new();
        for item in self
            .start_sequence
            .iter()
            .chain(self.videos.iter())
            .chain(self.mantras.iter())
        {
            if !seen.insert(item.id()) {
                return Err(PlaybackError::DuplicateId(item.id().to_string()));
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let start_sequence = vec![
            PlaylistItem::mantra(
                GUIDANCE_ID,
                "/audio/guidance.mp3",
                "Guidance",
                "मार्गदर्शन",
            ),
            PlaylistItem::mantra(
                "sahana",
                "/audio/sahana-vavatu.mp3",
                "Sahana Vavatu",
                "सह नाववतु",
            ),
            PlaylistItem::mantra(
                "lalitha",
                "/audio/lalitha-sahasranamam.mp3",
                "Lalitha Sahasranamam",
                "ललिता सहस्रनाम",
            ),
            PlaylistItem::mantra(
                "shivatandava",
                "/audio/shiva-tandava-stotram.mp3",
                "Shiva Tandava Stotram",
                "शिव ताण्डव स्तोत्रम्",
            ),
            PlaylistItem::video(
                "v_vishesh",
                "/videos/darshan/vishesh-darshan.mp4",
                "Vishesh Darshan",
                "विशेष दर्शन",
            )
            .with_trim_end(4.0),
            PlaylistItem::mantra(
                "shanti_path",
                "/audio/shanti-path.mp3",
                "Shanti Path",
                "शांति पाठ",
            ),
        ];

        let videos = vec![
            PlaylistItem::video(
                "v_kashi",
                "/videos/darshan/kashi-vishwanath-aarti.mp4",
                "Kashi Vishwanath Aarti",
                "काशी विश्वनाथ आरती",
            ),
            PlaylistItem::video(
                "v_ganga",
                "/videos/darshan/ganga-aarti.mp4",
                "Ganga Aarti",
                "गंगा आरती",
            )
            .with_trim_end(6.0),
            PlaylistItem::video(
                "v_kedarnath",
                "/videos/darshan/kedarnath.mp4",
                "Kedarnath Darshan",
                "केदारनाथ दर्शन",
            ),
            PlaylistItem::video(
                "v_mahakal",
                "/videos/darshan/mahakal-bhasma-aarti.mp4",
                "Mahakal Bhasma Aarti",
                "महाकाल भस्म आरती",
            )
            .with_start_time(12.0),
            PlaylistItem::video(
                "v_somnath",
                "/videos/darshan/somnath.mp4",
                "Somnath Darshan",
                "सोमनाथ दर्शन",
            ),
            PlaylistItem::video(
                "v_tirupati",
                "/videos/darshan/tirupati-balaji.mp4",
                "Tirupati Balaji",
                "तिरुपति बालाजी",
            )
            .with_trim_end(5.0),
            PlaylistItem::video(
                "v_agnihotra",
                "/videos/darshan/agnihotra-havan.mp4",
                "Agnihotra Havan",
                "अग्निहोत्र हवन",
            ),
            PlaylistItem::video(
                "v_himalaya",
                "/videos/darshan/himalayan-dawn.mp4",
                "Himalayan Dawn",
                "हिमालय प्रभात",
            ),
        ];

        let mantras = vec![
            PlaylistItem::mantra(
                "m_gayatri",
                "/audio/gayatri-mantra.mp3",
                "Gayatri Mantra",
                "गायत्री मंत्र",
            ),
            PlaylistItem::mantra(
                "m_mahamrityunjaya",
                "/audio/mahamrityunjaya.mp3",
                "Mahamrityunjaya Mantra",
                "महामृत्युंजय मंत्र",
            ),
            PlaylistItem::mantra(
                "m_omkar",
                "/audio/om-chanting.mp3",
                "Om Chanting",
                "ॐ जाप",
            ),
            PlaylistItem::mantra(
                "m_agnihotra",
                "/audio/agnihotra-mantra.mp3",
                "Agnihotra Mantra",
                "अग्निहोत्र मंत्र",
            ),
            PlaylistItem::mantra(
                "m_hanuman",
                "/audio/hanuman-chalisa.mp3",
                "Hanuman Chalisa",
                "हनुमान चालीसा",
            ),
            PlaylistItem::mantra(
                "m_vishnu",
                "/audio/vishnu-sahasranama.mp3",
                "Vishnu Sahasranama",
                "विष्णु सहस्रनाम",
            ),
            PlaylistItem::mantra(
                "m_durga",
                "/audio/durga-stuti.mp3",
                "Durga Stuti",
                "दुर्गा स्तुति",
            ),
        ];

        let library = vec![
            PlaylistItem::mantra(
                "lib_rudrashtakam",
                "/audio/library/rudrashtakam.mp3",
                "Rudrashtakam",
                "रुद्राष्टकम्",
            ),
            PlaylistItem::mantra(
                "lib_shanti_mantra",
                "/audio/library/om-sarve-bhavantu.mp3",
                "Sarve Bhavantu Shanti Mantra",
                "सर्वे भवन्तु शांति मंत्र",
            ),
        ];

        let intro = vec![
            IntroClip {
                src: "/videos/intro/flash-1.mp4".to_string(),
                text: Some(vec![
                    "Welcome to Dhyan Kshetra".to_string(),
                    "Let the breath settle".to_string(),
                ]),
            },
            IntroClip {
                src: "/videos/intro/flash-2.mp4".to_string(),
                text: Some(vec!["Every mantra is a doorway".to_string()]),
            },
            IntroClip {
                src: "/videos/intro/flash-3.mp4".to_string(),
                text: None,
            },
        ];

        Self {
            start_sequence,
            videos,
            mantras,
            library,
            intro,
        }
    }
}
