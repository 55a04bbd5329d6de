//! Pranav Playback Core (host-agnostic)
//!
//! Sequencing for a guided meditation session: the fixed playlist, the
//! active-item resolver, the single video/audio element driver, the ambient
//! backdrop rotation and the one-time intro. The host feeds DOM events in as
//! [`Inputs`] and executes the [`Command`]s returned by [`Session::update`].

pub mod ambient;
pub mod catalog;
pub mod config;
pub mod driver;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod intro;
pub mod item;
pub mod manifest;
pub mod narration;
pub mod outputs;
pub mod playlist;
pub mod resolver;
pub mod session;
pub mod slot;
pub mod transport;

// Re-exports for adapters
pub use ambient::{is_agnihotra_mantra, AmbientEngine};
pub use catalog::{Catalog, GUIDANCE_ID};
pub use config::{Config, IntroTimings};
pub use driver::{DriverFlags, ElementState, FailureOutcome, MediaDriver};
pub use error::PlaybackError;
pub use ids::{BufferId, Element, SessionId, SlotLayer, SpeechToken};
pub use inputs::{Inputs, PlayFailure, SessionInput};
pub use intro::{IntroClip, IntroPhase, IntroSequencer};
pub use item::{encode_media_src, MantraItem, MediaKind, PlaylistItem, VideoItem};
pub use manifest::{parse_manifest, AmbientAsset, ManifestFile, ManifestKind, MediaManifest};
pub use narration::NarrationGate;
pub use outputs::{Command, Outputs, SessionEvent};
pub use playlist::{Playlist, PlaylistBuilder};
pub use resolver::{next_index, prev_index, Selection, Sequencer};
pub use session::{Session, SessionFlags};
pub use slot::{AssetKind, SlotContent, SlotPair};
pub use transport::{format_time, progress_ratio, LibraryAction, LibraryEntry, LibraryPanel, TransportView};
