use thiserror::Error;

/// Errors returned by fallible playback-core operations.
///
/// Runtime media failures reported by the host are not errors; they are
/// session inputs and are handled inside [`crate::Session::update`].
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("manifest parse error: {0}")]
    ManifestParse(String),
    #[error("catalog parse error: {0}")]
    CatalogParse(String),
    #[error("config parse error: {0}")]
    ConfigParse(String),
    #[error("duplicate playlist id '{0}'")]
    DuplicateId(String),
    #[error("index {index} out of range for playlist of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("playlist is empty")]
    EmptyPlaylist,
}
