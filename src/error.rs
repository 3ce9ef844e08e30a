use std::io;

use thiserror::Error;

/// Errors that can occur while decoding a FLAC stream or writing its PCM.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream header could not be parsed as FLAC.
    #[error("unable to open FLAC stream: {0}")]
    SourceOpen(#[source] claxon::Error),
    /// A frame after the header failed to decode.
    #[error("FLAC frame decode failed: {0}")]
    SourceDecode(#[source] claxon::Error),
    /// A fill was requested after the source already reported an error.
    #[error("reader halted after an earlier decode error")]
    Halted,
    /// The stream format cannot be represented by the output sink.
    #[error("unsupported PCM format: {0}")]
    UnsupportedFormat(String),
    /// Conversion options that cannot produce any output.
    #[error("invalid conversion options: {0}")]
    InvalidOptions(String),
    /// The WAV writer rejected a sample or failed to finalize.
    #[error("WAV write failed: {0}")]
    SinkWrite(#[from] hound::Error),
    /// A wrapped I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the error came from the compressed input rather than the output side.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Error::SourceOpen(_) | Error::SourceDecode(_) | Error::Halted
        )
    }
}
