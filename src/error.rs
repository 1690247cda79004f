use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Lyrics file missing or unreadable
    #[error("cannot read lyrics file {path}: {source}")]
    ReadLyrics {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing left to sing once structural markers are stripped
    #[error("lyrics file {path} is empty after cleaning")]
    EmptyLyrics { path: PathBuf },

    #[error("cannot write MIDI file {path}: {source}")]
    WriteMidi {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("midi encode error: {0}")]
    MidiEncode(String),

    #[error("cannot save lyrics to {path}: {source}")]
    WriteLyrics {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the model service
    #[error("model service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model service returned no text")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, Error>;
