//! Lyrics file + genre → MIDI file.

use std::path::PathBuf;

use rand::Rng;

use crate::error::Result;
use crate::genre::GenreConfig;
use crate::melody::{assign_notes, NoteEvent};
use crate::midi::{write_midi, MidiReport};
use crate::syllables::{prepare_lyrics, read_raw_lyrics, syllabify, SyllableEstimator};

#[derive(Debug, Clone)]
pub struct MelodyRequest {
    pub lyrics_path: PathBuf,
    pub genre: String,
    pub out_dir: PathBuf,
    /// Defaults to `<genre>_melody.mid`.
    pub filename: Option<String>,
}

impl MelodyRequest {
    pub fn new(lyrics_path: impl Into<PathBuf>, genre: impl Into<String>) -> Self {
        Self {
            lyrics_path: lyrics_path.into(),
            genre: genre.into(),
            out_dir: PathBuf::from(crate::config::OUTPUT_DIR),
            filename: None,
        }
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn output_filename(&self) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| default_filename(&self.genre))
    }
}

pub fn default_filename(genre: &str) -> String {
    format!("{}_melody.mid", genre.trim())
}

#[derive(Debug, Clone)]
pub struct Composition {
    pub config: GenreConfig,
    pub notes: Vec<NoteEvent>,
    pub midi: MidiReport,
}

/// Runs the whole melody pipeline. Fails before any note is computed when
/// the lyrics file is missing or has nothing to sing.
pub fn compose<R, E>(request: &MelodyRequest, estimator: &E, rng: &mut R) -> Result<Composition>
where
    R: Rng,
    E: SyllableEstimator + ?Sized,
{
    let raw = read_raw_lyrics(&request.lyrics_path)?;
    compose_text(&raw, request, estimator, rng)
}

/// Same as [`compose`] for lyrics already in memory. Markers are stripped
/// here; text with nothing left to sing fails with `EmptyLyrics` before any
/// file is written.
pub fn compose_text<R, E>(
    lyrics: &str,
    request: &MelodyRequest,
    estimator: &E,
    rng: &mut R,
) -> Result<Composition>
where
    R: Rng,
    E: SyllableEstimator + ?Sized,
{
    let lyrics = prepare_lyrics(lyrics, &request.lyrics_path)?;
    let config = GenreConfig::resolve(&request.genre, rng);
    let units = syllabify(&lyrics, estimator);
    tracing::info!(units = units.len(), "split lyrics into syllables");

    let notes = assign_notes(&units, &config, rng);
    let midi = write_midi(&notes, &config, &request.out_dir, &request.output_filename())?;

    Ok(Composition {
        config,
        notes,
        midi,
    })
}
