//! Lyrics-driven melody generation.
//!
//! - genre.rs: genre table (tempo range, scale, chords, mood) and chord note pools
//! - syllables.rs: lyrics cleaning, syllable estimation, syllable units
//! - melody.rs: syllable units → timed note events on a four-beat chord grid
//! - midi.rs: same-pitch overlap correction and single-track SMF output
//! - compose.rs: lyrics file → MIDI file pipeline
//! - llm.rs / lyrics.rs: mood and lyrics generation through Gemini
//!
//! Every random draw goes through a caller-supplied `Rng`, so a seed fully
//! determines the output.

pub mod compose;
pub mod config;
pub mod error;
pub mod genre;
pub mod llm;
pub mod lyrics;
pub mod melody;
pub mod midi;
pub mod syllables;

pub use error::{Error, Result};
