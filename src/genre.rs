//! Genre lookup: tempo range, scale, chord progression and mood for each
//! known style, plus the chord-symbol → note-pool table used while a chord
//! is active.
//!
//! Both tables are closed `match`es with an explicit default arm; an unknown
//! genre or chord symbol is an expected case, never an error.

use std::ops::RangeInclusive;

use rand::Rng;

pub type Pitch = &'static str;

const MAJOR: &[Pitch] = &["C", "D", "E", "F", "G", "A", "B"];
const MIXOLYDIAN: &[Pitch] = &["C", "D", "E", "F", "G", "A", "Bb"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenreKind {
    Bhangra,
    Pop,
    Jazz,
    Rock,
    Generic,
}

impl GenreKind {
    /// Case-insensitive; anything unrecognised is `Generic`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "bhangra" => GenreKind::Bhangra,
            "pop" => GenreKind::Pop,
            "jazz" => GenreKind::Jazz,
            "rock" => GenreKind::Rock,
            _ => GenreKind::Generic,
        }
    }

    pub fn profile(self) -> &'static GenreProfile {
        match self {
            GenreKind::Bhangra => &BHANGRA,
            GenreKind::Pop => &POP,
            GenreKind::Jazz => &JAZZ,
            GenreKind::Rock => &ROCK,
            GenreKind::Generic => &GENERIC,
        }
    }
}

/// Static description of a genre. The concrete tempo is drawn from
/// `tempo_range` when a [`GenreConfig`] is resolved.
#[derive(Debug)]
pub struct GenreProfile {
    pub tempo_range: RangeInclusive<u32>,
    pub scale: &'static [Pitch],
    pub chords: &'static [&'static str],
    pub mood: &'static str,
    pub instruments: &'static str,
}

static BHANGRA: GenreProfile = GenreProfile {
    tempo_range: 130..=150,
    scale: MAJOR,
    chords: &["C", "F", "G", "Am"],
    mood: "dance",
    instruments: "dhol, tumbi, synth",
};

static POP: GenreProfile = GenreProfile {
    tempo_range: 100..=120,
    scale: MAJOR,
    chords: &["C", "G", "Am", "F"],
    mood: "upbeat",
    instruments: "guitar, drums, synth",
};

static JAZZ: GenreProfile = GenreProfile {
    tempo_range: 90..=110,
    scale: MIXOLYDIAN,
    chords: &["Cmaj7", "Am7", "Dm7", "G7"],
    mood: "smooth",
    instruments: "piano, saxophone, double bass",
};

// Power chords over C D E F G A Bb: every chord tone has a degree, F5's F
// included (degree 3, not the fallback 0).
static ROCK: GenreProfile = GenreProfile {
    tempo_range: 120..=140,
    scale: MIXOLYDIAN,
    chords: &["C5", "G5", "A5", "F5"],
    mood: "energetic",
    instruments: "electric guitar, bass, drums",
};

static GENERIC: GenreProfile = GenreProfile {
    tempo_range: 100..=120,
    scale: MAJOR,
    chords: &["C", "G", "Am", "F"],
    mood: "generic",
    instruments: "piano, drums, bass",
};

/// A genre resolved for one run, with its tempo fixed.
#[derive(Debug, Clone)]
pub struct GenreConfig {
    /// The name as the caller supplied it.
    pub name: String,
    pub kind: GenreKind,
    pub tempo: u32,
    pub scale: &'static [Pitch],
    pub chords: &'static [&'static str],
    pub mood: &'static str,
    pub instruments: &'static str,
}

impl GenreConfig {
    /// Look up `name` and pick a tempo uniformly from the genre's BPM range.
    pub fn resolve<R: Rng>(name: &str, rng: &mut R) -> Self {
        let kind = GenreKind::from_name(name);
        let profile = kind.profile();
        let tempo = rng.gen_range(profile.tempo_range.clone());

        if kind == GenreKind::Generic {
            tracing::warn!(genre = %name, "unknown genre, using generic configuration");
        }
        tracing::info!(
            genre = %name,
            ?kind,
            tempo,
            mood = profile.mood,
            instruments = profile.instruments,
            "resolved genre"
        );

        Self {
            name: name.trim().to_string(),
            kind,
            tempo,
            scale: profile.scale,
            chords: profile.chords,
            mood: profile.mood,
            instruments: profile.instruments,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.kind == GenreKind::Generic
    }

    /// Position of `pitch` within the scale.
    pub fn scale_index(&self, pitch: &str) -> Option<usize> {
        self.scale.iter().position(|p| *p == pitch)
    }

    /// Notes that may be sampled while `chord` is active.
    pub fn note_pool(&self, chord: &str) -> &'static [Pitch] {
        match ChordPool::lookup(chord) {
            ChordPool::Tones(tones) => tones,
            ChordPool::FullScale => self.scale,
        }
    }
}

/// Sampling domain for a chord symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordPool {
    Tones(&'static [Pitch]),
    /// The genre's whole scale: used for `C` and for unmapped symbols.
    FullScale,
}

impl ChordPool {
    pub fn lookup(chord: &str) -> Self {
        let tones: &'static [Pitch] = match chord {
            "Cmaj7" => &["C", "E", "G", "B"],
            "Am7" => &["A", "C", "E", "G"],
            "Fmaj7" => &["F", "A", "C", "E"],
            "G7" => &["G", "B", "D", "F"],
            "Dm7" => &["D", "F", "A", "C"],
            "G" => &["G", "B", "D"],
            "Am" => &["A", "C", "E"],
            "F" => &["F", "A", "C"],
            "G5" => &["G", "D"],
            "D5" => &["D", "A"],
            "A5" => &["A", "E"],
            "C5" => &["C", "G"],
            "F5" => &["F", "C"],
            "Cm" => &["C", "Eb", "G"],
            "Ab" => &["Ab", "C", "Eb"],
            "Fm" => &["F", "Ab", "C"],
            _ => return ChordPool::FullScale,
        };
        ChordPool::Tones(tones)
    }
}
