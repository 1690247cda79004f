//! Syllable units → note events.
//!
//! A single pass over the units. Each unit samples one pitch from the note
//! pool of the chord active at the current time. The chord advances every
//! four beats of accumulated time and the time cursor never resets.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::genre::{GenreConfig, Pitch};
use crate::syllables::SyllableUnit;

/// MIDI number of the first scale degree (octave 4 in the `degree + 12 * 4`
/// encoding).
pub const BASE_PITCH: u8 = 48;

/// Beats per chord before the progression advances.
pub const BEATS_PER_CHORD: f64 = 4.0;

pub const SHORT_BEATS: f64 = 0.5;
pub const LONG_BEATS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    pub pitch: Pitch,
    pub midi_pitch: u8,
    /// 1.0 for the last syllable of a word, 0.5 otherwise.
    pub duration: f64,
    /// Absolute start time in beats.
    pub start: f64,
    pub label: String,
    /// Chord symbol active when the note was chosen.
    pub chord: &'static str,
}

/// Assign a pitch and duration to every unit, in order.
pub fn assign_notes<R: Rng>(
    units: &[SyllableUnit],
    config: &GenreConfig,
    rng: &mut R,
) -> Vec<NoteEvent> {
    let mut notes = Vec::with_capacity(units.len());
    if config.chords.is_empty() || config.scale.is_empty() {
        return notes;
    }

    let mut chord_idx = 0usize;
    let mut time = 0.0f64;

    for unit in units {
        let chord = config.chords[chord_idx % config.chords.len()];
        let pool = config.note_pool(chord);
        let pitch = *pool.choose(rng).unwrap_or(&config.scale[0]);

        let duration = if unit.is_last_of_word() {
            LONG_BEATS
        } else {
            SHORT_BEATS
        };

        // Chord tones outside the scale take the first degree.
        let degree = config.scale_index(pitch).unwrap_or(0);
        let midi_pitch = BASE_PITCH + degree as u8;

        tracing::debug!(
            syllable = %unit.label(),
            chord,
            pitch,
            midi_pitch,
            start = time,
            duration,
            "note"
        );

        notes.push(NoteEvent {
            pitch,
            midi_pitch,
            duration,
            start: time,
            label: unit.label(),
            chord,
        });

        time += duration;
        if time >= (chord_idx + 1) as f64 * BEATS_PER_CHORD {
            chord_idx += 1;
        }
    }

    tracing::info!(notes = notes.len(), beats = time, "assigned notes");
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syllables::{syllabify, HeuristicEstimator};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config(genre: &str) -> GenreConfig {
        GenreConfig::resolve(genre, &mut ChaCha8Rng::seed_from_u64(0))
    }

    fn units(text: &str, per_word: usize) -> Vec<SyllableUnit> {
        syllabify(text, &move |_: &str| -> usize { per_word })
    }

    #[test]
    fn hello_world_scenario() {
        let est = |w: &str| -> usize { if w == "Hello" { 2 } else { 1 } };
        let units = syllabify("Hello world", &est);
        let notes = assign_notes(&units, &config("pop"), &mut ChaCha8Rng::seed_from_u64(3));

        assert_eq!(notes.len(), 3);
        let starts: Vec<f64> = notes.iter().map(|n| n.start).collect();
        let durations: Vec<f64> = notes.iter().map(|n| n.duration).collect();
        assert_eq!(starts, vec![0.0, 0.5, 1.5]);
        assert_eq!(durations, vec![0.5, 1.0, 1.0]);
        assert_eq!(notes[0].label, "Hello-1");
        assert_eq!(notes[1].label, "Hello-2");
        assert_eq!(notes[2].label, "world-1");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let notes = assign_notes(&[], &config("pop"), &mut ChaCha8Rng::seed_from_u64(3));
        assert!(notes.is_empty());
    }

    #[test]
    fn durations_follow_last_syllable_rule() {
        let units = syllabify(
            "walking under a beautiful electric evening sky",
            &HeuristicEstimator,
        );
        let notes = assign_notes(&units, &config("jazz"), &mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(notes.len(), units.len());
        for (unit, note) in units.iter().zip(&notes) {
            let expected = if unit.index == unit.total - 1 { 1.0 } else { 0.5 };
            assert_eq!(note.duration, expected, "{}", note.label);
        }
    }

    #[test]
    fn start_times_are_running_sums() {
        let units = units("one two three four five six seven eight nine ten", 3);
        let notes = assign_notes(&units, &config("rock"), &mut ChaCha8Rng::seed_from_u64(5));
        let mut acc = 0.0;
        for n in &notes {
            assert_eq!(n.start, acc);
            acc += n.duration;
        }
        assert!(notes.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn chord_advances_every_four_beats_and_wraps() {
        // one-syllable words: every note lasts a beat, four notes per chord
        let units = units(&["la"; 20].join(" "), 1);
        let cfg = config("pop");
        let notes = assign_notes(&units, &cfg, &mut ChaCha8Rng::seed_from_u64(9));

        let chords: Vec<&str> = notes.iter().map(|n| n.chord).collect();
        let expected: Vec<&str> = (0..20).map(|i| cfg.chords[(i / 4) % 4]).collect();
        assert_eq!(chords, expected);
    }

    #[test]
    fn chord_index_never_skips() {
        let units = syllabify(
            "a long and winding road that leads me to your door tonight again and again",
            &HeuristicEstimator,
        );
        let cfg = config("bhangra");
        let notes = assign_notes(&units, &cfg, &mut ChaCha8Rng::seed_from_u64(21));
        let idx: Vec<usize> = notes
            .iter()
            .map(|n| (n.start / BEATS_PER_CHORD).floor() as usize)
            .collect();
        for w in idx.windows(2) {
            assert!(w[1] == w[0] || w[1] == w[0] + 1);
        }
        for (n, i) in notes.iter().zip(&idx) {
            assert_eq!(n.chord, cfg.chords[i % cfg.chords.len()]);
        }
    }

    #[test]
    fn pitches_come_from_active_chord_pool() {
        let units = units(&["yeah"; 40].join(" "), 2);
        let cfg = config("jazz");
        let notes = assign_notes(&units, &cfg, &mut ChaCha8Rng::seed_from_u64(13));
        for n in &notes {
            assert!(cfg.note_pool(n.chord).contains(&n.pitch), "{n:?}");
        }
    }

    #[test]
    fn midi_pitch_is_scale_degree_offset() {
        for genre in ["pop", "jazz", "rock", "bhangra", "polka"] {
            let cfg = config(genre);
            let units = units(&["na"; 64].join(" "), 3);
            let notes = assign_notes(&units, &cfg, &mut ChaCha8Rng::seed_from_u64(17));
            for n in &notes {
                assert!((48..=54).contains(&n.midi_pitch), "{n:?}");
                let degree = cfg.scale_index(n.pitch).unwrap_or(0);
                assert_eq!(n.midi_pitch, BASE_PITCH + degree as u8);
            }
        }
    }

    #[test]
    fn same_seed_same_melody() {
        let units = syllabify("shine on through the rainy night", &HeuristicEstimator);
        let cfg = config("pop");
        let a = assign_notes(&units, &cfg, &mut ChaCha8Rng::seed_from_u64(42));
        let b = assign_notes(&units, &cfg, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
