//! Note events → Standard MIDI File.
//!
//! Before encoding, notes are checked pitch by pitch: a note that starts
//! while another note of the same pitch is sounding is shortened to fit, or
//! dropped when nothing would remain. Output is format 0 with one
//! track on channel 0.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use crate::config::{MIDI_CHANNEL, NOTE_VELOCITY, TICKS_PER_BEAT};
use crate::error::{Error, Result};
use crate::genre::GenreConfig;
use crate::melody::NoteEvent;

/// A note that survived overlap correction, ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNote {
    pub pitch: u8,
    pub start: f64,
    pub duration: f64,
}

impl PlacedNote {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

#[derive(Debug, Clone, Default)]
pub struct Corrected {
    pub notes: Vec<PlacedNote>,
    pub shortened: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone)]
pub struct MidiReport {
    pub path: PathBuf,
    pub emitted: usize,
    pub shortened: usize,
    pub dropped: usize,
}

/// Whether a note keeps at least one tick once quantised.
fn spans_a_tick(start: f64, duration: f64) -> bool {
    beats_to_ticks(start + duration) > beats_to_ticks(start)
}

/// Same-pitch overlap check, in input order. Placed notes of one pitch never
/// overlap each other.
///
/// A note that starts while a placed note of its pitch is sounding keeps
/// `min(duration, held_end - start)` beats and the held note is cut off at
/// the new onset; if both start on the same tick the new note is dropped.
/// A note running into the onset of a later placed note of its pitch ends
/// there. Notes left without a whole tick are dropped.
pub fn resolve_overlaps(notes: &[NoteEvent]) -> Corrected {
    let mut by_pitch: HashMap<u8, Vec<usize>> = HashMap::new();
    let mut out = Corrected::default();

    for note in notes {
        let placed = by_pitch.entry(note.midi_pitch).or_default();
        let mut duration = note.duration;

        let held = placed.iter().copied().find(|&i| {
            let h = &out.notes[i];
            h.start <= note.start && note.start < h.end()
        });
        if let Some(i) = held {
            let h = &out.notes[i];
            if beats_to_ticks(h.start) == beats_to_ticks(note.start) {
                tracing::warn!(
                    pitch = note.midi_pitch,
                    start = note.start,
                    syllable = %note.label,
                    "note on an already sounding onset dropped"
                );
                out.dropped += 1;
                continue;
            }
            duration = duration.min(h.end() - note.start);
        }

        let next_onset = placed
            .iter()
            .map(|&i| out.notes[i].start)
            .filter(|&s| s > note.start)
            .fold(f64::INFINITY, f64::min);
        duration = duration.min(next_onset - note.start);

        if !spans_a_tick(note.start, duration) {
            tracing::warn!(
                pitch = note.midi_pitch,
                start = note.start,
                duration,
                syllable = %note.label,
                "zero-length note dropped"
            );
            out.dropped += 1;
            continue;
        }

        if let Some(i) = held {
            let h = &mut out.notes[i];
            h.duration = note.start - h.start;
        }
        if held.is_some() || duration < note.duration {
            tracing::warn!(
                pitch = note.midi_pitch,
                start = note.start,
                from = note.duration,
                to = duration,
                syllable = %note.label,
                "overlapping note shortened"
            );
            out.shortened += 1;
        }

        placed.push(out.notes.len());
        out.notes.push(PlacedNote {
            pitch: note.midi_pitch,
            start: note.start,
            duration,
        });
    }

    out
}

pub fn bpm_to_us_per_quarter(bpm: u32) -> u32 {
    60_000_000u32 / bpm.max(1)
}

fn beats_to_ticks(beats: f64) -> u32 {
    (beats * TICKS_PER_BEAT as f64).round().max(0.0) as u32
}

/// Ordering at identical ticks: tempo first, then note-offs, then note-ons.
/// Every note reaching the writer spans at least one tick, so a note's own
/// off never shares a tick with its on; an off and an on at the same tick
/// always belong to consecutive notes of one pitch.
fn event_order_key(kind: &TrackEventKind) -> u8 {
    match kind {
        TrackEventKind::Meta(_) => 0,
        TrackEventKind::Midi { message, .. } => match message {
            MidiMessage::NoteOff { .. } => 1,
            MidiMessage::NoteOn { .. } => 2,
            _ => 3,
        },
        TrackEventKind::SysEx(_) | TrackEventKind::Escape(_) => 4,
    }
}

/// Builds the single-track SMF: tempo at tick 0, then note on/off pairs.
pub fn build_smf(notes: &[PlacedNote], tempo_bpm: u32) -> Smf<'static> {
    let mut abs_events: Vec<(u32, TrackEventKind<'static>)> = Vec::new();

    abs_events.push((
        0,
        TrackEventKind::Meta(MetaMessage::Tempo(bpm_to_us_per_quarter(tempo_bpm).into())),
    ));

    for note in notes {
        let t0 = beats_to_ticks(note.start);
        let t1 = beats_to_ticks(note.end());
        if t1 <= t0 {
            tracing::warn!(pitch = note.pitch, start = note.start, "zero-tick note skipped");
            continue;
        }

        abs_events.push((
            t0,
            TrackEventKind::Midi {
                channel: MIDI_CHANNEL.into(),
                message: MidiMessage::NoteOn {
                    key: note.pitch.into(),
                    vel: NOTE_VELOCITY.into(),
                },
            },
        ));
        abs_events.push((
            t1,
            TrackEventKind::Midi {
                channel: MIDI_CHANNEL.into(),
                message: MidiMessage::NoteOff {
                    key: note.pitch.into(),
                    vel: 0.into(),
                },
            },
        ));
    }

    abs_events.sort_by(|(ta, ea), (tb, eb)| {
        ta.cmp(tb)
            .then_with(|| event_order_key(ea).cmp(&event_order_key(eb)))
    });

    let mut track: Vec<TrackEvent<'static>> = Vec::with_capacity(abs_events.len() + 1);
    let mut last_tick: u32 = 0;
    for (tick, kind) in abs_events {
        let delta = tick.saturating_sub(last_tick);
        last_tick = tick;
        track.push(TrackEvent {
            delta: delta.into(),
            kind,
        });
    }

    track.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    Smf {
        header: Header::new(Format::SingleTrack, Timing::Metrical(TICKS_PER_BEAT.into())),
        tracks: vec![track],
    }
}

pub fn encode_smf(smf: &Smf) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    smf.write_std(&mut buf)
        .map_err(|e| Error::MidiEncode(e.to_string()))?;
    Ok(buf)
}

/// Corrects overlaps, encodes, and writes `out_dir/filename`, creating the
/// directory when needed. An existing file is overwritten.
pub fn write_midi(
    notes: &[NoteEvent],
    config: &GenreConfig,
    out_dir: &Path,
    filename: &str,
) -> Result<MidiReport> {
    let corrected = resolve_overlaps(notes);
    let smf = build_smf(&corrected.notes, config.tempo);
    let bytes = encode_smf(&smf)?;

    let path = out_dir.join(filename);
    fs::create_dir_all(out_dir).map_err(|source| Error::WriteMidi {
        path: out_dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, &bytes).map_err(|source| Error::WriteMidi {
        path: path.clone(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        emitted = corrected.notes.len(),
        shortened = corrected.shortened,
        dropped = corrected.dropped,
        tempo = config.tempo,
        "wrote midi"
    );

    Ok(MidiReport {
        path,
        emitted: corrected.notes.len(),
        shortened: corrected.shortened,
        dropped: corrected.dropped,
    })
}
