//! End-to-end melody pipeline: lyrics file in, parsed MIDI file out.

use std::collections::HashMap;
use std::fs;

use lyric_midi_gen::compose::{compose, MelodyRequest};
use lyric_midi_gen::syllables::HeuristicEstimator;
use lyric_midi_gen::Error;
use midly::{Format, MetaMessage, MidiMessage, Smf, TrackEventKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const LYRICS: &str = "(Verse 1)
Golden fields are calling out my name
Drums are rolling underneath the summer rain
(Chorus)
Dance with me tonight beneath the open sky
";

/// (tick, key, on?) for every note event in track 0.
fn note_events(smf: &Smf) -> Vec<(u32, u8, bool)> {
    let mut tick = 0u32;
    let mut out = Vec::new();
    for ev in &smf.tracks[0] {
        tick += ev.delta.as_int();
        if let TrackEventKind::Midi { message, .. } = ev.kind {
            match message {
                MidiMessage::NoteOn { key, .. } => out.push((tick, key.as_int(), true)),
                MidiMessage::NoteOff { key, .. } => out.push((tick, key.as_int(), false)),
                _ => {}
            }
        }
    }
    out
}

#[test]
fn writes_single_track_midi_for_lyrics_file() {
    let dir = tempfile::tempdir().unwrap();
    let lyrics_path = dir.path().join("song.txt");
    fs::write(&lyrics_path, LYRICS).unwrap();
    let out_dir = dir.path().join("output_music");

    let request = MelodyRequest::new(&lyrics_path, "Pop").with_out_dir(&out_dir);
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let composition = compose(&request, &HeuristicEstimator, &mut rng).unwrap();

    assert_eq!(composition.midi.path, out_dir.join("Pop_melody.mid"));
    assert!((100..=120).contains(&composition.config.tempo));
    assert_eq!(composition.midi.emitted, composition.notes.len());
    assert_eq!(composition.midi.dropped, 0);

    let bytes = fs::read(&composition.midi.path).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.header.format, Format::SingleTrack);
    assert_eq!(smf.tracks.len(), 1);

    let tempo = smf.tracks[0].iter().find_map(|e| match e.kind {
        TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
        _ => None,
    });
    assert_eq!(tempo, Some(60_000_000 / composition.config.tempo));

    let events = note_events(&smf);
    let ons = events.iter().filter(|e| e.2).count();
    assert_eq!(ons, composition.notes.len());
    assert!(events.iter().all(|&(_, key, _)| (48..=54).contains(&key)));

    // no key is struck again while still held
    let mut held: HashMap<u8, bool> = HashMap::new();
    for (_, key, on) in events {
        let was = held.insert(key, on).unwrap_or(false);
        if on {
            assert!(!was, "key {key} re-struck while sounding");
        }
    }
}

#[test]
fn markers_are_not_sung() {
    let dir = tempfile::tempdir().unwrap();
    let lyrics_path = dir.path().join("song.txt");
    fs::write(&lyrics_path, "(Verse 1)\nla la\n(Chorus)\nla\n").unwrap();

    let request = MelodyRequest::new(&lyrics_path, "rock").with_out_dir(dir.path());
    let est = |_: &str| -> usize { 1 };
    let composition = compose(&request, &est, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();

    assert_eq!(composition.notes.len(), 3);
    assert!(composition.notes.iter().all(|n| n.label == "la-1"));
}

#[test]
fn same_seed_writes_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let lyrics_path = dir.path().join("song.txt");
    fs::write(&lyrics_path, LYRICS).unwrap();

    let run = |name: &str| {
        let request = MelodyRequest::new(&lyrics_path, "jazz")
            .with_out_dir(dir.path())
            .with_filename(name);
        let c = compose(&request, &HeuristicEstimator, &mut ChaCha8Rng::seed_from_u64(77)).unwrap();
        fs::read(c.midi.path).unwrap()
    };
    assert_eq!(run("a.mid"), run("b.mid"));
}

#[test]
fn existing_output_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let lyrics_path = dir.path().join("song.txt");
    fs::write(&lyrics_path, "hey").unwrap();
    let target = dir.path().join("blues_melody.mid");
    fs::write(&target, b"stale").unwrap();

    let request = MelodyRequest::new(&lyrics_path, "blues").with_out_dir(dir.path());
    let c = compose(&request, &HeuristicEstimator, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();

    assert!(c.config.is_fallback());
    assert_eq!(c.midi.path, target);
    assert!(Smf::parse(&fs::read(&target).unwrap()).is_ok());
}

#[test]
fn marker_only_file_halts_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let lyrics_path = dir.path().join("song.txt");
    fs::write(&lyrics_path, "(Verse 1)").unwrap();
    let out_dir = dir.path().join("out");

    let request = MelodyRequest::new(&lyrics_path, "pop").with_out_dir(&out_dir);
    let err = compose(&request, &HeuristicEstimator, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();

    assert!(matches!(err, Error::EmptyLyrics { .. }));
    assert!(!out_dir.exists());
}

#[test]
fn missing_file_halts_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    let request = MelodyRequest::new(dir.path().join("absent.txt"), "pop").with_out_dir(&out_dir);
    let err = compose(&request, &HeuristicEstimator, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();

    assert!(matches!(err, Error::ReadLyrics { .. }));
    assert!(!out_dir.exists());
}
