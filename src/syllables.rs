//! Lyrics → syllable units.
//!
//! Lyrics are read from disk, stripped of structural markers such as
//! `(Verse 1)` or `(Chorus)`, split on whitespace, and every word is expanded
//! into one unit per estimated syllable.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// One sung syllable of one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyllableUnit {
    pub word: String,
    /// 0-based position within the word.
    pub index: usize,
    /// Syllables in the word (always >= 1).
    pub total: usize,
}

impl SyllableUnit {
    pub fn is_last_of_word(&self) -> bool {
        self.index + 1 == self.total
    }

    /// `word-N` with N counted from 1.
    pub fn label(&self) -> String {
        format!("{}-{}", self.word, self.index + 1)
    }
}

/// Maps a single word to a syllable count. May return 0 for tokens with
/// nothing pronounceable; [`syllabify`] clamps those to 1.
pub trait SyllableEstimator {
    fn estimate(&self, word: &str) -> usize;
}

impl<F> SyllableEstimator for F
where
    F: Fn(&str) -> usize,
{
    fn estimate(&self, word: &str) -> usize {
        self(word)
    }
}

/// Vowel-group counting with corrections for the common silent endings.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl SyllableEstimator for HeuristicEstimator {
    fn estimate(&self, word: &str) -> usize {
        let w: Vec<u8> = word
            .bytes()
            .filter(u8::is_ascii_alphabetic)
            .map(|b| b.to_ascii_lowercase())
            .collect();
        if w.is_empty() {
            return 0;
        }
        if w.len() <= 3 {
            return 1;
        }

        let is_vowel = |b: u8| matches!(b, b'a' | b'e' | b'i' | b'o' | b'u' | b'y');

        let mut count = 0usize;
        let mut prev_vowel = false;
        for &b in &w {
            let v = is_vowel(b);
            if v && !prev_vowel {
                count += 1;
            }
            prev_vowel = v;
        }

        let n = w.len();
        let last = w[n - 1];
        let before = |k: usize| w[n - 1 - k];

        if count > 1 {
            match last {
                // "love", "smile" but not "table"
                b'e' if !(before(1) == b'l' && !is_vowel(before(2))) && !is_vowel(before(1)) => {
                    count -= 1;
                }
                // "loved", "played" but not "wanted", "needed"
                b'd' if before(1) == b'e' && !matches!(before(2), b't' | b'd') && !is_vowel(before(2)) => {
                    count -= 1;
                }
                // "makes" but not "kisses", "places", "wishes"
                b's' if before(1) == b'e'
                    && !is_vowel(before(2))
                    && !matches!(before(2), b's' | b'x' | b'z' | b'c' | b'g')
                    && !(before(2) == b'h' && matches!(before(3), b'c' | b's')) =>
                {
                    count -= 1;
                }
                _ => {}
            }
        }

        count.max(1)
    }
}

fn marker_pattern() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"\(\w+\s*\d*\)").expect("marker pattern is valid"))
}

/// Removes `(Verse 1)`-style markers and trims the result.
pub fn clean_lyrics(raw: &str) -> String {
    marker_pattern().replace_all(raw, "").trim().to_string()
}

/// Reads a lyrics file as-is.
pub fn read_raw_lyrics(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::ReadLyrics {
        path: path.to_path_buf(),
        source,
    })
}

/// Cleans raw lyrics; nothing left to sing is an error attributed to `source`.
pub fn prepare_lyrics(raw: &str, source: &Path) -> Result<String> {
    let cleaned = clean_lyrics(raw);
    if cleaned.is_empty() {
        return Err(Error::EmptyLyrics {
            path: source.to_path_buf(),
        });
    }
    tracing::debug!(source = %source.display(), chars = cleaned.len(), "prepared lyrics");
    Ok(cleaned)
}

/// Reads and cleans a lyrics file. Missing files and files with nothing
/// left after cleaning are errors.
pub fn read_lyrics(path: &Path) -> Result<String> {
    prepare_lyrics(&read_raw_lyrics(path)?, path)
}

/// Expands cleaned lyrics into syllable units, in lyric order.
pub fn syllabify<E: SyllableEstimator + ?Sized>(lyrics: &str, estimator: &E) -> Vec<SyllableUnit> {
    let mut units = Vec::new();
    for word in lyrics.split_whitespace() {
        let estimated = estimator.estimate(word);
        if estimated == 0 {
            tracing::debug!(word, "estimator returned 0 syllables, counting as 1");
        }
        let total = estimated.max(1);
        units.extend((0..total).map(|index| SyllableUnit {
            word: word.to_string(),
            index,
            total,
        }));
    }
    units
}
