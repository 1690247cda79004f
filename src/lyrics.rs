//! Genre + keywords → mood label → song lyrics.
//!
//! Two sequential prompts against a [`TextGenerator`]. The lyrics can be
//! saved to disk and later fed to the melody pipeline by hand.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::llm::TextGenerator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongDraft {
    pub mood: String,
    pub lyrics: String,
}

pub fn mood_prompt(genre: &str, keywords: &str) -> String {
    format!(
        r#"You are an expert in music and emotions.

Song genre: "{genre}"
Keywords: "{keywords}"

Predict the emotion or mood a listener would most associate with this song.
Consider how the genre and the keywords shape the listener's feelings.
Reply with the single best mood name only, nothing else."#
    )
}

pub fn lyrics_prompt(genre: &str, mood: &str, keywords: &str) -> String {
    format!(
        r#"Song genre: {genre}
Mood: {mood}
Themes and keywords: {keywords}

Write original song lyrics following these rules.

1. Structure, with each section labelled in parentheses:
   (Verse 1), (Chorus), (Verse 2), (Bridge), (Chorus), (Outro)
2. Emotional tone must match the mood "{mood}":
   joyful lyrics are uplifting and energetic, melancholic lyrics are poetic
   and deep, romantic lyrics are intimate and heartfelt.
3. Use a natural rhyme scheme (AABB, ABAB or free verse, as suits the genre)
   and vivid imagery and metaphor.
4. Work the keywords "{keywords}" in naturally and make them central to the
   song's theme.
5. It should read like a real song that could be performed; avoid generic
   phrases.

Reply with the lyrics only."#
    )
}

/// First word of the first non-empty line, without markdown or punctuation.
pub fn normalize_mood(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let word = line
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-'))
        .find(|w| !w.is_empty())?;
    Some(word.to_string())
}

/// Asks for a mood, then for lyrics in that mood.
pub async fn generate_song<G>(generator: &G, genre: &str, keywords: &str) -> Result<SongDraft>
where
    G: TextGenerator + ?Sized,
{
    let raw_mood = generator.generate(&mood_prompt(genre, keywords)).await?;
    let mood = normalize_mood(&raw_mood).ok_or(Error::EmptyResponse)?;
    tracing::info!(genre, %mood, "predicted mood");

    let lyrics = generator
        .generate(&lyrics_prompt(genre, &mood, keywords))
        .await?
        .trim()
        .to_string();
    if lyrics.is_empty() {
        return Err(Error::EmptyResponse);
    }
    tracing::info!(genre, lines = lyrics.lines().count(), "generated lyrics");

    Ok(SongDraft { mood, lyrics })
}

/// `<genre>_<YYYYmmdd_HHMMSS>.txt`
pub fn default_lyrics_name(genre: &str) -> String {
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    format!("{}_{ts}.txt", genre.trim().to_lowercase().replace(' ', "_"))
}

/// Writes `lyrics` to `dir/name`, appending `.txt` when missing.
pub fn save_lyrics(dir: &Path, name: &str, lyrics: &str) -> Result<PathBuf> {
    let filename = if name.ends_with(".txt") {
        name.to_string()
    } else {
        format!("{name}.txt")
    };
    let path = dir.join(filename);

    fs::create_dir_all(dir).map_err(|source| Error::WriteLyrics {
        path: dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, lyrics).map_err(|source| Error::WriteLyrics {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "saved lyrics");
    Ok(path)
}
