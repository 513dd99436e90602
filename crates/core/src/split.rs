//! Sentence segmentation, duration estimation and part splitting.
//!
//! Turns raw story prose into narration-length parts. Sentences are the
//! atomic unit: a part boundary never falls inside a sentence, so a
//! single sentence longer than the word budget gets a part of its own.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fixed narration speech rate.
pub const WORDS_PER_MINUTE: f64 = 160.0;

/// Speech rate per second, derived from [`WORDS_PER_MINUTE`].
pub const WORDS_PER_SECOND: f64 = WORDS_PER_MINUTE / 60.0;

/// Default target duration of a single part, in seconds.
pub const DEFAULT_TARGET_SECONDS: u32 = 60;

/// Sentence-terminal punctuation followed by at least one whitespace char.
static SENTENCE_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// One narration segment: an ordered, contiguous run of sentences.
pub type Part = Vec<String>;

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

/// Split text into sentences.
///
/// A boundary is any whitespace run that directly follows `.`, `!` or `?`.
/// Pieces are trimmed and empty pieces dropped. Abbreviations and decimal
/// numbers are not special-cased: `"Dr. Smith"` yields two sentences.
pub fn segment_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY_RE.find_iter(text) {
        // The terminal mark is one ASCII byte; keep it with its sentence.
        let end = boundary.start() + 1;
        push_trimmed(&mut sentences, &text[start..end]);
        start = boundary.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

// ---------------------------------------------------------------------------
// Duration estimation
// ---------------------------------------------------------------------------

/// Estimated narration time in whole seconds for `words` words.
///
/// `round(words / WORDS_PER_SECOND)`, so 160 words is 60 seconds.
pub fn estimate_duration(words: usize) -> u32 {
    (words as f64 / WORDS_PER_SECOND).round() as u32
}

/// Largest word count that fits in `target_seconds` of narration.
pub fn word_budget(target_seconds: u32) -> usize {
    (target_seconds as f64 * WORDS_PER_SECOND).floor() as usize
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Greedily group sentences into parts of at most `target_seconds`.
///
/// A part is closed when it is non-empty and the next sentence would push
/// it past the word budget. The output concatenates back to the input
/// exactly, and contains no empty part. Empty input yields no parts.
pub fn split_sentences<S: AsRef<str>>(sentences: &[S], target_seconds: u32) -> Vec<Part> {
    let budget = word_budget(target_seconds);
    let mut parts = Vec::new();
    let mut current: Part = Vec::new();
    let mut current_words = 0;

    for sentence in sentences {
        let sentence = sentence.as_ref();
        let words = count_words(sentence);
        if !current.is_empty() && current_words + words > budget {
            parts.push(std::mem::take(&mut current));
            current_words = 0;
        }
        current.push(sentence.to_string());
        current_words += words;
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Segment `text` and split it at the given target duration.
pub fn split_text(text: &str, target_seconds: u32) -> Vec<Part> {
    split_sentences(&segment_sentences(text), target_seconds)
}

/// Render a part as narration text: sentences joined by single spaces.
pub fn join_part(part: &[String]) -> String {
    part.join(" ").trim().to_string()
}

/// Render every part for submission, dropping parts emptied by moves.
pub fn finalize_parts(parts: &[Part]) -> Vec<String> {
    parts
        .iter()
        .map(|part| join_part(part))
        .filter(|text| !text.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Duration band
// ---------------------------------------------------------------------------

/// Inclusive range of acceptable part durations, in seconds.
///
/// Purely presentational: the splitter never consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationBand {
    pub min: u32,
    pub max: u32,
}

impl DurationBand {
    /// Band used with the default 60-second target.
    pub const DEFAULT: DurationBand = DurationBand { min: 50, max: 70 };

    pub fn contains(&self, seconds: u32) -> bool {
        (self.min..=self.max).contains(&seconds)
    }
}

impl Default for DurationBand {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Word count and estimated duration of one part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartEstimate {
    pub words: usize,
    pub seconds: u32,
    pub in_band: bool,
}

/// Estimate a part's duration and flag it against `band`.
pub fn estimate_part(part: &[String], band: DurationBand) -> PartEstimate {
    let words = count_words(&part.join(" "));
    let seconds = estimate_duration(words);
    PartEstimate {
        words,
        seconds,
        in_band: band.contains(seconds),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
