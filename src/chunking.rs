//! Text normalization and overlapping word-window chunking.
//!
//! Document text arrives from OCR/PDF extraction and carries its artifacts:
//! words hyphenated across line breaks, hard-wrapped lines, runs of blank
//! lines and repeated spaces. [`normalize_text`] flattens those before
//! [`chunk_text`] slides a fixed-size word window with overlap so that
//! context survives chunk boundaries.
//!
//! # Examples
//!
//! ```
//! use ragchat::chunking::chunk_text;
//!
//! let chunks = chunk_text("alpha beta gamma delta", 2, 1).unwrap();
//! assert_eq!(chunks, vec!["alpha beta", "beta gamma", "gamma delta"]);
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::error::RagError;

fn hyphen_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w+)-\n(\w+)").expect("valid regex"))
}

fn newline_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n+").expect("valid regex"))
}

fn horizontal_ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").expect("valid regex"))
}

/// Normalizes raw extracted text.
///
/// - merges words split by a hyphen at a line break (`exam-\nple` -> `example`)
/// - turns a single newline inside a sentence into a space
/// - collapses runs of blank lines into one newline
/// - collapses repeated spaces/tabs and trims the ends
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let text = hyphen_break_re().replace_all(text, "${1}${2}");
    // A lone newline is a wrapped line; two or more mark a paragraph break.
    let text = newline_run_re().replace_all(&text, |caps: &regex::Captures<'_>| {
        if caps[0].len() == 1 { " " } else { "\n" }
    });
    let text = horizontal_ws_re().replace_all(&text, " ");
    text.trim().to_string()
}

/// Splits `text` into overlapping chunks of at most `chunk_size` word
/// tokens, with `overlap` tokens shared between consecutive chunks.
///
/// The text is normalized first, then tokenized by splitting on single
/// spaces. Chunk `i` covers tokens `[start, start + chunk_size)` and the
/// next chunk begins at `start + chunk_size - overlap`; the walk stops
/// with the first window that reaches the end of the text. Every token is
/// covered and each adjacent pair shares exactly `overlap` tokens (the
/// final chunk may be shorter).
///
/// Empty input yields a single empty chunk; callers that index chunks are
/// expected to skip empties.
///
/// # Errors
///
/// Returns [`RagError::Configuration`] when `chunk_size` is zero or
/// `overlap >= chunk_size` (the window would never advance).
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>, RagError> {
    if chunk_size == 0 {
        return Err(RagError::configuration("chunk_size must be greater than 0"));
    }
    if overlap >= chunk_size {
        return Err(RagError::configuration(format!(
            "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }

    let normalized = normalize_text(text);
    let tokens: Vec<&str> = normalized.split(' ').collect();
    let step = chunk_size - overlap;

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = usize::min(start + chunk_size, tokens.len());
        chunks.push(tokens[start..end].join(" "));
        // Once a window reaches the end of the text, overlap alone is left;
        // re-emitting it as a trailing chunk would add no new tokens.
        if end >= tokens.len() {
            break;
        }
        start += step;
    }

    tracing::debug!(
        chunk_count = chunks.len(),
        chunk_size,
        overlap,
        "text divided into chunks"
    );
    Ok(chunks)
}
