//! Sentence and paragraph splitting for generated responses.
//!
//! - [`split_sentences`]: splits on sentence-final punctuation from Latin and CJK scripts
//! - [`split_paragraphs`]: splits markdown on blank lines
//! - [`split_with_basic_processing`]: line-based paragraphs that keep code
//!   fences and horizontal rules as their own segments
//! - [`should_skip_citation`]: detects markdown scaffolding that never gets a citation

use std::sync::LazyLock;

use regex::Regex;

/// Characters that end a sentence. Each is stripped from the returned text.
pub const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', '。', '！', '？', '｡'];

const SKIP_PREFIXES: &[&str] = &["---", "***", "___", "#", "```", "<!--", "|", "!["];

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid blank-line regex"));

static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\-\*_]{3,}\s*$").expect("valid rule regex"));

/// Split text into sentences.
///
/// Every terminator in [`SENTENCE_TERMINATORS`] ends a sentence and is
/// dropped. Each sentence is trimmed; empty or whitespace-only spans are
/// discarded. Trailing text without a terminator forms a final sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if SENTENCE_TERMINATORS.contains(&c) {
            push_trimmed(&mut sentences, &current);
            current.clear();
        } else {
            current.push(c);
        }
    }
    push_trimmed(&mut sentences, &current);

    sentences
}

fn push_trimmed(out: &mut Vec<String>, span: &str) {
    let trimmed = span.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

/// Split markdown into paragraphs separated by blank lines.
///
/// Paragraphs are trimmed and empty ones dropped; inline formatting is kept.
pub fn split_paragraphs(markdown: &str) -> Vec<String> {
    BLANK_LINE
        .split(markdown.trim())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split markdown into paragraphs while keeping structural lines separate.
///
/// - Code fence lines and every line inside a fenced block become their own segment.
/// - Horizontal rules (`---`, `***`, `___`) become their own segment.
/// - Blank lines end the current paragraph.
///
/// Lines keep their leading indentation; trailing whitespace is removed.
pub fn split_with_basic_processing(markdown: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut in_code_block = false;

    for raw_line in markdown.split('\n') {
        let line = raw_line.trim_end();
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            in_code_block = !in_code_block;
            flush(&mut segments, &mut paragraph);
            segments.push(line.to_string());
            continue;
        }

        if in_code_block {
            segments.push(line.to_string());
            continue;
        }

        if HORIZONTAL_RULE.is_match(trimmed) {
            flush(&mut segments, &mut paragraph);
            segments.push(line.to_string());
            continue;
        }

        if trimmed.is_empty() {
            flush(&mut segments, &mut paragraph);
            continue;
        }

        paragraph.push(line);
    }
    flush(&mut segments, &mut paragraph);

    segments
}

fn flush(segments: &mut Vec<String>, paragraph: &mut Vec<&str>) {
    if !paragraph.is_empty() {
        segments.push(paragraph.join("\n"));
        paragraph.clear();
    }
}

/// Whether a segment should be left without a citation marker.
///
/// Blank text is skipped. Multi-line text is never skipped. A single line is
/// skipped when it starts with markdown scaffolding (headings, rules, code
/// fences, HTML comments, table rows, images).
pub fn should_skip_citation(text: &str) -> bool {
    if text.trim().is_empty() {
        return true;
    }
    if text.contains('\n') {
        return false;
    }

    let cleaned = text.trim();
    SKIP_PREFIXES.iter().any(|prefix| cleaned.starts_with(prefix))
        || HORIZONTAL_RULE.is_match(cleaned)
}
