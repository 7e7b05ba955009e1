//! Keyword-overlap scoring used when embedding retrieval is unavailable.

use std::collections::HashSet;

use crate::document::Document;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of", "on",
    "or", "that", "the", "this", "to", "was", "with", "you", "your",
];

const TITLE_BONUS: f32 = 0.3;
const PER_WORD_SCORE: f32 = 0.1;
const MAX_OVERLAP_SCORE: f32 = 0.7;
const TITLE_WORDS_CHECKED: usize = 3;

/// Lower-cased significant words of `text`.
///
/// Splits on any non-alphanumeric character and drops stop words and
/// single-character tokens. CJK runs without separators stay one token.
pub fn significant_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 2 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Score how well `document` supports `sentence`, in `[0, 1]`.
///
/// Adds 0.3 when one of the first three significant title words occurs in
/// the sentence, plus 0.1 per distinct significant word shared with the
/// document's representative text (capped at 0.7).
pub fn keyword_score(sentence: &str, document: &Document, document_text: &str) -> f32 {
    let sentence_words: HashSet<String> = significant_words(sentence).into_iter().collect();
    if sentence_words.is_empty() {
        return 0.0;
    }

    let mut score = 0.0;

    let title = document.title.as_deref().unwrap_or_default();
    if significant_words(title)
        .iter()
        .take(TITLE_WORDS_CHECKED)
        .any(|word| sentence_words.contains(word))
    {
        score += TITLE_BONUS;
    }

    let document_words: HashSet<String> = significant_words(document_text).into_iter().collect();
    let overlap = sentence_words.intersection(&document_words).count();
    if overlap > 0 {
        score += (overlap as f32 * PER_WORD_SCORE).min(MAX_OVERLAP_SCORE);
    }

    score.clamp(0.0, 1.0)
}

/// Pick the document with the highest keyword score for `sentence`.
///
/// `document_texts` holds each document's representative text, index-aligned
/// with `documents`. Returns the winning index and score when the score is
/// positive and strictly above `min_score`; the first document wins ties.
pub fn best_keyword_match(
    sentence: &str,
    documents: &[Document],
    document_texts: &[String],
    min_score: f32,
) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, (document, text)) in documents.iter().zip(document_texts).enumerate() {
        let score = keyword_score(sentence, document, text);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }
    best.filter(|(_, score)| *score > 0.0 && *score > min_score)
}
