//! Explanations of why a source document was cited.
//!
//! A document is scored against the user query, the generated response and
//! optional request context. The three factor scores are combined into a
//! relevance score, a [`ConfidenceLevel`], and a short human-readable
//! explanation. Scoring is lexical only; it never embeds text.
//!
//! # Example
//!
//! ```rust,ignore
//! use govassist_rag::{explain_scored_documents, relevance_statistics};
//!
//! let results = retriever.find_most_relevant(&query, &documents);
//! let explanations = explain_scored_documents(&results, &query, &response, None);
//! let stats = relevance_statistics(&explanations);
//! println!("{} sources, average {:.2}", stats.total_sources, stats.average_relevance);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::document::{Document, ScoredDocument, char_prefix};
use crate::error::{RagError, Result};

const QUERY_WEIGHT: f32 = 0.4;
const RESPONSE_WEIGHT: f32 = 0.4;
const CONTEXT_WEIGHT: f32 = 0.2;
const FALLBACK_RELEVANCE: f32 = 0.3;
const MAX_EXPLAINED_FACTORS: usize = 3;

const LOCATION_KEYS: &[&str] = &["location", "url", "source_url"];
const ACCESS_STATES: &[&str] = &["available", "unavailable", "restricted"];
const DEFAULT_ACCESS_STATE: &str = "available";

/// How much trust to place in a relevance assessment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceLevel {
    /// Bucket a relevance score: ≥ 0.8 high, ≥ 0.6 medium, ≥ 0.4 low.
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            Self::High
        } else if score >= 0.6 {
            Self::Medium
        } else if score >= 0.4 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// High needs a mean of at least 0.8 with the factors in close agreement
    /// (variance below 0.05); otherwise the mean is bucketed without High.
    fn from_factor_scores(scores: [f32; 3]) -> Self {
        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        let variance =
            scores.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / scores.len() as f32;

        if mean >= 0.8 && variance < 0.05 {
            Self::High
        } else if mean >= 0.6 {
            Self::Medium
        } else if mean >= 0.4 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

/// One scored aspect of a document's relevance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelevanceFactor {
    /// Score in `[0, 1]`.
    pub score: f32,
    /// The signals that contributed, in the order they were found.
    pub factors: Vec<String>,
    /// One-line summary.
    pub explanation: String,
}

impl RelevanceFactor {
    fn new(aspect: &str, score: f32, factors: Vec<String>) -> Self {
        let explanation = format!("{aspect} relevance based on {} factors", factors.len());
        Self { score: score.min(1.0), factors, explanation }
    }

    fn fallback() -> Self {
        Self {
            score: FALLBACK_RELEVANCE,
            factors: Vec::new(),
            explanation: "Fallback".to_string(),
        }
    }
}

/// The three aspects a relevance score is built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelevanceFactors {
    pub query_relevance: RelevanceFactor,
    pub response_relevance: RelevanceFactor,
    pub metadata_relevance: RelevanceFactor,
}

/// Request context a document can be matched against.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelevanceContext {
    /// Document type the user is looking for (compared case-insensitively).
    #[serde(default)]
    pub document_type: Option<String>,
}

/// Why a document was cited, and how strongly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelevanceExplanation {
    pub document_id: Option<String>,
    pub title: Option<String>,
    /// Weighted combination of the factor scores, rounded to three decimals.
    pub relevance_score: f32,
    pub confidence_level: ConfidenceLevel,
    pub explanation: String,
    pub relevance_factors: RelevanceFactors,
    /// Retrieval similarity, when the document came from a ranked result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f32>,
    /// Whether the document's access state is `available`.
    pub accessible: bool,
    pub access_state: String,
}

/// Per-level counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub very_low: usize,
}

impl LevelCounts {
    fn record(&mut self, level: ConfidenceLevel) {
        match level {
            ConfidenceLevel::High => self.high += 1,
            ConfidenceLevel::Medium => self.medium += 1,
            ConfidenceLevel::Low => self.low += 1,
            ConfidenceLevel::VeryLow => self.very_low += 1,
        }
    }
}

/// Summary of a set of relevance explanations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelevanceStatistics {
    pub total_sources: usize,
    /// Mean relevance score, 0.0 for an empty set.
    pub average_relevance: f32,
    pub max_relevance: Option<f32>,
    pub min_relevance: Option<f32>,
    /// Counts by assessed confidence level.
    pub confidence_distribution: LevelCounts,
    /// Counts by relevance score bucket (see [`ConfidenceLevel::from_score`]).
    pub score_distribution: LevelCounts,
    /// The first explanation, which is the best one for sorted input.
    pub top_source: Option<RelevanceExplanation>,
}

/// Explain a document's relevance, falling back to a neutral explanation
/// (score 0.3, low confidence) when the document cannot be scored.
pub fn explain_relevance(
    document: &Document,
    query: &str,
    response: &str,
    context: Option<&RelevanceContext>,
) -> RelevanceExplanation {
    match try_explain_relevance(document, query, response, context) {
        Ok(explanation) => {
            debug!(
                title = explanation.title.as_deref().unwrap_or_default(),
                score = explanation.relevance_score,
                confidence = ?explanation.confidence_level,
                "calculated relevance"
            );
            explanation
        }
        Err(e) => {
            warn!(
                document_id = document.document_id.as_deref().unwrap_or_default(),
                error = %e,
                "relevance scoring failed, using fallback explanation"
            );
            fallback_explanation(document)
        }
    }
}

/// Explain a document's relevance.
///
/// # Errors
///
/// Returns [`RagError::RelevanceError`] when the document has no title or
/// its `access_state` metadata is not one of `available`, `unavailable`,
/// `restricted`.
pub fn try_explain_relevance(
    document: &Document,
    query: &str,
    response: &str,
    context: Option<&RelevanceContext>,
) -> Result<RelevanceExplanation> {
    let title = document
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RagError::RelevanceError("document has no title".to_string()))?;
    let access_state = access_state(document)?;
    let accessible = access_state == DEFAULT_ACCESS_STATE;

    let query_relevance = query_relevance(document, title, query);
    let response_relevance = response_relevance(document, title, response);
    let metadata_relevance = context_relevance(document, accessible, context);

    let combined = query_relevance.score * QUERY_WEIGHT
        + response_relevance.score * RESPONSE_WEIGHT
        + metadata_relevance.score * CONTEXT_WEIGHT;
    let relevance_score = (combined * 1000.0).round() / 1000.0;
    let confidence_level = ConfidenceLevel::from_factor_scores([
        query_relevance.score,
        response_relevance.score,
        metadata_relevance.score,
    ]);

    let relevance_factors =
        RelevanceFactors { query_relevance, response_relevance, metadata_relevance };
    let explanation = describe(&relevance_factors, relevance_score, confidence_level);

    Ok(RelevanceExplanation {
        document_id: document.document_id.clone(),
        title: Some(title.to_string()),
        relevance_score,
        confidence_level,
        explanation,
        relevance_factors,
        similarity_score: None,
        accessible,
        access_state: access_state.to_string(),
    })
}

/// Explain every document, most relevant first (stable on ties).
pub fn explain_sources(
    documents: &[Document],
    query: &str,
    response: &str,
    context: Option<&RelevanceContext>,
) -> Vec<RelevanceExplanation> {
    let explanations = documents
        .iter()
        .map(|document| explain_relevance(document, query, response, context))
        .collect();
    sort_and_log(explanations, query)
}

/// Explain ranked retrieval results, keeping each result's similarity score.
pub fn explain_scored_documents(
    results: &[ScoredDocument],
    query: &str,
    response: &str,
    context: Option<&RelevanceContext>,
) -> Vec<RelevanceExplanation> {
    let explanations = results
        .iter()
        .map(|result| RelevanceExplanation {
            similarity_score: Some(result.similarity_score),
            ..explain_relevance(&result.document, query, response, context)
        })
        .collect();
    sort_and_log(explanations, query)
}

/// Summarize the score and confidence distribution of `explanations`.
pub fn relevance_statistics(explanations: &[RelevanceExplanation]) -> RelevanceStatistics {
    if explanations.is_empty() {
        return RelevanceStatistics::default();
    }

    let mut stats = RelevanceStatistics {
        total_sources: explanations.len(),
        top_source: explanations.first().cloned(),
        ..RelevanceStatistics::default()
    };
    let mut total = 0.0;
    for explanation in explanations {
        let score = explanation.relevance_score;
        total += score;
        stats.max_relevance = Some(stats.max_relevance.map_or(score, |m| m.max(score)));
        stats.min_relevance = Some(stats.min_relevance.map_or(score, |m| m.min(score)));
        stats.confidence_distribution.record(explanation.confidence_level);
        stats.score_distribution.record(ConfidenceLevel::from_score(score));
    }
    stats.average_relevance = total / explanations.len() as f32;
    stats
}

fn sort_and_log(
    mut explanations: Vec<RelevanceExplanation>,
    query: &str,
) -> Vec<RelevanceExplanation> {
    explanations.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    info!(
        query = %char_prefix(query, 50),
        sources = explanations.len(),
        top_score = explanations.first().map(|e| e.relevance_score),
        "explained source relevance"
    );
    explanations
}

fn query_relevance(document: &Document, title: &str, query: &str) -> RelevanceFactor {
    let query = query.to_lowercase();
    let words: Vec<&str> = query.split_whitespace().collect();
    let mentions_query = |text: &str| {
        let text = text.to_lowercase();
        words.iter().any(|word| text.contains(word))
    };

    let mut score = 0.0;
    let mut factors = Vec::new();

    if mentions_query(title) {
        score += 0.6;
        factors.push("Title contains query keywords".to_string());
    }
    let metadata_hit = document.attribution_metadata.iter().find_map(|(key, value)| match value {
        Value::String(s) if mentions_query(s) => Some(key),
        _ => None,
    });
    if let Some(key) = metadata_hit {
        score += 0.2;
        factors.push(format!("Metadata '{key}' contains query keywords"));
    }
    if location(document).is_some_and(|loc| mentions_query(loc)) {
        score += 0.2;
        factors.push("Document location contains query keywords".to_string());
    }

    RelevanceFactor::new("Query", score, factors)
}

fn response_relevance(document: &Document, title: &str, response: &str) -> RelevanceFactor {
    let response = response.to_lowercase();

    let mut score = 0.0;
    let mut factors = Vec::new();

    if response.contains(&title.to_lowercase()) {
        score += 0.5;
        factors.push("Document title mentioned in response".to_string());
    }

    let metadata_keywords: BTreeSet<String> = document
        .attribution_metadata
        .values()
        .filter_map(Value::as_str)
        .flat_map(|s| s.to_lowercase().split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .collect();
    let matching = metadata_keywords
        .iter()
        .filter(|keyword| keyword.chars().count() > 3 && response.contains(keyword.as_str()))
        .count();
    if matching > 0 {
        score += (matching as f32 * 0.1).min(0.3);
        factors.push(format!("{matching} metadata keywords in response"));
    }

    if location(document).is_some_and(|loc| response.contains(&loc.to_lowercase())) {
        score += 0.2;
        factors.push("Document location mentioned in response".to_string());
    }

    RelevanceFactor::new("Response", score, factors)
}

fn context_relevance(
    document: &Document,
    accessible: bool,
    context: Option<&RelevanceContext>,
) -> RelevanceFactor {
    let Some(context) = context else {
        return RelevanceFactor {
            score: FALLBACK_RELEVANCE,
            factors: vec!["No specific context provided".to_string()],
            explanation: "Default relevance based on document metadata".to_string(),
        };
    };

    let mut score = 0.0;
    let mut factors = Vec::new();

    let document_type = document
        .document_type
        .as_deref()
        .or_else(|| document.attribution_metadata.get("document_type").and_then(Value::as_str))
        .filter(|t| !t.is_empty());
    let wanted_type = context.document_type.as_deref().filter(|t| !t.is_empty());
    if let (Some(document_type), Some(wanted_type)) = (document_type, wanted_type) {
        if document_type.to_lowercase() == wanted_type.to_lowercase() {
            score += 0.4;
            factors.push(format!("Document type matches: {document_type}"));
        }
    }
    if document.attribution_metadata.contains_key("created_at") {
        score += 0.3;
        factors.push("Document has creation timestamp".to_string());
    }
    if accessible {
        score += 0.3;
        factors.push("Document is currently accessible".to_string());
    }

    RelevanceFactor::new("Context", score, factors)
}

fn describe(factors: &RelevanceFactors, score: f32, confidence: ConfidenceLevel) -> String {
    let signals: Vec<&str> = [
        &factors.query_relevance,
        &factors.response_relevance,
        &factors.metadata_relevance,
    ]
    .into_iter()
    .flat_map(|factor| factor.factors.iter().map(String::as_str))
    .take(MAX_EXPLAINED_FACTORS)
    .collect();

    let reason = if signals.is_empty() {
        "This document provides general background information.".to_string()
    } else {
        format!("This document is relevant because: {}.", signals.join(", "))
    };
    let strength = match ConfidenceLevel::from_score(score) {
        ConfidenceLevel::High => "It's highly relevant to your query.",
        ConfidenceLevel::Medium => "It's quite relevant to your query.",
        ConfidenceLevel::Low => "It's somewhat relevant to your query.",
        ConfidenceLevel::VeryLow => "It provides supplementary information.",
    };
    let reliability = match confidence {
        ConfidenceLevel::High => "We're confident in this relevance assessment.",
        ConfidenceLevel::Medium => "This relevance assessment is reasonably reliable.",
        ConfidenceLevel::Low | ConfidenceLevel::VeryLow => {
            "This relevance assessment has lower confidence due to limited matching."
        }
    };

    format!("{reason} {strength} {reliability}")
}

fn fallback_explanation(document: &Document) -> RelevanceExplanation {
    let access_state = document
        .attribution_metadata
        .get("access_state")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ACCESS_STATE);
    RelevanceExplanation {
        document_id: document.document_id.clone(),
        title: document.title.clone(),
        relevance_score: FALLBACK_RELEVANCE,
        confidence_level: ConfidenceLevel::Low,
        explanation: "Unable to calculate specific relevance. \
                      This document may provide general background information."
            .to_string(),
        relevance_factors: RelevanceFactors {
            query_relevance: RelevanceFactor::fallback(),
            response_relevance: RelevanceFactor::fallback(),
            metadata_relevance: RelevanceFactor::fallback(),
        },
        similarity_score: None,
        accessible: access_state == DEFAULT_ACCESS_STATE,
        access_state: access_state.to_string(),
    }
}

fn location(document: &Document) -> Option<&str> {
    LOCATION_KEYS
        .iter()
        .find_map(|key| document.attribution_metadata.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|loc| !loc.is_empty())
}

fn access_state(document: &Document) -> Result<&str> {
    match document.attribution_metadata.get("access_state") {
        None | Some(Value::Null) => Ok(DEFAULT_ACCESS_STATE),
        Some(Value::String(state)) if ACCESS_STATES.contains(&state.as_str()) => Ok(state.as_str()),
        Some(other) => Err(RagError::RelevanceError(format!("unknown access state {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUERY: &str = "How to register a business in Shenzhen?";
    const RESPONSE: &str =
        "Follow the Business Registration Guide and file online with Shenzhen Market Supervision.";

    fn business_guide() -> Document {
        Document::new("Business Registration Guide", "Submit the application online.")
            .with_id("business")
            .with_type("guide")
            .with_metadata("site_name", "Shenzhen Market Supervision")
    }

    fn employment_law() -> Document {
        Document::new("Employment Law", "Employers sign written contracts.").with_id("employment")
    }

    #[test]
    fn scores_query_response_and_default_context() {
        let explanation = explain_relevance(&business_guide(), QUERY, RESPONSE, None);

        let factors = &explanation.relevance_factors;
        assert!((factors.query_relevance.score - 0.8).abs() < 1e-6);
        assert!((factors.response_relevance.score - 0.8).abs() < 1e-6);
        assert!((factors.metadata_relevance.score - 0.3).abs() < 1e-6);
        assert_eq!(factors.response_relevance.factors[1], "3 metadata keywords in response");

        assert!((explanation.relevance_score - 0.7).abs() < 1e-6);
        assert_eq!(explanation.confidence_level, ConfidenceLevel::Medium);
        assert_eq!(
            explanation.explanation,
            "This document is relevant because: Title contains query keywords, \
             Metadata 'site_name' contains query keywords, Document title mentioned in response. \
             It's quite relevant to your query. This relevance assessment is reasonably reliable."
        );
        assert!(explanation.accessible);
        assert_eq!(explanation.access_state, "available");
    }

    #[test]
    fn matching_context_gives_high_confidence() {
        let document = business_guide().with_metadata("created_at", "2024-01-01");
        let context = RelevanceContext { document_type: Some("GUIDE".to_string()) };

        let explanation = explain_relevance(&document, QUERY, RESPONSE, Some(&context));

        let context_factor = &explanation.relevance_factors.metadata_relevance;
        assert!((context_factor.score - 1.0).abs() < 1e-6);
        assert_eq!(context_factor.factors[0], "Document type matches: guide");
        assert!((explanation.relevance_score - 0.84).abs() < 1e-6);
        assert_eq!(explanation.confidence_level, ConfidenceLevel::High);
        assert!(explanation.explanation.ends_with(
            "It's highly relevant to your query. We're confident in this relevance assessment."
        ));
    }

    #[test]
    fn unrelated_document_is_very_low() {
        let explanation = explain_relevance(
            &employment_law(),
            "passport photo size",
            "Passport photos must be 48 by 33 mm.",
            None,
        );

        assert!((explanation.relevance_score - 0.06).abs() < 1e-6);
        assert_eq!(explanation.confidence_level, ConfidenceLevel::VeryLow);
        assert_eq!(
            explanation.explanation,
            "This document is relevant because: No specific context provided. \
             It provides supplementary information. \
             This relevance assessment has lower confidence due to limited matching."
        );
    }

    #[test]
    fn location_metadata_counts_for_query_and_response() {
        let document = Document::new("Permits", "")
            .with_metadata("url", "https://hrss.sz.gov.cn/permits");
        let explanation = explain_relevance(
            &document,
            "hrss.sz.gov.cn",
            "See https://hrss.sz.gov.cn/permits for details.",
            None,
        );

        let query = &explanation.relevance_factors.query_relevance;
        assert_eq!(
            query.factors,
            vec!["Metadata 'url' contains query keywords", "Document location contains query keywords"]
        );
        assert!(
            explanation
                .relevance_factors
                .response_relevance
                .factors
                .contains(&"Document location mentioned in response".to_string())
        );
    }

    #[test]
    fn restricted_document_is_not_accessible() {
        let document = business_guide().with_metadata("access_state", "restricted");
        let explanation =
            explain_relevance(&document, QUERY, RESPONSE, Some(&RelevanceContext::default()));

        assert!(!explanation.accessible);
        assert_eq!(explanation.access_state, "restricted");
        assert!(explanation.relevance_factors.metadata_relevance.factors.is_empty());
        assert_eq!(explanation.relevance_factors.metadata_relevance.score, 0.0);
    }

    #[test]
    fn unscorable_documents_get_fallback_explanation() {
        let untitled = Document { content: Some("body".to_string()), ..Document::default() };
        assert!(matches!(
            try_explain_relevance(&untitled, QUERY, RESPONSE, None),
            Err(RagError::RelevanceError(_))
        ));

        let explanation = explain_relevance(&untitled, QUERY, RESPONSE, None);
        assert!((explanation.relevance_score - 0.3).abs() < 1e-6);
        assert_eq!(explanation.confidence_level, ConfidenceLevel::Low);
        assert!(explanation.explanation.starts_with("Unable to calculate specific relevance."));
        assert_eq!(explanation.relevance_factors.query_relevance.explanation, "Fallback");

        let archived = business_guide().with_metadata("access_state", "archived");
        assert!(try_explain_relevance(&archived, QUERY, RESPONSE, None).is_err());
        assert!(!explain_relevance(&archived, QUERY, RESPONSE, None).accessible);
    }

    #[test]
    fn sources_are_sorted_by_relevance() {
        let documents = vec![employment_law(), business_guide()];
        let explanations = explain_sources(&documents, QUERY, RESPONSE, None);

        assert_eq!(explanations.len(), 2);
        assert_eq!(explanations[0].document_id.as_deref(), Some("business"));
        assert!(explanations[0].relevance_score >= explanations[1].relevance_score);
        assert!(explain_sources(&[], QUERY, RESPONSE, None).is_empty());
    }

    #[test]
    fn scored_documents_keep_similarity() {
        let results = vec![
            ScoredDocument::new(&employment_law(), 0.45),
            ScoredDocument::new(&business_guide(), 0.4),
        ];
        let explanations = explain_scored_documents(&results, QUERY, RESPONSE, None);

        assert_eq!(explanations[0].document_id.as_deref(), Some("business"));
        assert_eq!(explanations[0].similarity_score, Some(0.4));
        assert_eq!(explanations[1].similarity_score, Some(0.45));
    }

    #[test]
    fn statistics_summarize_distributions() {
        let empty = relevance_statistics(&[]);
        assert_eq!(empty.total_sources, 0);
        assert_eq!(empty.average_relevance, 0.0);
        assert_eq!(empty.top_source, None);

        let context = RelevanceContext { document_type: Some("guide".to_string()) };
        let high = explain_relevance(
            &business_guide().with_metadata("created_at", "2024-01-01"),
            QUERY,
            RESPONSE,
            Some(&context),
        );
        let medium = explain_relevance(&business_guide(), QUERY, RESPONSE, None);
        let very_low = explain_relevance(&employment_law(), "passport", "Bring a photo.", None);

        let stats = relevance_statistics(&[high.clone(), medium, very_low]);
        assert_eq!(stats.total_sources, 3);
        assert!((stats.average_relevance - (0.84 + 0.7 + 0.06) / 3.0).abs() < 1e-5);
        assert_eq!(stats.max_relevance, Some(high.relevance_score));
        assert!((stats.min_relevance.unwrap() - 0.06).abs() < 1e-6);
        assert_eq!(
            stats.confidence_distribution,
            LevelCounts { high: 1, medium: 1, low: 0, very_low: 1 }
        );
        assert_eq!(stats.score_distribution, LevelCounts { high: 1, medium: 1, low: 0, very_low: 1 });
        assert_eq!(stats.top_source, Some(high));
    }

    #[test]
    fn score_buckets() {
        assert_eq!(ConfidenceLevel::from_score(0.8), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.79), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.4), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0.39), ConfidenceLevel::VeryLow);
    }

    #[test]
    fn high_confidence_needs_agreeing_factors() {
        assert_eq!(ConfidenceLevel::from_factor_scores([0.9, 0.9, 0.8]), ConfidenceLevel::High);
        // Mean 0.8 but factors far apart.
        assert_eq!(ConfidenceLevel::from_factor_scores([1.0, 1.0, 0.4]), ConfidenceLevel::Medium);
    }
}
