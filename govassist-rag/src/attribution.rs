//! Sentence-level source attribution for generated responses.
//!
//! The [`AttributionTracker`] splits a response into sentences, asks the
//! [`Retriever`] for the single best supporting document per sentence, and
//! falls back to keyword overlap when retrieval fails. The result is a
//! [`ResponseAttribution`]: one [`SentenceAttribution`] per sentence plus a
//! deduplicated [`CitationList`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use govassist_rag::{AttributionTracker, Retriever, RetrievalConfig};
//!
//! let retriever = Arc::new(Retriever::with_hash_embedder(RetrievalConfig::default()));
//! let tracker = AttributionTracker::new(retriever);
//! let attribution = tracker.attribute_response(&response_text, &documents);
//! for record in &attribution.sentence_attributions {
//!     println!("{} -> {:?}", record.sentence, record.document_id);
//! }
//! ```

use std::cell::OnceCell;
use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::document::{Document, char_prefix};
use crate::error::{RagError, Result};
use crate::keyword::best_keyword_match;
use crate::retriever::Retriever;
use crate::splitter::{should_skip_citation, split_sentences, split_with_basic_processing};

/// How a sentence's source was chosen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttributionMethod {
    /// Embedding similarity via the retriever.
    Embedding,
    /// Keyword overlap after the retriever failed.
    Keyword,
    /// No document supported the sentence.
    None,
}

/// Links one response sentence to the document judged to support it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentenceAttribution {
    /// Zero-based position of the sentence in the response.
    pub sentence_index: usize,
    /// The sentence text (terminating punctuation removed).
    pub sentence: String,
    /// Identifier of the supporting document, if any.
    pub document_id: Option<String>,
    /// Title of the supporting document, if any.
    pub title: Option<String>,
    /// Confidence in `[0, 1]`; 0.0 when unattributed.
    pub confidence_score: f32,
    /// How the document was chosen.
    pub method: AttributionMethod,
}

impl SentenceAttribution {
    /// Create an attribution to `document`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::AttributionError`] if `confidence_score` is outside `[0, 1]`.
    pub fn new(
        sentence_index: usize,
        sentence: impl Into<String>,
        document: &Document,
        confidence_score: f32,
        method: AttributionMethod,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence_score) {
            return Err(RagError::AttributionError(format!(
                "confidence score {confidence_score} must be within [0, 1]"
            )));
        }
        Ok(Self {
            sentence_index,
            sentence: sentence.into(),
            document_id: document.document_id.clone(),
            title: document.title.clone(),
            confidence_score,
            method,
        })
    }

    /// Record that no document supports the sentence.
    pub fn unattributed(sentence_index: usize, sentence: impl Into<String>) -> Self {
        Self {
            sentence_index,
            sentence: sentence.into(),
            document_id: None,
            title: None,
            confidence_score: 0.0,
            method: AttributionMethod::None,
        }
    }

    /// Whether a document was chosen for this sentence.
    pub fn is_attributed(&self) -> bool {
        self.method != AttributionMethod::None
    }

    /// Key this record is cited under: the document id, or the title when
    /// the document has no id. `None` when unattributed or when neither is set.
    pub fn citation_key(&self) -> Option<&str> {
        if !self.is_attributed() {
            return None;
        }
        self.document_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.title.as_deref().filter(|title| !title.is_empty()))
    }
}

/// The unique documents cited by a response, in first-cited order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitationList {
    /// The response these citations belong to.
    pub response_id: Uuid,
    /// Citation keys of the cited documents (the title for documents without an id).
    pub document_sources: Vec<String>,
}

impl CitationList {
    /// Collect the distinct citation keys referenced by `attributions`.
    pub fn from_attributions(response_id: Uuid, attributions: &[SentenceAttribution]) -> Self {
        let mut seen = HashSet::new();
        let document_sources = attributions
            .iter()
            .filter_map(SentenceAttribution::citation_key)
            .filter(|key| seen.insert(*key))
            .map(str::to_string)
            .collect();
        Self { response_id, document_sources }
    }
}

/// Attribution data for a whole response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseAttribution {
    /// Identifier assigned to the response.
    pub response_id: Uuid,
    /// One record per attributed unit of the response.
    pub sentence_attributions: Vec<SentenceAttribution>,
    /// Deduplicated documents referenced by the records.
    pub citation_list: CitationList,
}

impl ResponseAttribution {
    fn new(response_id: Uuid, sentence_attributions: Vec<SentenceAttribution>) -> Self {
        let citation_list = CitationList::from_attributions(response_id, &sentence_attributions);
        Self { response_id, sentence_attributions, citation_list }
    }

    /// Number of attribution records.
    pub fn total_sentences(&self) -> usize {
        self.sentence_attributions.len()
    }

    /// Number of records that name a supporting document.
    pub fn attributed_sentences(&self) -> usize {
        self.sentence_attributions.iter().filter(|a| a.is_attributed()).count()
    }

    /// Whether every citation key referenced by a record appears in the citation list.
    pub fn is_consistent(&self) -> bool {
        let cited: HashSet<&str> =
            self.citation_list.document_sources.iter().map(String::as_str).collect();
        let consistent = self
            .sentence_attributions
            .iter()
            .filter_map(SentenceAttribution::citation_key)
            .all(|key| cited.contains(key));
        if !consistent {
            warn!(response_id = %self.response_id, "citation list is missing referenced documents");
        }
        consistent
    }
}

/// A response re-assembled with footnote markers.
///
/// The n-th record with a citation key in `attribution.sentence_attributions`
/// backs the marker `[^n]` in `text`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotatedResponse {
    /// The response paragraphs joined by blank lines, with markers appended.
    pub text: String,
    /// Per-paragraph attribution records.
    pub attribution: ResponseAttribution,
}

/// Assigns supporting documents to the sentences of generated responses.
#[derive(Debug, Clone)]
pub struct AttributionTracker {
    retriever: Arc<Retriever>,
}

impl AttributionTracker {
    /// Create a tracker backed by `retriever`.
    pub fn new(retriever: Arc<Retriever>) -> Self {
        Self { retriever }
    }

    /// Return a reference to the underlying retriever.
    pub fn retriever(&self) -> &Arc<Retriever> {
        &self.retriever
    }

    /// Attribute every sentence of `response` to at most one document.
    ///
    /// An empty response or an empty document list yields no records.
    /// Otherwise there is one record per non-empty sentence, unattributed
    /// ones carrying no document and a confidence of 0.0.
    pub fn attribute_response(
        &self,
        response: &str,
        documents: &[Document],
    ) -> ResponseAttribution {
        let response_id = Uuid::new_v4();
        if documents.is_empty() {
            return ResponseAttribution::new(response_id, Vec::new());
        }

        let texts = OnceCell::new();
        let records: Vec<SentenceAttribution> = split_sentences(response)
            .into_iter()
            .enumerate()
            .map(|(index, sentence)| self.attribute_sentence(index, sentence, documents, &texts))
            .collect();

        let attribution = ResponseAttribution::new(response_id, records);
        info!(
            response_id = %response_id,
            total_sentences = attribution.total_sentences(),
            attributed_sentences = attribution.attributed_sentences(),
            cited_documents = attribution.citation_list.document_sources.len(),
            "attributed response"
        );
        attribution
    }

    /// Attribute markdown paragraphs and append `[^n]` markers to the text.
    ///
    /// Paragraphs come from [`split_with_basic_processing`]; headings, rules,
    /// code fences, and similar scaffolding pass through without a record.
    pub fn annotate_response(&self, response: &str, documents: &[Document]) -> AnnotatedResponse {
        let response_id = Uuid::new_v4();
        let texts = OnceCell::new();
        let mut records = Vec::new();
        let mut paragraphs = Vec::new();
        let mut footnote = 0;

        for (index, segment) in split_with_basic_processing(response).into_iter().enumerate() {
            if documents.is_empty() || should_skip_citation(&segment) {
                paragraphs.push(segment);
                continue;
            }

            let record = self.attribute_sentence(index, segment.clone(), documents, &texts);
            if record.citation_key().is_some() {
                footnote += 1;
                paragraphs.push(format!("{segment} [^{footnote}]"));
            } else {
                paragraphs.push(segment);
            }
            records.push(record);
        }

        AnnotatedResponse {
            text: paragraphs.join("\n\n"),
            attribution: ResponseAttribution::new(response_id, records),
        }
    }

    fn attribute_sentence(
        &self,
        index: usize,
        sentence: String,
        documents: &[Document],
        texts: &OnceCell<Vec<String>>,
    ) -> SentenceAttribution {
        let config = self.retriever.config();
        let outcome = match self.retriever.try_find_most_relevant(
            &sentence,
            documents,
            1,
            config.similarity_threshold,
        ) {
            Ok(results) => results.into_iter().next().map(|best| {
                (best.document, best.similarity_score, AttributionMethod::Embedding)
            }),
            Err(e) => {
                warn!(
                    sentence = %char_prefix(&sentence, 50),
                    error = %e,
                    "retrieval failed, using keyword matching"
                );
                let (content_chars, metadata_chars) =
                    (config.max_content_chars, config.max_metadata_value_chars);
                let texts = texts.get_or_init(|| {
                    documents.iter().map(|d| d.extract_text(content_chars, metadata_chars)).collect()
                });
                best_keyword_match(&sentence, documents, texts, config.keyword_min_score).map(
                    |(idx, score)| (documents[idx].clone(), score, AttributionMethod::Keyword),
                )
            }
        };

        let Some((document, score, method)) = outcome else {
            debug!(sentence = %char_prefix(&sentence, 50), "no supporting document");
            return SentenceAttribution::unattributed(index, sentence);
        };

        match SentenceAttribution::new(index, sentence.clone(), &document, score, method) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "discarding invalid attribution");
                SentenceAttribution::unattributed(index, sentence)
            }
        }
    }
}
