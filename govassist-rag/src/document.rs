//! Data types for source documents and scored results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A source document supplied by the caller for a single request.
///
/// Every field is optional so that loosely shaped records degrade to
/// shorter extracted text instead of failing. When deserializing, the title
/// is read from `title` or `document_title`, the body from `content` or
/// `document_content`, and the identifier from `document_id` or `id`
/// (the first key wins when both are present).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawDocument")]
pub struct Document {
    /// Opaque identifier for the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// Display title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Free-form type tag (e.g. `guide`, `regulation`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    /// Attribution metadata such as site name, verification flag, or last-updated date.
    /// Entries keep the order in which they were inserted or deserialized.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attribution_metadata: Map<String, Value>,
}

impl Document {
    /// Create a document with a title and body.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: Some(title.into()), content: Some(content.into()), ..Self::default() }
    }

    /// Set the document identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }

    /// Set the document type tag.
    pub fn with_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = Some(document_type.into());
        self
    }

    /// Add one attribution metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attribution_metadata.insert(key.into(), value.into());
        self
    }

    /// Build the representative text used for embedding and keyword matching.
    ///
    /// Concatenates, with single spaces and skipping absent or empty fields:
    /// the title, the first `max_content_chars` characters of the content,
    /// and every metadata string value shorter than `max_metadata_value_chars`,
    /// in metadata insertion order.
    pub fn extract_text(
        &self,
        max_content_chars: usize,
        max_metadata_value_chars: usize,
    ) -> String {
        let mut parts: Vec<&str> = Vec::new();

        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            parts.push(title);
        }
        if let Some(content) = self.content.as_deref().filter(|c| !c.is_empty()) {
            parts.push(char_prefix(content, max_content_chars));
        }
        for value in self.attribution_metadata.values() {
            if let Value::String(s) = value {
                if !s.is_empty() && s.chars().count() < max_metadata_value_chars {
                    parts.push(s);
                }
            }
        }

        parts.join(" ")
    }

    /// Key identifying this document inside the similarity cache.
    pub(crate) fn cache_key(&self, content_chars: usize) -> String {
        let title = self.title.as_deref().unwrap_or_default();
        let content = char_prefix(self.content.as_deref().unwrap_or_default(), content_chars);
        format!("{title}:{content}")
    }
}

/// A [`Document`] paired with its similarity to a query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredDocument {
    /// The matched document.
    pub document: Document,
    /// Similarity score in `[0, 1]` (higher is more relevant).
    pub similarity_score: f32,
    /// The document's identifier, copied out for convenience.
    pub document_id: Option<String>,
}

impl ScoredDocument {
    pub(crate) fn new(document: &Document, similarity_score: f32) -> Self {
        Self {
            document: document.clone(),
            similarity_score,
            document_id: document.document_id.clone(),
        }
    }
}

/// Return at most the first `max_chars` characters of `text`.
pub(crate) fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Wire shape accepted when deserializing a [`Document`].
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    document_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    document_title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    document_content: Option<String>,
    #[serde(default, alias = "type")]
    document_type: Option<String>,
    #[serde(default)]
    attribution_metadata: Option<Map<String, Value>>,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let document_id = raw.document_id.or(raw.id).and_then(|value| match value {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        });
        Self {
            document_id,
            title: raw.title.filter(|t| !t.is_empty()).or(raw.document_title),
            content: raw.content.filter(|c| !c.is_empty()).or(raw.document_content),
            document_type: raw.document_type,
            attribution_metadata: raw.attribution_metadata.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_text_joins_title_content_and_short_metadata() {
        let doc = Document::new("Tax Guide", "Pay your taxes on time.")
            .with_metadata("site", "tax.gov")
            .with_metadata("verified", true)
            .with_metadata("notes", "x".repeat(150));

        assert_eq!(doc.extract_text(500, 100), "Tax Guide Pay your taxes on time. tax.gov");
    }

    #[test]
    fn extract_text_keeps_metadata_insertion_order() {
        let doc = Document::new("Permit", "")
            .with_metadata("site_name", "hrss.sz.gov.cn")
            .with_metadata("agency", "Human Resources Bureau");
        assert_eq!(doc.extract_text(500, 100), "Permit hrss.sz.gov.cn Human Resources Bureau");

        let parsed: Document = serde_json::from_str(
            r#"{"title": "Permit", "attribution_metadata": {"zone": "Futian", "agency": "HRSS"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.extract_text(500, 100), "Permit Futian HRSS");
    }

    #[test]
    fn extract_text_truncates_content_by_characters() {
        let doc = Document::new("标题", "深圳市营业执照办理指南");
        assert_eq!(doc.extract_text(4, 100), "标题 深圳市营");
    }

    #[test]
    fn extract_text_of_empty_document_is_empty() {
        assert!(Document::default().extract_text(500, 100).is_empty());
    }

    #[test]
    fn deserializes_alternate_field_names() {
        let doc: Document = serde_json::from_value(json!({
            "id": 42,
            "document_title": "Employment Law",
            "document_content": "Contracts must be in writing.",
            "attribution_metadata": {"site_name": "hrss.sz.gov.cn"}
        }))
        .unwrap();

        assert_eq!(doc.document_id.as_deref(), Some("42"));
        assert_eq!(doc.title.as_deref(), Some("Employment Law"));
        assert_eq!(doc.content.as_deref(), Some("Contracts must be in writing."));
        assert_eq!(doc.attribution_metadata.len(), 1);
    }

    #[test]
    fn primary_field_names_take_precedence() {
        let doc: Document = serde_json::from_value(json!({
            "title": "Primary",
            "document_title": "Secondary",
            "content": "",
            "document_content": "Fallback body"
        }))
        .unwrap();

        assert_eq!(doc.title.as_deref(), Some("Primary"));
        assert_eq!(doc.content.as_deref(), Some("Fallback body"));
    }

    #[test]
    fn tolerates_missing_fields() {
        let doc: Document = serde_json::from_value(json!({})).unwrap();
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn cache_key_uses_title_and_content_prefix() {
        let doc = Document::new("Title", "abcdefghij");
        assert_eq!(doc.cache_key(3), "Title:abc");
        assert_eq!(Document::default().cache_key(3), ":");
    }

    #[test]
    fn char_prefix_handles_short_and_multibyte_text() {
        assert_eq!(char_prefix("abc", 10), "abc");
        assert_eq!(char_prefix("这是第一句话", 2), "这是");
        assert_eq!(char_prefix("", 2), "");
    }
}
