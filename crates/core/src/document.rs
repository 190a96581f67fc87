//! Document — a retrieval hit and its context formatting.

use serde::{Deserialize, Serialize};

/// Descriptive metadata attached to a retrieval hit. Used by the
/// retrieval side for filtering and by context formatting for block
/// headers; the pipeline itself retains only the document text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Channel tag ("instagram", "blog", "email", or "general").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// A retrieval result: text content plus descriptive metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,

    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(content: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self { content: content.into(), metadata }
    }
}

/// Format retrieved documents as a labeled context block for prompt
/// injection. Returns an empty string for an empty slice so callers can
/// gate the whole reference section on it.
pub fn format_context(docs: &[Document]) -> String {
    if docs.is_empty() {
        return String::new();
    }

    let mut context = String::new();
    for (i, doc) in docs.iter().enumerate() {
        context.push_str(&format!("[Reference {}]", i + 1));
        if let Some(source) = &doc.metadata.source {
            context.push_str(&format!(" source: {source}"));
        }
        if let Some(category) = &doc.metadata.category {
            context.push_str(&format!(", category: {category}"));
        }
        if let Some(channel) = &doc.metadata.channel {
            context.push_str(&format!(", channel: {channel}"));
        }
        context.push('\n');
        context.push_str(doc.content.trim());
        context.push_str("\n\n");
    }
    context
}
