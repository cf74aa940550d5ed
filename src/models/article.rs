//! Article model, output formats, and generation response types.
//!
//! This module defines:
//! - `OutputFormat`: target platforms a post can be rendered for
//! - `PostFields`: the raw {title, tldr, body} triple the generator returns
//! - `Article`: a finished variant attached to a batch result
//! - `LinkingSuggestions`: best-effort SEO linking hints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Target platform/format for generated content.
///
/// Determines both the prompt template used for generation and whether the
/// body is markdown or HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Wordpress,
    Shopify,
    Ghost,
    Medium,
    Html,
    Markdown,
}

impl OutputFormat {
    /// Stable lowercase label, used in the attempt log and analytics.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Wordpress => "wordpress",
            OutputFormat::Shopify => "shopify",
            OutputFormat::Ghost => "ghost",
            OutputFormat::Medium => "medium",
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "markdown",
        }
    }

    /// Shopify and plain HTML bodies are HTML; everything else is markdown.
    pub fn is_html(&self) -> bool {
        matches!(self, OutputFormat::Shopify | OutputFormat::Html)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The {title, tldr, body} triple parsed out of a provider response.
///
/// This is the adapter's output; the orchestrator wraps it into an `Article`
/// together with batch context (keyword, approach, format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFields {
    pub title: String,
    pub tldr: String,
    pub body: String,
}

/// SEO linking hints generated for an article.
///
/// Always best-effort: any failure during generation yields
/// [`LinkingSuggestions::fallback`] instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkingSuggestions {
    pub key_terms: Vec<String>,
    pub sections: Vec<String>,
    pub context: String,
}

impl LinkingSuggestions {
    /// Neutral value returned when suggestion generation fails.
    pub fn fallback() -> Self {
        Self {
            key_terms: Vec::new(),
            sections: Vec::new(),
            context: "Consider adding relevant internal and external links to enhance user \
                      experience and SEO."
                .to_string(),
        }
    }
}

/// A finished article variant, owned by the batch result.
///
/// Immutable once created. One keyword may yield several articles when
/// multiple approaches were requested; `approach` distinguishes them and
/// drives the stable display ordering (lexical by label).
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub title: String,
    pub tldr: String,
    pub body: String,

    /// Keyword this article was generated for (back-reference, not ownership)
    pub keyword: String,

    /// Label of the stylistic approach that produced this variant
    pub approach: String,

    /// Format the body was originally generated in
    pub original_format: OutputFormat,

    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub linking_suggestions: Option<LinkingSuggestions>,
}

impl Article {
    pub fn new(fields: PostFields, keyword: &str, approach: &str, format: OutputFormat) -> Self {
        Self {
            title: fields.title,
            tldr: fields.tldr,
            body: fields.body,
            keyword: keyword.to_string(),
            approach: approach.to_string(),
            original_format: format,
            created_at: Utc::now(),
            linking_suggestions: None,
        }
    }
}
