//! Content generator adapter over the Gemini API.
//!
//! The upstream provider returns free text that is *supposed* to be a JSON
//! object but is routinely wrapped in markdown fences, padded with prose, or
//! sprinkled with control characters. Everything that comes back goes through
//! the same pipeline before we trust it:
//!
//! 1. strip non-printable control characters
//! 2. strip markdown code-fence markers
//! 3. slice from the first `{` to the last `}`
//! 4. parse as JSON; on failure, fall back to field-level regex extraction
//! 5. validate: non-empty title/body, recomputed word count >= 400
//!
//! No retries happen at this layer; retry policy belongs to the orchestrator.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::article::{LinkingSuggestions, OutputFormat, PostFields};
use crate::services::prompts::{self, MIN_BODY_WORDS};

/// Seam between the orchestrator and the generation provider.
///
/// `linking_suggestions` cannot fail by contract: it is a best-effort
/// enhancement and any internal failure yields the neutral fallback value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate a post for one keyword in one format, optionally steered by
    /// an approach hint.
    async fn generate<'a>(
        &self,
        keyword: &str,
        format: OutputFormat,
        approach: Option<&'a str>,
    ) -> Result<PostFields, AppError>;

    /// Re-render an existing post into a different target format.
    async fn convert_format(
        &self,
        post: &PostFields,
        from: OutputFormat,
        to: OutputFormat,
    ) -> Result<PostFields, AppError>;

    /// Best-effort SEO linking hints for a finished article.
    async fn linking_suggestions(
        &self,
        title: &str,
        body: &str,
        keyword: &str,
    ) -> LinkingSuggestions;
}

/// Degrade-gracefully wrapper around [`ContentGenerator::convert_format`].
///
/// Conversion failure is deliberately invisible to the end user: the caller
/// gets the original, unconverted fields back instead of an error.
pub async fn convert_or_keep(
    generator: &dyn ContentGenerator,
    post: PostFields,
    from: OutputFormat,
    to: OutputFormat,
) -> PostFields {
    match generator.convert_format(&post, from, to).await {
        Ok(converted) => converted,
        Err(err) => {
            tracing::warn!(%from, %to, error = %err, "format conversion failed, keeping original");
            post
        }
    }
}

/// Production generator talking to the Gemini API over HTTP.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Raw provider call: prompt in, unparsed text out.
    async fn generate_content(&self, prompt: &str) -> Result<String, AppError> {
        let request_body = serde_json::json!({
            "contents": [
                {
                    "parts": [
                        {
                            "text": prompt
                        }
                    ]
                }
            ],
            "generationConfig": {
                "maxOutputTokens": 8192,
                "temperature": 0.7
            }
        });

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::GenerationFailed(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::GenerationFailed(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::GenerationFailed(format!("unreadable response: {e}")))?;

        let text = response_json
            .get("candidates")
            .and_then(|candidates| candidates.get(0))
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.get(0))
            .and_then(|part| part.get("text"))
            .and_then(|text| text.as_str())
            .ok_or_else(|| AppError::GenerationFailed("no content in response".to_string()))?;

        Ok(text.to_string())
    }
}

#[async_trait]
impl ContentGenerator for GeminiGenerator {
    async fn generate<'a>(
        &self,
        keyword: &str,
        format: OutputFormat,
        approach: Option<&'a str>,
    ) -> Result<PostFields, AppError> {
        let prompt = prompts::generation_prompt(keyword, format, approach);
        let raw = self.generate_content(&prompt).await?;
        let post = parse_post_fields(&raw)?;
        validate_body_length(&post)?;

        tracing::info!(keyword, %format, title = %post.title, "post generated");
        Ok(post)
    }

    async fn convert_format(
        &self,
        post: &PostFields,
        from: OutputFormat,
        to: OutputFormat,
    ) -> Result<PostFields, AppError> {
        let prompt = prompts::conversion_prompt(post, from, to);
        let raw = self.generate_content(&prompt).await?;
        // Structural validation only: conversion must not shrink a post that
        // was already accepted, but re-checking the word count here would
        // reject legitimate HTML->markdown length drift
        let converted = parse_post_fields(&raw)?;
        validate_conversion_fields(&converted)?;
        Ok(converted)
    }

    async fn linking_suggestions(
        &self,
        title: &str,
        body: &str,
        keyword: &str,
    ) -> LinkingSuggestions {
        let prompt = prompts::linking_prompt(title, body, keyword);
        match self.generate_content(&prompt).await {
            Ok(raw) => parse_linking_suggestions(&raw).unwrap_or_else(|err| {
                tracing::warn!(keyword, error = %err, "linking suggestions unparseable");
                LinkingSuggestions::fallback()
            }),
            Err(err) => {
                tracing::warn!(keyword, error = %err, "linking suggestions call failed");
                LinkingSuggestions::fallback()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPost {
    title: String,
    #[serde(default)]
    tldr: String,
    body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestions {
    #[serde(default)]
    key_terms: Vec<String>,
    #[serde(default)]
    sections: Vec<String>,
    #[serde(default)]
    context: String,
}

/// Scrub a raw provider payload down to (hopefully) one JSON object.
pub fn clean_json_payload(raw: &str) -> String {
    // Remove control characters and non-printable characters
    let mut cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();

    // Remove markdown code block markers if present
    cleaned = cleaned.replace("```json", "").replace("```", "");

    // Find the first { and last } to extract just the JSON object
    if let (Some(first), Some(last)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if last > first {
            cleaned = cleaned[first..=last].to_string();
        }
    }

    cleaned.trim().to_string()
}

/// Parse `{title, tldr, body}` out of a raw provider payload.
///
/// Tries strict JSON parsing of the cleaned payload first, then falls back
/// to per-field regex extraction, because the provider occasionally emits
/// almost-JSON with unescaped garbage between fields.
pub fn parse_post_fields(raw: &str) -> Result<PostFields, AppError> {
    let cleaned = clean_json_payload(raw);

    let parsed: Option<RawPost> = serde_json::from_str(&cleaned).ok();
    let parsed = match parsed {
        Some(post) => post,
        None => extract_post_fields(&cleaned).ok_or_else(|| {
            AppError::GenerationFailed("unable to parse provider response".to_string())
        })?,
    };

    if parsed.title.trim().is_empty() || parsed.body.trim().is_empty() {
        return Err(AppError::ContentRejected(
            "missing required fields in provider response".to_string(),
        ));
    }

    Ok(PostFields {
        title: parsed.title,
        tldr: parsed.tldr,
        body: parsed.body,
    })
}

/// Field-level regex fallback for almost-JSON payloads.
fn extract_post_fields(text: &str) -> Option<RawPost> {
    let title_re = Regex::new(r#""title"\s*:\s*"([^"]*)""#).ok()?;
    let tldr_re = Regex::new(r#""tldr"\s*:\s*"([^"]*)""#).ok()?;
    let body_re = Regex::new(r#""body"\s*:\s*"((?s:.*?))"\s*[,}]"#).ok()?;

    let title = title_re.captures(text)?.get(1)?.as_str().to_string();
    let tldr = tldr_re
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let body = body_re
        .captures(text)?
        .get(1)?
        .as_str()
        .replace("\\n", "\n")
        .replace("\\\"", "\"");

    Some(RawPost { title, tldr, body })
}

fn parse_linking_suggestions(raw: &str) -> Result<LinkingSuggestions, AppError> {
    let cleaned = clean_json_payload(raw);
    let parsed: RawSuggestions = serde_json::from_str(&cleaned)
        .map_err(|e| AppError::GenerationFailed(format!("bad suggestions payload: {e}")))?;

    Ok(LinkingSuggestions {
        key_terms: parsed.key_terms,
        sections: parsed.sections,
        context: if parsed.context.is_empty() {
            LinkingSuggestions::fallback().context
        } else {
            parsed.context
        },
    })
}

/// Count words in a body, stripping markdown syntax first.
///
/// The provider self-reports word counts that are not trustworthy; this is
/// the count the 400-word floor is enforced against.
pub fn count_words(body: &str) -> usize {
    let mut text = body.to_string();

    // Headers, emphasis, inline code, links, list markers
    for (pattern, replacement) in [
        (r"(?m)^#{1,6}\s", ""),
        (r"\*\*(.*?)\*\*", "$1"),
        (r"\*(.*?)\*", "$1"),
        (r"`(.*?)`", "$1"),
        (r"\[(.*?)\]\(.*?\)", "$1"),
        (r"(?m)^\s*[-*+]\s", ""),
        (r"(?m)^\s*\d+\.\s", ""),
        (r"<[^>]+>", " "),
    ] {
        if let Ok(re) = Regex::new(pattern) {
            text = re.replace_all(&text, replacement).into_owned();
        }
    }

    text.split_whitespace().filter(|w| !w.is_empty()).count()
}

/// Conversion must carry every field over; a response that dropped the tldr
/// is unusable even though `tldr` is optional when parsing generation output.
fn validate_conversion_fields(post: &PostFields) -> Result<(), AppError> {
    if post.tldr.trim().is_empty() {
        return Err(AppError::ContentRejected(
            "conversion response missing tldr".to_string(),
        ));
    }
    Ok(())
}

fn validate_body_length(post: &PostFields) -> Result<(), AppError> {
    let words = count_words(&post.body);
    if words < MIN_BODY_WORDS {
        return Err(AppError::ContentRejected(format!(
            "body too short: {words} words, minimum {MIN_BODY_WORDS}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_body(words: usize) -> String {
        vec!["word"; words].join(" ")
    }

    #[test]
    fn cleans_fences_and_control_characters() {
        let raw = format!(
            "```json\n{{\"title\": \"T\", \"tldr\": \"S\", \"body\": \"{}\"}}\n```",
            long_body(5)
        );
        let post = parse_post_fields(&raw).unwrap();
        assert_eq!(post.title, "T");

        let raw = "noise before {\"title\": \"T\", \"tldr\": \"S\", \"body\": \"B\"} noise after";
        assert_eq!(parse_post_fields(raw).unwrap().body, "B");

        let raw = "{\"title\": \"T\",\u{1}\u{7f} \"tldr\": \"S\", \"body\": \"B\"}";
        assert!(parse_post_fields(raw).is_ok());
    }

    #[test]
    fn regex_fallback_handles_almost_json() {
        // Trailing comma makes this invalid JSON; field extraction saves it
        let raw = r#"{"title": "My Title", "tldr": "Summary", "body": "line one\nline two",}"#;
        let post = parse_post_fields(raw).unwrap();
        assert_eq!(post.title, "My Title");
        assert_eq!(post.body, "line one\nline two");
    }

    #[test]
    fn missing_fields_are_rejected() {
        let raw = r#"{"title": "", "tldr": "S", "body": "B"}"#;
        assert!(matches!(
            parse_post_fields(raw),
            Err(AppError::ContentRejected(_))
        ));

        assert!(matches!(
            parse_post_fields("complete garbage with no braces"),
            Err(AppError::GenerationFailed(_))
        ));
    }

    #[test]
    fn word_count_ignores_markdown_syntax() {
        let body = "## Heading\n\n**bold** and *italic* and `code`\n- item one\n1. item two\n[link text](https://x)";
        // heading, bold, and, italic, and, code, item, one, item, two, link, text
        assert_eq!(count_words(body), 12);
    }

    #[test]
    fn word_count_ignores_html_tags() {
        let body = "<h2>Heading</h2><p>two words</p>";
        assert_eq!(count_words(body), 3);
    }

    #[test]
    fn short_bodies_fail_validation() {
        let post = PostFields {
            title: "T".into(),
            tldr: "S".into(),
            body: long_body(MIN_BODY_WORDS - 1),
        };
        assert!(matches!(
            validate_body_length(&post),
            Err(AppError::ContentRejected(_))
        ));

        let post = PostFields {
            title: "T".into(),
            tldr: "S".into(),
            body: long_body(MIN_BODY_WORDS),
        };
        assert!(validate_body_length(&post).is_ok());
    }

    #[test]
    fn conversion_without_tldr_is_rejected() {
        let post = PostFields {
            title: "T".into(),
            tldr: "  ".into(),
            body: "B".into(),
        };
        assert!(matches!(
            validate_conversion_fields(&post),
            Err(AppError::ContentRejected(_))
        ));

        let post = PostFields {
            title: "T".into(),
            tldr: "Summary".into(),
            body: "B".into(),
        };
        assert!(validate_conversion_fields(&post).is_ok());
    }

    #[test]
    fn suggestions_parse_and_default() {
        let raw = r#"{"keyTerms": ["a"], "sections": ["b"], "context": "c"}"#;
        let parsed = parse_linking_suggestions(raw).unwrap();
        assert_eq!(parsed.key_terms, vec!["a"]);
        assert_eq!(parsed.context, "c");

        let parsed = parse_linking_suggestions(r#"{"keyTerms": []}"#).unwrap();
        assert_eq!(parsed.context, LinkingSuggestions::fallback().context);
    }

    #[tokio::test]
    async fn convert_or_keep_falls_back_bit_for_bit() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_convert_format()
            .returning(|_, _, _| Err(AppError::GenerationFailed("boom".into())));

        let original = PostFields {
            title: "Title".into(),
            tldr: "Tldr".into(),
            body: "Body".into(),
        };
        let result = convert_or_keep(
            &generator,
            original.clone(),
            OutputFormat::Wordpress,
            OutputFormat::Shopify,
        )
        .await;

        assert_eq!(result, original);
    }

    #[tokio::test]
    async fn convert_or_keep_uses_conversion_when_it_succeeds() {
        let mut generator = MockContentGenerator::new();
        generator.expect_convert_format().returning(|_, _, _| {
            Ok(PostFields {
                title: "Converted".into(),
                tldr: "Converted".into(),
                body: "Converted".into(),
            })
        });

        let original = PostFields {
            title: "Title".into(),
            tldr: "Tldr".into(),
            body: "Body".into(),
        };
        let result = convert_or_keep(
            &generator,
            original,
            OutputFormat::Wordpress,
            OutputFormat::Ghost,
        )
        .await;

        assert_eq!(result.title, "Converted");
    }
}
