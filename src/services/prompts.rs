//! Prompt templates for the generation provider.
//!
//! One template per output format, each demanding a single JSON object with
//! `title`, `tldr`, and `body` fields and a body of at least 400 words. The
//! `{{KEYWORD}}` placeholder is substituted at call time; an approach hint,
//! when present, is appended as a "Special Focus" line.

use crate::models::article::{OutputFormat, PostFields};

/// Minimum body length demanded from the provider and re-verified locally.
pub const MIN_BODY_WORDS: usize = 400;

const JSON_SHAPE: &str = r#"Output the result as a single, valid JSON object with the following structure:
{
  "title": "SEO-friendly title",
  "tldr": "2-3 sentence summary",
  "body": "400+ word post body"
}"#;

fn format_instructions(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Wordpress => {
            "You are an expert blog post writer and SEO specialist. The output must be suitable \
             for direct pasting into a WordPress editor.\n\
             - Format the body in clean, standard Markdown: `##` headings, `###` sub-headings, \
             bullet or numbered lists, `**bold**` emphasis.\n\
             - Start with a compelling introduction and end with a strong conclusion."
        }
        OutputFormat::Shopify => {
            "You are an expert e-commerce content writer specializing in Shopify blog posts with \
             a commercial focus.\n\
             - Format the body in clean HTML: `<h2>`/`<h3>` headings, `<ul>`/`<ol>` lists, \
             `<strong>` emphasis, `<p>` paragraphs.\n\
             - Focus on customer benefits and include subtle calls-to-action."
        }
        OutputFormat::Ghost => {
            "You are an expert content writer for Ghost CMS publications.\n\
             - Format the body in clean Markdown optimized for Ghost: `##`/`###` headings, `- ` \
             bullets, `**bold**` emphasis.\n\
             - Focus on deep insights, expert analysis, and actionable takeaways."
        }
        OutputFormat::Medium => {
            "You are an expert Medium writer creating engaging, thought-provoking articles.\n\
             - Format the body in Markdown with `##`/`###` headings and `* ` lists.\n\
             - Write in a conversational, personal tone with storytelling elements."
        }
        OutputFormat::Html => {
            "You are an expert web content writer producing clean, semantic HTML.\n\
             - Use `<h2>`/`<h3>` headings, `<p>` paragraphs, `<ul>`/`<ol>` lists, `<strong>` and \
             `<em>` for emphasis. All HTML must be valid."
        }
        OutputFormat::Markdown => {
            "You are an expert technical writer producing clean, portable Markdown.\n\
             - Use `##`/`###` headings, `- ` bullets, numbered lists, and `**bold**`/`*italic*` \
             emphasis. Keep formatting portable across platforms."
        }
    }
}

/// Build the generation prompt for one keyword.
pub fn generation_prompt(keyword: &str, format: OutputFormat, approach: Option<&str>) -> String {
    let mut prompt = format!(
        "{instructions}\n\n\
         **Keyword:** {keyword}\n\n\
         **Requirements:**\n\
         1. The 'body' must be at least {MIN_BODY_WORDS} words; the TL;DR does not count.\n\
         2. Research the keyword and provide fresh, factual, genuinely useful information.\n\
         3. NO LINKS: do not include any hyperlinks, URLs, or link markup. The blog owner \
         handles all linking decisions.\n\
         4. The 'tldr' is a 2-3 sentence summary and must NOT be repeated inside the body.\n\n\
         {JSON_SHAPE}",
        instructions = format_instructions(format),
    );

    if let Some(hint) = approach {
        prompt.push_str("\n\n**Special Focus:** ");
        prompt.push_str(hint);
    }

    prompt
}

/// Build the format-conversion prompt for an existing post.
pub fn conversion_prompt(post: &PostFields, from: OutputFormat, to: OutputFormat) -> String {
    format!(
        "You are a content format conversion expert. Convert the following blog post from \
         {from} format to {to} format while preserving all content and meaning.\n\n\
         **Original Title:** {title}\n\
         **Original TLDR:** {tldr}\n\
         **Original Body ({from} format):**\n{body}\n\n\
         **Instructions:**\n\
         1. Adjust formatting to be optimal for {to}.\n\
         2. Keep the same word count and depth of content.\n\
         3. NO LINKS: do not include any hyperlinks, URLs, or link markup.\n\n\
         {JSON_SHAPE}",
        title = post.title,
        tldr = post.tldr,
        body = post.body,
    )
}

/// Build the linking-suggestion prompt for a finished article.
pub fn linking_prompt(title: &str, body: &str, keyword: &str) -> String {
    format!(
        "You are an SEO linking expert. Analyze the following blog post and provide specific \
         linking suggestions valuable for SEO and user experience.\n\n\
         **Title:** {title}\n\
         **Main Keyword:** {keyword}\n\
         **Content:**\n{body}\n\n\
         **Instructions:**\n\
         1. Identify 5-8 key terms from this specific article that would make excellent anchor \
         text for internal links.\n\
         2. Identify 3-5 section topics that could link to authoritative external sources.\n\
         3. Be specific to THIS article; avoid generic terms like \"click here\" or broad \
         concepts like \"business\".\n\n\
         Output the result as a single, valid JSON object with the following structure:\n\
         {{\n  \"keyTerms\": [\"term 1\", \"term 2\"],\n  \"sections\": [\"topic 1\", \
         \"topic 2\"],\n  \"context\": \"Why these linking opportunities are valuable\"\n}}"
    )
}
