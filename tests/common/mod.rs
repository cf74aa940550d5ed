//! Shared test fixtures: scripted generator and state wiring.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use keyword_alchemist::error::AppError;
use keyword_alchemist::models::access_key::AccessKey;
use keyword_alchemist::models::article::{LinkingSuggestions, OutputFormat, PostFields};
use keyword_alchemist::services::generator::ContentGenerator;
use keyword_alchemist::services::rate_limit::RateLimiter;
use keyword_alchemist::state::AppState;
use keyword_alchemist::store::memory::MemoryStore;

/// Generator double with per-(keyword, approach) scripted failures and a
/// call counter.
#[derive(Default)]
pub struct ScriptedGenerator {
    fail_for: HashSet<(String, String)>,
    generate_calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Script the (keyword, approach) pair to fail.
    pub fn failing_for(mut self, keyword: &str, approach: &str) -> Self {
        self.fail_for
            .insert((keyword.to_string(), approach.to_string()));
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate<'a>(
        &self,
        keyword: &str,
        _format: OutputFormat,
        approach: Option<&'a str>,
    ) -> Result<PostFields, AppError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);

        let approach = approach.unwrap_or("standard");
        if self
            .fail_for
            .contains(&(keyword.to_string(), approach.to_string()))
        {
            return Err(AppError::GenerationFailed(format!(
                "scripted failure for {keyword}/{approach}"
            )));
        }

        Ok(PostFields {
            title: format!("All about {keyword}"),
            tldr: format!("A short summary of {keyword}."),
            body: format!("## {keyword}\n\nGenerated body for approach {approach}."),
        })
    }

    async fn convert_format(
        &self,
        post: &PostFields,
        _from: OutputFormat,
        to: OutputFormat,
    ) -> Result<PostFields, AppError> {
        Ok(PostFields {
            title: post.title.clone(),
            tldr: post.tldr.clone(),
            body: format!("[{to}] {}", post.body),
        })
    }

    async fn linking_suggestions(
        &self,
        _title: &str,
        _body: &str,
        keyword: &str,
    ) -> LinkingSuggestions {
        LinkingSuggestions {
            key_terms: vec![keyword.to_string()],
            sections: vec![format!("{keyword} basics")],
            context: "test suggestions".to_string(),
        }
    }
}

pub const ADMIN_SECRET: &str = "test-admin-secret";

/// App state over a fresh memory store and the given generator. The rate
/// limiter is effectively unlimited so tests never sleep.
pub fn test_state(store: MemoryStore, generator: Arc<ScriptedGenerator>) -> AppState {
    AppState {
        store: Arc::new(store),
        generator,
        limiter: Arc::new(RateLimiter::new(10_000.0, 100)),
        admin_secret: ADMIN_SECRET.to_string(),
    }
}

/// Seed a key with a given balance already partially consumed.
pub async fn seed_key(store: &MemoryStore, id: &str, total: u32, used: i32) {
    let mut key = AccessKey::new(id.to_string(), "basic".to_string(), total, None);
    key.credits_used = used;
    store.insert_key(key).await;
}

/// Unlimited rate limiter for direct orchestrator calls.
pub fn fast_limiter() -> RateLimiter {
    RateLimiter::new(10_000.0, 100)
}
