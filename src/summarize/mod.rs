//! Conversation title generation
//!
//! Two strategies, picked once at construction:
//! - word truncation: first five whitespace-separated words, no I/O
//! - generative: ask an [`LlmProvider`] for an emoji-prefixed title of four words or
//!   fewer, guided by a fixed [`scaffold::TitleScaffold`]
//!
//! Generative failures are logged and reported as `None`. Falling back to truncation
//! after a failure is left to the caller.

pub mod scaffold;

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::SummarizationConfig;
use crate::llm::{ChatMessage, LlmProvider};
use scaffold::{TitleScaffold, DEFAULT_EMOJI};

/// Words kept by the truncation strategy
pub const FALLBACK_WORD_LIMIT: usize = 5;

/// Leading characters inspected for an emoji
const EMOJI_WINDOW: usize = 3;

static EMOJI: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Emoji}").expect("valid emoji regex"));

/// True if any of the first three characters is an emoji code point.
/// The window counts `char`s, so an astral emoji at position two or three is
/// seen whole rather than as half a surrogate pair.
pub fn starts_with_emoji(text: &str) -> bool {
    let head: String = text.chars().take(EMOJI_WINDOW).collect();
    EMOJI.is_match(&head)
}

/// Prefix the default emoji unless the text already opens with one
pub fn ensure_emoji_prefix(summary: String) -> String {
    if starts_with_emoji(&summary) {
        summary
    } else {
        format!("{} {}", DEFAULT_EMOJI, summary)
    }
}

/// First five words, single-space separated
pub fn truncate_words(text: &str) -> String {
    text.split_whitespace()
        .take(FALLBACK_WORD_LIMIT)
        .collect::<Vec<_>>()
        .join(" ")
}

enum Strategy {
    Truncate,
    Generative {
        provider: Arc<dyn LlmProvider>,
        scaffold: &'static TitleScaffold,
    },
}

pub struct TitleSummarizer {
    strategy: Strategy,
}

impl TitleSummarizer {
    /// Local word truncation; never calls out
    pub fn truncating() -> Self {
        Self {
            strategy: Strategy::Truncate,
        }
    }

    pub fn generative(provider: Arc<dyn LlmProvider>, scaffold: &'static TitleScaffold) -> Self {
        Self {
            strategy: Strategy::Generative { provider, scaffold },
        }
    }

    /// Generative when enabled in `config` and a provider is supplied
    pub fn from_config(config: &SummarizationConfig, provider: Option<Arc<dyn LlmProvider>>) -> Self {
        match provider {
            Some(provider) if config.enabled => {
                Self::generative(provider, TitleScaffold::for_locale(config.locale))
            }
            _ => Self::truncating(),
        }
    }

    pub fn is_generative(&self) -> bool {
        matches!(self.strategy, Strategy::Generative { .. })
    }

    /// Title for `text`. Truncation always yields `Some`; generative mode yields
    /// `None` when the backend fails.
    pub async fn summarize(&self, text: &str) -> Option<String> {
        match &self.strategy {
            Strategy::Truncate => Some(truncate_words(text)),
            Strategy::Generative { provider, scaffold } => {
                Self::generate(provider.as_ref(), scaffold, text).await
            }
        }
    }

    async fn generate(
        provider: &dyn LlmProvider,
        scaffold: &TitleScaffold,
        text: &str,
    ) -> Option<String> {
        let messages = scaffold
            .turns(text)
            .into_iter()
            .map(|turn| ChatMessage::new(turn.from.as_str(), turn.content))
            .collect();

        match provider.chat(messages, scaffold.persona.to_string()).await {
            Ok(response) => {
                debug!(
                    provider = provider.name(),
                    latency_ms = response.metadata.latency_ms,
                    scaffold_version = scaffold.version,
                    "Title generated"
                );
                Some(ensure_emoji_prefix(response.content))
            }
            Err(e) => {
                error!(provider = provider.name(), "Title generation failed: {:#}", e);
                None
            }
        }
    }
}
