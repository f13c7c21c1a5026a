// src/config/mod.rs
// Environment-based configuration. Every value has a default; nothing is global.

use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn, Level};

use crate::summarize::scaffold::TitleLocale;

#[derive(Debug, Clone)]
pub struct Config {
    // ── Database
    pub database_url: String,
    pub sqlite_max_connections: u32,
    pub database_timeout: u64,
    pub migrations_dir: String,

    // ── Server
    pub host: String,
    pub port: u16,

    // ── Title summarization
    pub summarization: SummarizationConfig,

    // ── Logging
    pub log_level: String,

    /// Values that were rejected while loading and replaced by defaults
    pub warnings: Vec<String>,
}

/// Settings for the title summarizer and the LLM backend it talks to
#[derive(Debug, Clone)]
pub struct SummarizationConfig {
    /// Generative mode when true, word truncation otherwise
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: u64,
    pub locale: TitleLocale,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 32,
            timeout: 30,
            locale: TitleLocale::English,
        }
    }
}

impl SummarizationConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Strip a trailing ` # comment` and surrounding whitespace.
/// A `#` only opens a comment at the start of the value or after whitespace, so
/// URLs and keys containing `#` survive.
fn clean_value(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    let cut = (0..bytes.len())
        .find(|&i| bytes[i] == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()))
        .unwrap_or(bytes.len());
    raw[..cut].trim()
}

fn parse_bool(value: &str) -> Option<bool> {
    match clean_value(value).to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Environment lookups that remember every value rejected in favor of a default.
/// Loading runs before the tracing subscriber exists, so nothing is logged here.
struct EnvReader<F> {
    lookup: F,
    warnings: Vec<String>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(lookup: F) -> Self {
        Self {
            lookup,
            warnings: Vec::new(),
        }
    }

    fn var_or<T: FromStr>(&mut self, key: &str, default: T) -> T {
        let Some(val) = (self.lookup)(key) else {
            return default;
        };
        match clean_value(&val).parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                self.warnings
                    .push(format!("{} = '{}' (parse failed, using default)", key, val));
                default
            }
        }
    }

    fn bool(&mut self, key: &str) -> Option<bool> {
        let val = (self.lookup)(key)?;
        let parsed = parse_bool(&val);
        if parsed.is_none() {
            self.warnings
                .push(format!("{} = '{}' (not a boolean, ignored)", key, val));
        }
        parsed
    }

    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| clean_value(&v).to_string())
            .filter(|v| !v.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./convo.db?mode=rwc".to_string(),
            sqlite_max_connections: 10,
            database_timeout: 10,
            migrations_dir: "./migrations".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            summarization: SummarizationConfig::default(),
            log_level: "info".to_string(),
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Build configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    /// Rejected values are kept in `warnings` and logged by [`Config::log_summary`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let summary_defaults = defaults.summarization;
        let mut env = EnvReader::new(lookup);

        // The legacy misspelled flag is still accepted
        let enabled = env
            .bool("LLM_SUMMARIZATION")
            .or_else(|| env.bool("LLM_SUMMERIZATION"))
            .unwrap_or(summary_defaults.enabled);

        let locale = match env.optional("TITLE_LOCALE") {
            Some(raw) => match raw.parse::<TitleLocale>() {
                Ok(locale) => locale,
                Err(e) => {
                    env.warnings.push(format!("{}, using default", e));
                    summary_defaults.locale
                }
            },
            None => summary_defaults.locale,
        };

        let database_url = env.var_or("DATABASE_URL", defaults.database_url);
        let sqlite_max_connections =
            env.var_or("SQLITE_MAX_CONNECTIONS", defaults.sqlite_max_connections);
        let database_timeout = env.var_or("DATABASE_TIMEOUT", defaults.database_timeout);
        let migrations_dir = env.var_or("MIGRATIONS_DIR", defaults.migrations_dir);
        let host = env.var_or("HOST", defaults.host);
        let port = env.var_or("PORT", defaults.port);

        let summarization = SummarizationConfig {
            enabled,
            base_url: env.var_or("LLM_BASE_URL", summary_defaults.base_url),
            api_key: env.optional("LLM_API_KEY"),
            model: env.var_or("LLM_MODEL", summary_defaults.model),
            max_tokens: env.var_or("LLM_MAX_TOKENS", summary_defaults.max_tokens),
            timeout: env.var_or("LLM_TIMEOUT", summary_defaults.timeout),
            locale,
        };

        let log_level = env.var_or("LOG_LEVEL", defaults.log_level);
        if log_level.parse::<Level>().is_err() {
            env.warnings
                .push(format!("LOG_LEVEL = '{}' (unknown level, using info)", log_level));
        }

        Self {
            database_url,
            sqlite_max_connections,
            database_timeout,
            migrations_dir,
            host,
            port,
            summarization,
            log_level,
            warnings: env.warnings,
        }
    }

    /// Tracing level from `LOG_LEVEL`, falling back to INFO
    pub fn tracing_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Log the effective configuration (without secrets) and any rejected values
    pub fn log_summary(&self) {
        for warning in &self.warnings {
            warn!("Config: {}", warning);
        }
        info!(database = %self.database_url, bind = %self.bind_address(), "Configuration loaded");
        if self.summarization.enabled {
            info!(
                model = %self.summarization.model,
                base_url = %self.summarization.base_url,
                locale = %self.summarization.locale,
                api_key = self.summarization.api_key.is_some(),
                "Title summarization: generative"
            );
        } else {
            info!("Title summarization: word truncation (LLM_SUMMARIZATION disabled)");
        }
    }
}
