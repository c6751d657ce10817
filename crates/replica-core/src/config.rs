use std::collections::HashMap;

use thiserror::Error;

/// Application configuration, read once at startup from the environment
/// with `.env` fallback, then passed into the client explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key (`GEMINI_API_KEY`). Required.
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Reasoning budget hint attached verbatim to every request.
    pub thinking_budget: u32,
    /// Client-level timeout for the single outbound call.
    pub timeout_secs: u64,
    /// Log destination; the TUI owns the screen, so logs go to a file.
    pub log_file: String,
}

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_THINKING_BUDGET: u32 = 2048;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY não configurada (defina no ambiente ou em .env)")]
    MissingApiKey,
}

fn parse_dotenv_str(contents: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    map
}

fn parse_dotenv() -> HashMap<String, String> {
    match std::fs::read_to_string(".env") {
        Ok(contents) => parse_dotenv_str(&contents),
        Err(_) => HashMap::new(),
    }
}

fn get(key: &str, dotenv: &HashMap<String, String>) -> Option<String> {
    std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
}

fn get_str(key: &str, dotenv: &HashMap<String, String>, default: &str) -> String {
    get(key, dotenv).unwrap_or_else(|| default.to_string())
}

fn get_u32(key: &str, dotenv: &HashMap<String, String>, default: u32) -> u32 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_u64(key: &str, dotenv: &HashMap<String, String>, default: u64) -> u64 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let dotenv = parse_dotenv();

        let api_key = get("GEMINI_API_KEY", &dotenv)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Config {
            api_key,
            model: get_str("REPLICA_MODEL", &dotenv, DEFAULT_MODEL),
            base_url: get_str("REPLICA_BASE_URL", &dotenv, DEFAULT_BASE_URL),
            thinking_budget: get_u32("REPLICA_THINKING_BUDGET", &dotenv, DEFAULT_THINKING_BUDGET),
            timeout_secs: get_u64("REPLICA_TIMEOUT_S", &dotenv, DEFAULT_TIMEOUT_SECS),
            log_file: get_str("REPLICA_LOG_FILE", &dotenv, "replica.log"),
        })
    }
}
