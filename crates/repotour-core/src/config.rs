//! Runtime configuration from environment variables.
//!
//! Secrets are read and handed to clients, never stored anywhere else.
//! A missing required key fails before any client is built.

use std::time::Duration;

use llm_gateway::{
    ProviderConfig, GEMINI_API_BASE_URL, GEMINI_DEFAULT_MODEL, GROQ_API_BASE_URL,
    GROQ_DEFAULT_MODEL,
};

use crate::domain::{Result, TourError};
use crate::github::{GitHubConfig, DEFAULT_HTTP_TIMEOUT, GITHUB_API_URL};
use crate::walker::DEFAULT_BRANCHES;

pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const GITHUB_API_ENV: &str = "REPOTOUR_GITHUB_API";
pub const HTTP_TIMEOUT_ENV: &str = "REPOTOUR_HTTP_TIMEOUT_SECS";
pub const MAX_PROMPT_CHARS_ENV: &str = "REPOTOUR_MAX_PROMPT_CHARS";
pub const BRANCHES_ENV: &str = "REPOTOUR_BRANCHES";

#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub github: GitHubConfig,
    pub max_prompt_chars: Option<usize>,
    pub branches: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout = match get(HTTP_TIMEOUT_ENV) {
            Some(raw) => Duration::from_secs(parse_number(HTTP_TIMEOUT_ENV, &raw)?),
            None => DEFAULT_HTTP_TIMEOUT,
        };
        let max_prompt_chars = get(MAX_PROMPT_CHARS_ENV)
            .map(|raw| parse_number(MAX_PROMPT_CHARS_ENV, &raw).map(|n| n as usize))
            .transpose()?;
        let branches = match get(BRANCHES_ENV) {
            Some(raw) => {
                let list: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|b| !b.is_empty())
                    .map(str::to_string)
                    .collect();
                if list.is_empty() {
                    return Err(TourError::Config(format!("{BRANCHES_ENV} lists no branches")));
                }
                list
            }
            None => DEFAULT_BRANCHES.iter().map(|b| b.to_string()).collect(),
        };

        let api_url = get(GITHUB_API_ENV).unwrap_or_else(|| GITHUB_API_URL.to_string());
        let mut github = GitHubConfig::new(&api_url).with_timeout(timeout);
        if let Some(token) = get(GITHUB_TOKEN) {
            github = github.with_token(&token);
        }

        Ok(Config {
            groq_api_key: get(GROQ_API_KEY),
            gemini_api_key: get(GEMINI_API_KEY),
            github,
            max_prompt_chars,
            branches,
        })
    }

    /// Provider settings for the architecture review model.
    pub fn groq(&self) -> Result<ProviderConfig> {
        let key = require(&self.groq_api_key, GROQ_API_KEY)?;
        Ok(ProviderConfig::new(key, GROQ_DEFAULT_MODEL, GROQ_API_BASE_URL)
            .with_max_prompt_chars(self.max_prompt_chars))
    }

    /// Provider settings for the guided tour model.
    pub fn gemini(&self) -> Result<ProviderConfig> {
        let key = require(&self.gemini_api_key, GEMINI_API_KEY)?;
        Ok(ProviderConfig::new(key, GEMINI_DEFAULT_MODEL, GEMINI_API_BASE_URL)
            .with_max_prompt_chars(self.max_prompt_chars))
    }
}

fn require<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value.as_deref().ok_or_else(|| TourError::MissingSecret {
        name: name.to_string(),
    })
}

fn parse_number(name: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>().map_err(|_| {
        TourError::Config(format!("{name} must be a non-negative integer, got '{raw}'"))
    })
}
