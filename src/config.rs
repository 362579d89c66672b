// src/config.rs
// =============================================================================
// Settings and credentials, loaded once at startup.
//
// Where values come from (later wins):
// 1. Built-in defaults
// 2. A TOML file: --config <path>, or config.toml in the platform config dir
//    (e.g. ~/.config/scrape-workshop/config.toml on Linux)
// 3. Environment variables for the credentials (GUARDIAN_API_KEY, ...)
//
// Example config.toml:
//
//   [http]
//   timeout_secs = 20
//   delay_ms = 500
//
//   [credentials]
//   guardian_api_key = "..."
//   oed_app_id = "..."
//   oed_app_key = "..."
//
// A missing file is fine. A file that exists but doesn't parse is an error.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::oxford::OxfordCredentials;
use crate::fetch::DEFAULT_USER_AGENT;
use crate::sweep::Politeness;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Pause between requests in sweeps and batches.
    pub delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            delay_ms: 100,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn politeness(&self) -> Politeness {
        Politeness::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub guardian_api_key: Option<String>,
    pub oed_app_id: Option<String>,
    pub oed_app_key: Option<String>,
    pub yelp_api_key: Option<String>,
    pub twitter_bearer_token: Option<String>,
}

/// (environment variable, config key) for every credential.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("GUARDIAN_API_KEY", "guardian_api_key"),
    ("OED_APP_ID", "oed_app_id"),
    ("OED_APP_KEY", "oed_app_key"),
    ("YELP_API_KEY", "yelp_api_key"),
    ("TWITTER_BEARER_TOKEN", "twitter_bearer_token"),
];

impl Credentials {
    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "guardian_api_key" => Some(&mut self.guardian_api_key),
            "oed_app_id" => Some(&mut self.oed_app_id),
            "oed_app_key" => Some(&mut self.oed_app_key),
            "yelp_api_key" => Some(&mut self.yelp_api_key),
            "twitter_bearer_token" => Some(&mut self.twitter_bearer_token),
            _ => None,
        }
    }

    /// Applies overrides from `lookup` (normally `std::env::var`).
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for &(var, key) in ENV_OVERRIDES {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                if let Some(slot) = self.slot(key) {
                    *slot = Some(value);
                }
            }
        }
    }

    pub fn guardian(&self) -> Result<&str> {
        require(&self.guardian_api_key, "GUARDIAN_API_KEY", "guardian_api_key")
    }

    pub fn yelp(&self) -> Result<&str> {
        require(&self.yelp_api_key, "YELP_API_KEY", "yelp_api_key")
    }

    pub fn twitter(&self) -> Result<&str> {
        require(&self.twitter_bearer_token, "TWITTER_BEARER_TOKEN", "twitter_bearer_token")
    }

    pub fn oxford(&self) -> Result<OxfordCredentials> {
        Ok(OxfordCredentials {
            app_id: require(&self.oed_app_id, "OED_APP_ID", "oed_app_id")?.to_string(),
            app_key: require(&self.oed_app_key, "OED_APP_KEY", "oed_app_key")?.to_string(),
        })
    }
}

fn require<'a>(value: &'a Option<String>, var: &str, key: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| anyhow!("Missing credential: set {} or [credentials].{} in the config file", var, key))
}

impl Config {
    /// Parses a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Invalid config file")?;
        if config.http.timeout_secs == 0 {
            return Err(anyhow!("[http].timeout_secs must be at least 1"));
        }
        Ok(config)
    }

    /// Loads the config file (if any) and applies environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => default_path(),
        };

        let mut config = match path {
            Some(p) if p.exists() => {
                let text = std::fs::read_to_string(&p)
                    .with_context(|| format!("Failed to read config {}", p.display()))?;
                Self::from_toml(&text).with_context(|| format!("In {}", p.display()))?
            }
            Some(p) if explicit.is_some() => {
                return Err(anyhow!("Config file {} does not exist", p.display()));
            }
            _ => Config::default(),
        };

        config.credentials.apply_env(|var| std::env::var(var).ok());
        Ok(config)
    }
}

/// `config.toml` in the platform config directory.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "scrape-workshop", "scrape-workshop")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
