use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::env;
use std::time::Duration;

use crate::services::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub model_timeout: Duration,
    pub bind_addr: String,
    pub session_secret: String,
    pub session_idle: chrono::Duration,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_key = lookup("API_KEY").context("API_KEY must be set in .env file")?;

        let timeout_secs: u64 = get("MODEL_TIMEOUT_SECS", "120")
            .parse()
            .context("MODEL_TIMEOUT_SECS must be a whole number of seconds")?;
        let idle_minutes: u32 = get("SESSION_IDLE_MINUTES", "60")
            .parse()
            .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?;
        if idle_minutes == 0 {
            anyhow::bail!("SESSION_IDLE_MINUTES must be at least 1");
        }

        let session_secret = match lookup("SESSION_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                log::warn!("⚠️ SESSION_SECRET not set, deriving a per-process secret (sessions reset on restart)");
                derive_session_secret(&api_key)
            }
        };

        Ok(Self {
            api_key,
            model: get("GEMINI_MODEL", DEFAULT_MODEL),
            api_base: get("GEMINI_API_BASE", DEFAULT_API_BASE),
            model_timeout: Duration::from_secs(timeout_secs),
            bind_addr: get("BIND_ADDR", "0.0.0.0:8501"),
            session_secret,
            session_idle: chrono::Duration::minutes(i64::from(idle_minutes)),
            static_dir: get("STATIC_DIR", "static"),
        })
    }
}

fn derive_session_secret(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hasher.update(chrono::Utc::now().to_rfc3339().as_bytes());
    hasher.update(std::process::id().to_le_bytes());
    hex::encode(hasher.finalize())
}
