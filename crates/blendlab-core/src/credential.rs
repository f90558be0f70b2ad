// API key persistence.
//
// The key is base64-encoded before it is written so the literal bytes never sit
// in the data directory. This is obfuscation, not encryption: anyone who can
// read the data directory can recover the key.

use crate::error::BlendError;
use crate::storage::{KeyValueStore, CREDENTIAL_KEY};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;

/// Environment variable consulted when no key is stored.
pub const API_KEY_ENV: &str = "BLENDLAB_API_KEY";

/// Where a looked-up key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Stored,
    Environment,
    None,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Stored => "stored",
            KeySource::Environment => "environment",
            KeySource::None => "none",
        }
    }
}

/// Result of a key lookup.
#[derive(Debug, Clone)]
pub struct KeyLookup {
    pub key: Option<String>,
    pub source: KeySource,
}

pub fn encode_key(raw: &str) -> String {
    STANDARD.encode(raw.as_bytes())
}

/// Decode a stored key. Anything that is not base64 of UTF-8 text is returned unchanged.
pub fn decode_key(stored: &str) -> String {
    match STANDARD.decode(stored.trim()) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(key) => key,
            Err(_) => {
                tracing::warn!("stored API key is not valid UTF-8 after decoding, using it as-is");
                stored.to_string()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "stored API key is not base64, using it as-is");
            stored.to_string()
        }
    }
}

/// Render a key for display without revealing it.
pub fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

/// Single-credential store on top of a [`KeyValueStore`].
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    env_var: Option<String>,
}

impl CredentialStore {
    /// Falls back to `BLENDLAB_API_KEY` when no key is stored.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            env_var: Some(API_KEY_ENV.to_string()),
        }
    }

    /// Read the fallback key from `name` instead, or disable the fallback with `None`.
    pub fn with_env_var(mut self, name: Option<&str>) -> Self {
        self.env_var = name.map(str::to_string);
        self
    }

    /// Store a key. Blank input is ignored; surrounding whitespace is trimmed.
    pub fn save(&self, raw: &str) -> Result<(), BlendError> {
        let key = raw.trim();
        if key.is_empty() {
            return Ok(());
        }
        self.store.set(CREDENTIAL_KEY, &encode_key(key))?;
        tracing::info!("API key saved");
        Ok(())
    }

    pub fn get(&self) -> Result<Option<String>, BlendError> {
        let stored = self.store.get(CREDENTIAL_KEY)?;
        Ok(stored
            .filter(|s| !s.trim().is_empty())
            .map(|s| decode_key(&s)))
    }

    pub fn remove(&self) -> Result<(), BlendError> {
        self.store.remove(CREDENTIAL_KEY)?;
        tracing::info!("API key removed");
        Ok(())
    }

    /// Stored key first, then the fallback environment variable.
    pub fn lookup(&self) -> Result<KeyLookup, BlendError> {
        self.lookup_with(|name| std::env::var(name).ok())
    }

    /// Like [`lookup`](Self::lookup), reading variables through `env`.
    pub fn lookup_with<F>(&self, env: F) -> Result<KeyLookup, BlendError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = self.get()? {
            return Ok(KeyLookup {
                key: Some(key),
                source: KeySource::Stored,
            });
        }

        let from_env = self
            .env_var
            .as_deref()
            .and_then(|name| env(name))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if let Some(key) = from_env {
            return Ok(KeyLookup {
                key: Some(key),
                source: KeySource::Environment,
            });
        }

        Ok(KeyLookup {
            key: None,
            source: KeySource::None,
        })
    }
}
