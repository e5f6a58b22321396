// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for Shutter

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Vision API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Naming rules
    #[serde(default)]
    pub rules: RuleConfig,

    /// Prompt sent to the vision model
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RuleConfig {
    /// Maximum length of an AI-derived slug
    #[serde(default = "default_max_slug_length")]
    pub max_slug_length: usize,
}

// Default value functions
fn default_api_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_model() -> String { "gpt-4o".to_string() }
fn default_timeout() -> u64 { 60 }
fn default_max_tokens() -> u32 { 50 }
fn default_max_slug_length() -> usize { 50 }

fn default_prompt() -> String {
    "Analyze this screenshot and generate a concise, descriptive filename \
     (2-4 words, without extension). Use lowercase letters, numbers, and \
     hyphens only. No spaces. Describe the main content or purpose of the \
     screenshot. Examples: 'login-page', 'error-message', 'dashboard-view'. \
     Return ONLY the filename."
        .to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_slug_length: default_max_slug_length(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            rules: RuleConfig::default(),
            prompt: default_prompt(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::ShutterError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
