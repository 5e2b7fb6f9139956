use serde::{Deserialize, Serialize};

use crate::error::BrowserError;

#[cfg(not(target_arch = "wasm32"))]
use std::{
    fs::{read_to_string, write},
    path::PathBuf,
};

pub const DEFAULT_OIDC_ISSUER: &str = "https://inrupt.net";
pub const DEFAULT_REDIRECT_URL: &str = "https://localhost:8000/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Identity provider offered by the login button
    pub oidc_issuer: String,
    /// Where the identity provider sends the user back to
    pub redirect_url: String,
    /// Resource opened after login. Falls back to the user's storage root.
    pub start_uri: Option<String>,
    /// Options of the editor's content type selector
    pub content_types: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        BrowserConfig {
            oidc_issuer: DEFAULT_OIDC_ISSUER.to_string(),
            redirect_url: DEFAULT_REDIRECT_URL.to_string(),
            start_uri: None,
            content_types: vec![
                "text/plain".to_string(),
                "application/json".to_string(),
                "text/turtle".to_string(),
            ],
        }
    }
}

impl BrowserConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, BrowserError> {
        let config: BrowserConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, BrowserError> {
        Ok(toml::to_string(self)?)
    }

    fn validate(&self) -> Result<(), BrowserError> {
        url::Url::parse(&self.oidc_issuer)?;
        url::Url::parse(&self.redirect_url)?;
        if let Some(start) = &self.start_uri {
            url::Url::parse(start)?;
        }
        if self.content_types.is_empty() {
            return Err(BrowserError::Config(
                "content_types must list at least one media type".to_string(),
            ));
        }
        Ok(())
    }
}

pub trait ConfigProvider {
    fn load(&self) -> Result<BrowserConfig, BrowserError>;
    fn store(&self, config: &BrowserConfig) -> Result<(), BrowserError>;
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl TomlConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigProvider { path }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ConfigProvider for TomlConfigProvider {
    fn load(&self) -> Result<BrowserConfig, BrowserError> {
        tracing::debug!("Attempting to read config from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(BrowserConfig::default());
        }
        let content = read_to_string(&self.path)?;
        BrowserConfig::from_toml_str(&content)
    }

    fn store(&self, config: &BrowserConfig) -> Result<(), BrowserError> {
        tracing::debug!("Attempting to write config to: {:?}", &self.path);
        write(&self.path, config.to_toml_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BrowserConfig::from_toml_str(
            r#"start_uri = "https://alice.pod.example/music/""#,
        )
        .unwrap();
        assert_eq!(config.oidc_issuer, DEFAULT_OIDC_ISSUER);
        assert_eq!(config.content_types.len(), 3);
        assert_eq!(
            config.start_uri.as_deref(),
            Some("https://alice.pod.example/music/")
        );
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            BrowserConfig::from_toml_str("content_types = []"),
            Err(BrowserError::Config(_))
        ));
        assert!(BrowserConfig::from_toml_str(r#"oidc_issuer = "not a url""#).is_err());
        assert!(BrowserConfig::from_toml_str("oidc_issuer = 3").is_err());
    }

    #[test]
    fn test_toml_provider_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let provider = TomlConfigProvider::new(dir.path().join("pod-actions.toml"));
        assert_eq!(provider.load().unwrap(), BrowserConfig::default());

        let config = BrowserConfig {
            oidc_issuer: "https://solidcommunity.net".to_string(),
            start_uri: Some("https://alice.pod.example/music/".to_string()),
            ..Default::default()
        };
        provider.store(&config).unwrap();
        assert_eq!(provider.load().unwrap(), config);
    }
}
