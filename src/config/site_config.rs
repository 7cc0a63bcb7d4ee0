use serde::Deserialize;

use super::RevealConfig;

/// Everything `boot` accepts: the reveal engine settings at the top level,
/// plus the page options around them
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SiteConfig {
    #[serde(flatten)]
    pub reveal: RevealConfig,
    /// Click-through URLs for the project cards, in card order. Empty
    /// entries leave a card without a link.
    #[serde(default)]
    pub project_links: Vec<String>,
}

impl SiteConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| format!("Config parse error: {}", e))
    }
}
