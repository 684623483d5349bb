use serde::{Deserialize, Serialize};
use std::fs;
use anyhow::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inference: InferenceConfig,
}

/// Sizing of the computation contexts opened against the loaded model.
/// Owned process-wide; duties only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_context_size")]
    pub context_size: usize,
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_context_size() -> usize {
    8192
}

fn default_threads() -> usize {
    4
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") || path_lower.ends_with(".jsonld") {
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Load as YAML
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            context_size: default_context_size(),
            threads: default_threads(),
        }
    }
}
