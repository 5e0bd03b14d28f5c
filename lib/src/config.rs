//! Defines the configuration of an `RdfObjectLoader`.

use anyhow::Result;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufReader, Write};
use std::path::Path;

#[derive(Builder, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct LoaderConfig {
    // if true, rdf:first/rdf:rest chains are loaded into Resource lists
    pub normalize_lists: bool,
    // JSON-LD context used to resolve shortcut names
    pub context: Value,
    // offline mode (does not fetch remote contexts)
    pub offline: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            normalize_lists: true,
            context: json!({}),
            offline: false,
        }
    }
}

impl LoaderConfig {
    pub fn builder() -> LoaderConfigBuilder {
        LoaderConfigBuilder::default()
    }

    pub fn save_to_file(&self, file: &Path) -> Result<()> {
        let config_str = serde_json::to_string_pretty(&self)?;
        let mut file = std::fs::File::create(file)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    pub fn from_file(file: &Path) -> Result<Self> {
        let file = std::fs::File::open(file)?;
        let reader = BufReader::new(file);
        let config: LoaderConfig = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// Prints out the current LoaderConfig in a clear and readable way for command line output.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  Normalize Lists: {}", self.normalize_lists);
        println!("  Offline: {}", self.offline);
        match serde_json::to_string_pretty(&self.context) {
            Ok(context) => {
                println!("  Context:");
                for line in context.lines() {
                    println!("    {}", line);
                }
            }
            Err(_) => println!("  Context: <unprintable>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert!(config.normalize_lists);
        assert!(!config.offline);
        assert_eq!(config.context, json!({}));
        assert_eq!(LoaderConfig::builder().build().unwrap(), config);
    }

    #[test]
    fn test_builder_overrides() {
        let config = LoaderConfig::builder()
            .normalize_lists(false)
            .context(json!({ "ex": "http://example.org/" }))
            .build()
            .unwrap();
        assert!(!config.normalize_lists);
        assert_eq!(config.context["ex"], "http://example.org/");
    }

    #[test]
    fn test_file_roundtrip_with_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "offline": true }"#).unwrap();
        let config = LoaderConfig::from_file(&path).unwrap();
        assert!(config.offline);
        assert!(config.normalize_lists);

        let saved = dir.path().join("saved.json");
        config.save_to_file(&saved).unwrap();
        assert_eq!(LoaderConfig::from_file(&saved).unwrap(), config);
    }
}
