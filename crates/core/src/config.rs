use crate::classifier::{default_rules, Classifier, TypeRule};
use crate::error::{IndexError, Result};
use crate::models::IndexSchema;
use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: String,
    #[serde(default = "default_directories")]
    pub directories: Vec<String>,
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    #[serde(default = "default_id_suffix")]
    pub id_suffix: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// Relative path of the bible flagged as default; empty disables it.
    #[serde(default = "default_default_path")]
    pub default_path: Option<String>,
    #[serde(default)]
    pub schema: IndexSchema,
    #[serde(default = "default_rules")]
    pub types: Vec<TypeRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            directories: default_directories(),
            file_pattern: default_file_pattern(),
            id_suffix: default_id_suffix(),
            output_path: default_output_path(),
            default_path: default_default_path(),
            schema: IndexSchema::default(),
            types: default_rules(),
        }
    }
}

fn default_base_dir() -> String {
    ".".to_string()
}

fn default_directories() -> Vec<String> {
    vec![".".to_string()]
}

fn default_file_pattern() -> String {
    "*.ebf1.json".to_string()
}

fn default_id_suffix() -> String {
    ".ebf1.json".to_string()
}

fn default_output_path() -> String {
    "index.json".to_string()
}

fn default_default_path() -> Option<String> {
    Some("Ave-Maria.ebf1.json".to_string())
}

pub fn load(path: Option<&str>) -> Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}

/// Validated, immutable view of [`AppConfig`] handed to the pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_dir: PathBuf,
    pub directories: Vec<String>,
    pub matcher: GlobMatcher,
    pub id_suffix: String,
    pub output_path: PathBuf,
    pub default_path: Option<String>,
    pub schema: IndexSchema,
    pub classifier: Classifier,
}

impl Settings {
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        if cfg.directories.is_empty() {
            return Err(IndexError::Config("no directories configured".into()));
        }
        if cfg.id_suffix.is_empty() {
            return Err(IndexError::Config("id_suffix must not be empty".into()));
        }
        if cfg.output_path.is_empty() {
            return Err(IndexError::Config("output_path must not be empty".into()));
        }
        let matcher = Glob::new(&cfg.file_pattern)?.compile_matcher();
        let base_dir = PathBuf::from(&cfg.base_dir);
        let output_path = base_dir.join(&cfg.output_path);
        let default_path = cfg
            .default_path
            .as_deref()
            .map(|p| p.trim().replace('\\', "/"))
            .filter(|p| !p.is_empty());

        Ok(Self {
            base_dir,
            directories: cfg.directories.clone(),
            matcher,
            id_suffix: cfg.id_suffix.clone(),
            output_path,
            default_path,
            schema: cfg.schema,
            classifier: Classifier::new(cfg.types.clone()),
        })
    }

    /// Scan root resolved against the base directory.
    pub fn directory_path(&self, rel: &str) -> PathBuf {
        self.base_dir.join(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_file() {
        let cfg = AppConfig::default();
        let settings = Settings::from_config(&cfg).unwrap();
        assert_eq!(settings.directories, vec![".".to_string()]);
        assert_eq!(settings.output_path, PathBuf::from("./index.json"));
        assert_eq!(settings.default_path.as_deref(), Some("Ave-Maria.ebf1.json"));
        assert!(settings.matcher.is_match("Ave-Maria.ebf1.json"));
        assert!(!settings.matcher.is_match("index.json"));
        assert_eq!(settings.classifier.classify(73), "catholic");
    }

    #[test]
    fn loads_toml_file_with_partial_keys() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bibles.toml");
        fs::write(
            &path,
            r#"
            base_dir = "assets/data/bibles"
            directories = ["catholic-open/json", "."]
            schema = "minimal"
            default_path = ""

            [[types]]
            label = "catholic"
            books = 73

            [[types]]
            label = "orthodox"
            books = 76
            "#,
        )
        .unwrap();

        let cfg = load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(cfg.directories.len(), 2);
        assert_eq!(cfg.schema, IndexSchema::Minimal);
        assert_eq!(cfg.file_pattern, "*.ebf1.json");
        assert_eq!(cfg.types[1], TypeRule::new("orthodox", 76));

        let settings = Settings::from_config(&cfg).unwrap();
        assert!(settings.default_path.is_none());
        assert_eq!(settings.classifier.classify(76), "orthodox");
        assert_eq!(settings.classifier.classify(66), "other");
    }

    #[test]
    fn rejects_empty_directories() {
        let cfg = AppConfig {
            directories: Vec::new(),
            ..AppConfig::default()
        };
        assert!(matches!(
            Settings::from_config(&cfg),
            Err(IndexError::Config(_))
        ));
    }

    #[test]
    fn rejects_bad_glob() {
        let cfg = AppConfig {
            file_pattern: "[*.json".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            Settings::from_config(&cfg),
            Err(IndexError::Config(_))
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(load(Some("/definitely/not/here/bibles")).is_err());
    }
}
