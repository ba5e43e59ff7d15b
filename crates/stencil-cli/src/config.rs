//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `STENCIL_`-prefixed environment variables, `__` between sections
//!    (`STENCIL_RENDER__LANGUAGE=python`)
//! 3. Config file (`--config`, else the platform config directory)
//! 4. Built-in defaults

use std::path::PathBuf;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use stencil_core::domain::{DEFAULT_MAX_DEPTH, KeyCase, TargetLanguage};
use tracing::debug;

const ENV_PREFIX: &str = "STENCIL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub render: RenderConfig,
    pub transform: TransformConfig,
    pub projenrc: ProjenrcConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub language: TargetLanguage,
    /// Spaces per indentation level in generated sources.
    pub indent_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Case used when `merge --decamelize` is not given an explicit `--case`.
    pub case: KeyCase,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjenrcConfig {
    pub class_name: String,
    pub test_scope: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; `--output-format` wins.
    pub format: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            language: TargetLanguage::Java,
            indent_width: 4,
        }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            case: KeyCase::Snake,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for ProjenrcConfig {
    fn default() -> Self {
        Self {
            class_name: "projenrc".into(),
            test_scope: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration on top of the built-in defaults.
    ///
    /// A file passed explicitly must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("failed to serialise default configuration")?;

        let file = match config_file {
            Some(path) => config::File::from(path.as_path()).required(true),
            None => config::File::from(Self::config_path()).required(false),
        };

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?;

        let config: Self = settings
            .try_deserialize()
            .context("invalid configuration")?;
        debug!(
            language = %config.render.language,
            case = %config.transform.case,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stencil.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "stencil", "stencil")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".stencil.toml"))
    }

    /// Look up a dotted key such as `render.indent_width`.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let tree = serde_json::to_value(self).ok()?;
        key.split('.')
            .try_fold(&tree, |node, segment| node.get(segment))
            .cloned()
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.render.language, TargetLanguage::Java);
        assert_eq!(cfg.render.indent_width, 4);
        assert_eq!(cfg.transform.max_depth, DEFAULT_MAX_DEPTH);
        assert!(cfg.projenrc.test_scope);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[render]\nlanguage = \"python\"\n\n[projenrc]\nclass_name = \"org.acme.Projenrc\""
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.render.language, TargetLanguage::Python);
        assert_eq!(cfg.render.indent_width, 4);
        assert_eq!(cfg.projenrc.class_name, "org.acme.Projenrc");
        assert!(cfg.projenrc.test_scope);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn dotted_lookup() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("render.language"), Some(serde_json::json!("java")));
        assert_eq!(cfg.get("transform.case"), Some(serde_json::json!("snake")));
        assert_eq!(cfg.get("output.no_color"), Some(serde_json::json!(false)));
        assert_eq!(cfg.get("render.nope"), None);
    }

    #[test]
    fn serialises_to_toml() {
        let toml = AppConfig::default().to_toml().unwrap();
        assert!(toml.contains("[render]"));
        assert!(toml.contains("indent_width = 4"));
    }
}
