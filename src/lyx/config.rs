//! Conversion options
//!
//! `defaults/lyx2html.default.yaml` is embedded into the binary so that the documented
//! defaults and runtime behavior stay in sync. User files only need to name the keys
//! they override; translations are merged key by key over the defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

const DEFAULT_YAML: &str = include_str!("../../defaults/lyx2html.default.yaml");

/// Options that change how a document is converted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConversionOptions {
    /// Emit only the body fragment instead of a complete page
    pub raw: bool,
    /// Page title; when absent the document Title layout is used
    pub title: Option<String>,
    /// Stylesheets linked from the page head
    pub css: Vec<String>,
    /// Page language; when absent the document header language is used
    pub language: Option<String>,
    /// Deepest container nesting before content is degraded to text
    pub max_nesting: usize,
    /// Overrides the header `\secnumdepth` value
    pub secnumdepth: Option<i32>,
    pub translations: BTreeMap<String, String>,
}

/// A partial options file, as written by users
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct OptionsOverlay {
    raw: Option<bool>,
    title: Option<String>,
    css: Option<Vec<String>>,
    language: Option<String>,
    max_nesting: Option<usize>,
    secnumdepth: Option<i32>,
    #[serde(default)]
    translations: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

impl ConversionOptions {
    /// The embedded defaults
    pub fn defaults() -> Self {
        match serde_yaml::from_str(DEFAULT_YAML) {
            Ok(options) => options,
            Err(err) => {
                log::error!("embedded defaults are invalid: {}", err);
                Self::fallback()
            }
        }
    }

    fn fallback() -> Self {
        Self {
            raw: false,
            title: None,
            css: Vec::new(),
            language: None,
            max_nesting: 128,
            secnumdepth: None,
            translations: BTreeMap::new(),
        }
    }

    /// Layer a YAML document over the defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let mut options = Self::defaults();
        if yaml.trim().is_empty() {
            return Ok(options);
        }
        let overlay: OptionsOverlay = serde_yaml::from_str(yaml)?;
        options.apply(overlay);
        Ok(options)
    }

    /// Layer a YAML file over the defaults
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    fn apply(&mut self, overlay: OptionsOverlay) {
        if let Some(raw) = overlay.raw {
            self.raw = raw;
        }
        if overlay.title.is_some() {
            self.title = overlay.title;
        }
        if let Some(css) = overlay.css {
            self.css = css;
        }
        if overlay.language.is_some() {
            self.language = overlay.language;
        }
        if let Some(max_nesting) = overlay.max_nesting {
            self.max_nesting = max_nesting;
        }
        if overlay.secnumdepth.is_some() {
            self.secnumdepth = overlay.secnumdepth;
        }
        self.translations.extend(overlay.translations);
    }

    /// Translated user-visible string, falling back to the key itself
    pub fn translate(&self, key: &str) -> String {
        self.translations
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_embedded() {
        let options = ConversionOptions::defaults();
        assert!(!options.raw);
        assert_eq!(options.max_nesting, 128);
        assert_eq!(options.translate("figure"), "Figure");
        assert_eq!(options.translate("appendix"), "Appendix");
    }

    #[test]
    fn test_overlay_merges_translations() {
        let options = ConversionOptions::from_yaml_str(
            "raw: true\ntranslations:\n  figure: Abbildung\n",
        )
        .unwrap();
        assert!(options.raw);
        assert_eq!(options.translate("figure"), "Abbildung");
        assert_eq!(options.translate("table"), "Table");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = ConversionOptions::from_yaml_str("colour: blue\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_untranslated_key_falls_back() {
        let options = ConversionOptions::defaults();
        assert_eq!(options.translate("sidebar"), "sidebar");
    }
}
