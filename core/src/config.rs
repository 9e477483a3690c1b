//! Optional YAML configuration. Every setting has a default, so an empty or missing file is
//! valid.

use std::{io::Read, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::survey::SurveyOptions;

/// Default delay of the mock extraction.
pub const DEFAULT_EXTRACTION_DELAY_MS: u64 = 1000;

/// URL of the survey builder that accepts the exported JSON.
pub const DEFAULT_SURVEY_BUILDER_URL: &str = "https://surveyjs.io/create-free-survey";

/// Top level configuration, read from a `config.yaml`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub survey: SurveyOptions,
    pub survey_builder_url: SurveyBuilderUrl,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Milliseconds that the mock extraction waits before returning.
    pub delay_ms: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_EXTRACTION_DELAY_MS,
        }
    }
}

impl ExtractionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct SurveyBuilderUrl(pub String);

impl Default for SurveyBuilderUrl {
    fn default() -> Self {
        Self(DEFAULT_SURVEY_BUILDER_URL.to_string())
    }
}

/// Parses configuration from YAML read from `rdr`. An empty document yields the defaults.
pub fn parse_config<R: Read>(mut rdr: R) -> Result<Config> {
    let mut text = String::new();
    rdr.read_to_string(&mut text)
        .context("reading configuration")?;
    if text.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml_ng::from_str(&text).context("parsing configuration")
}

/// Loads the configuration from the file at `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    let rdr = std::fs::File::open(path)
        .with_context(|| format!("opening configuration file {path:?}"))?;
    let config = parse_config(rdr).with_context(|| format!("loading {path:?}"))?;
    log::debug!("Loaded configuration from {path:?}: {config:?}");
    Ok(config)
}
