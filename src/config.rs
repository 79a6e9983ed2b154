use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::db::atomic_write;
use crate::similarity::{DUPLICATE_THRESHOLD, Detector, Metric};

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub duplicates: DuplicateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateConfig {
    /// When false, saves never run the duplicate check.
    pub enabled: bool,
    pub threshold: f64,
    pub metric: Metric,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DUPLICATE_THRESHOLD,
            metric: Metric::default(),
        }
    }
}

impl DuplicateConfig {
    /// Builds a detector, letting command-line overrides win over the file.
    pub fn detector(&self, metric: Option<Metric>, threshold: Option<f64>) -> Result<Detector> {
        let threshold = threshold.unwrap_or(self.threshold);
        if !(0.0..=1.0).contains(&threshold) {
            bail!("Threshold must be between 0 and 1, got {threshold}");
        }

        Ok(Detector::for_metric(metric.unwrap_or(self.metric)).with_threshold(threshold))
    }
}

impl Config {
    pub fn file_path(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    /// Loads `config.toml` from the catalog directory; a missing file means
    /// defaults.
    pub fn load(base: &Path) -> Result<Self> {
        let path = Self::file_path(base);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn write_file(&self, base: &Path) -> Result<()> {
        let content = toml::to_string(self).context("Failed to serialize config")?;
        atomic_write(&Self::file_path(base), content.as_bytes())
    }
}
