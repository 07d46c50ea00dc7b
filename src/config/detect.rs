use crate::DetectorParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DetectOutputConfig {
    /// Report destination; printed to stdout when absent.
    pub json_out: Option<PathBuf>,
    /// Include per-scale counters and timings in the report.
    #[serde(default)]
    pub diagnostics: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DetectToolConfig {
    pub input: PathBuf,
    /// Cascade model, `.json` or little-endian `f32` binary.
    pub cascade: PathBuf,
    /// Detector canvas `[width, height]`; defaults to the input size.
    #[serde(default)]
    pub canvas: Option<[usize; 2]>,
    /// Mirror the cascade left to right before compiling.
    #[serde(default)]
    pub mirror: bool,
    #[serde(default)]
    pub params: DetectorParams,
    #[serde(default)]
    pub output: DetectOutputConfig,
}

pub fn load_config(path: &Path) -> Result<DetectToolConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(json: &str) -> Result<DetectToolConfig, serde_json::Error> {
    serde_json::from_str(json)
}
