// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Direction;

/// How intensity values are mapped to 8-bit pixels when an image is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeMode {
    /// Clamp to `[0, 255]` and round.
    #[default]
    Clamp,
    /// Stretch the matrix's own `[min, max]` onto `[0, 255]`.
    Normalize,
}

/// Where the object-detection service lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Base URL; `/predict` is appended.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".into(),
            timeout_secs: 60,
        }
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Inserted between the file stem and extension of every output file.
    pub output_suffix: String,
    /// Pixel encoding policy for written images.
    pub encode_mode: EncodeMode,
    /// Box blur window size.
    pub blur_kernel: usize,
    /// Salt-and-pepper probability, in `[0, 1]`.
    pub noise_amount: f64,
    /// Number of row segments.
    pub segment_count: usize,
    /// Default concatenation direction.
    pub concat_direction: Direction,
    /// Object-detection service settings.
    pub detection: DetectionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_suffix: "_filtered".into(),
            encode_mode: EncodeMode::Clamp,
            blur_kernel: 16,
            noise_amount: 0.05,
            segment_count: 4,
            concat_direction: Direction::Horizontal,
            detection: DetectionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file. Missing keys take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
