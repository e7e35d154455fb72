use crate::error::BenchError;
use cogex_render::{TextBoxParams, TextStimParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Characters of random text per update, before the kind prefix
    pub text_length: usize,
    /// Text changes on frame 0 and every `change_every` frames after it
    pub change_every: usize,
    pub max_flips: usize,
    pub buffer_capacity: usize,
    pub resolution: (u32, u32),
    pub fullscreen: bool,
    pub font: String,
    /// Font file used instead of looking `font` up
    pub font_file: Option<PathBuf>,
    /// Flip pacing for the headless display
    pub refresh_hz: f64,
    /// Seed for the text generator; fresh entropy when unset
    pub seed: Option<u64>,
    pub text_stim: TextStimParams,
    pub text_box: TextBoxParams,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            text_length: 160,
            change_every: 5,
            max_flips: 60 * 10,
            buffer_capacity: 6000,
            resolution: (1920, 1080),
            fullscreen: true,
            font: "Consolas".to_string(),
            font_file: None,
            refresh_hz: 60.0,
            seed: None,
            text_stim: TextStimParams::default(),
            text_box: TextBoxParams::default(),
        }
    }
}

impl BenchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, BenchError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BenchError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BenchError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), BenchError> {
        let invalid = |msg: &str| Err(BenchError::InvalidConfig(msg.to_string()));
        if self.text_length == 0 {
            return invalid("text_length must be at least 1");
        }
        if self.change_every == 0 {
            return invalid("change_every must be at least 1");
        }
        if self.max_flips == 0 {
            return invalid("max_flips must be at least 1");
        }
        if self.buffer_capacity == 0 {
            return invalid("buffer_capacity must be at least 1");
        }
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return invalid("resolution must be non-zero");
        }
        if !(self.refresh_hz >= 0.0) {
            return invalid("refresh_hz must not be negative");
        }
        Ok(())
    }

    /// Share of frames that change text, in percent.
    pub fn change_percent(&self) -> f64 {
        (1.0 / self.change_every as f64) * 100.0
    }
}
