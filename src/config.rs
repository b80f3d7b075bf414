//! Synthesizer and audio output configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, SynthError};

/// Bit depths the WAV encoder can quantize to
pub const SUPPORTED_BIT_DEPTHS: [u16; 4] = [8, 16, 24, 32];

/// Longest note a single synthesis may render, in seconds
pub const MAX_DURATION: f64 = 60.0;

const MIN_SAMPLE_RATE: u32 = 8_000;
const MAX_SAMPLE_RATE: u32 = 192_000;

/// Per-synthesis parameters. Plain value, no behavior beyond validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub volume: f64,   // 0.0 - 1.0
    pub duration: f64, // seconds per note
    pub shots: u32,    // measurement draws for statistical display
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            volume: 0.8,
            duration: 2.0,
            shots: 1024,
        }
    }
}

impl SynthConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.volume.is_finite() || !(0.0..=1.0).contains(&self.volume) {
            return Err(SynthError::config(
                "volume",
                format!("{} is outside 0.0..=1.0", self.volume),
            ));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(SynthError::config(
                "duration",
                format!("{} must be a positive number of seconds", self.duration),
            ));
        }
        if self.duration > MAX_DURATION {
            return Err(SynthError::config(
                "duration",
                format!("{} s exceeds the {} s limit", self.duration, MAX_DURATION),
            ));
        }
        if self.shots == 0 {
            return Err(SynthError::config("shots", "must be at least 1"));
        }
        Ok(())
    }
}

/// Output format for rendered tracks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub bit_depth: u16,
    /// Shape each note with an ADSR envelope
    pub envelope: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bit_depth: 16,
            envelope: true,
        }
    }
}

impl AudioSettings {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(SynthError::config(
                "sample_rate",
                format!(
                    "{} Hz is outside {}..={} Hz",
                    self.sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
                ),
            ));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bit_depth) {
            return Err(SynthError::config(
                "bit_depth",
                format!(
                    "{} bits is not one of {:?}",
                    self.bit_depth, SUPPORTED_BIT_DEPTHS
                ),
            ));
        }
        Ok(())
    }
}

/// Named configuration presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthPreset {
    Default,
    HighQuality,
    FastResponse,
}

impl Default for SynthPreset {
    fn default() -> Self {
        Self::Default
    }
}

impl SynthPreset {
    pub const ALL: [SynthPreset; 3] = [Self::Default, Self::HighQuality, Self::FastResponse];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::HighQuality => "high_quality",
            Self::FastResponse => "fast_response",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    pub fn settings(&self) -> Settings {
        match self {
            Self::Default => Settings::default(),
            Self::HighQuality => Settings {
                synth: SynthConfig {
                    volume: 0.9,
                    duration: 3.0,
                    shots: 2048,
                },
                audio: AudioSettings {
                    sample_rate: 48000,
                    ..Default::default()
                },
            },
            Self::FastResponse => Settings {
                synth: SynthConfig {
                    duration: 1.0,
                    shots: 512,
                    ..Default::default()
                },
                audio: AudioSettings {
                    sample_rate: 22050,
                    envelope: false,
                    ..Default::default()
                },
            },
        }
    }
}

/// Full configuration as loaded from disk
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub synth: SynthConfig,
    pub audio: AudioSettings,
}

impl Settings {
    /// Parse settings from JSON. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading settings from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.synth.validate()?;
        self.audio.validate()
    }
}
