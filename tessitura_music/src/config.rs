// Generator configuration.
//
// Every tunable range the orchestrator draws from lives here instead of as
// a literal in `generate.rs`. Loaded from JSON; missing fields fall back to
// the defaults below, so a config file only needs the keys it changes.

use crate::error::{MusicError, Result};
use crate::tables::{DEFAULT_INSTRUMENT, instrument_program};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Stamped on every composition.
    pub composer: String,
    /// Titles are "<prefix> <n>" unless the caller supplies one.
    pub title_prefix: String,
    /// Inclusive source-scale length range for unseeded melodies.
    pub scale_length: (usize, usize),
    /// Seeded melodies build at least this many scale notes.
    pub min_seed_scale_length: usize,
    /// Inclusive chord-count range for progressions without an explicit total.
    pub progression_length: (usize, usize),
    /// Octaves a source scale may start on.
    pub start_octaves: Vec<u8>,
    /// Used when a voice has no instrument of its own.
    pub fallback_instrument: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            composer: "tessitura".to_string(),
            title_prefix: "Study".to_string(),
            scale_length: (12, 36),
            min_seed_scale_length: 24,
            progression_length: (3, 15),
            start_octaves: vec![2, 3],
            fallback_instrument: DEFAULT_INSTRUMENT.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Load from a JSON file and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: GeneratorConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (low, high) = self.scale_length;
        if low < 3 || low > high {
            return Err(MusicError::InputShape(format!(
                "scale_length ({low}, {high}) must satisfy 3 <= low <= high"
            )));
        }
        let (low, high) = self.progression_length;
        if low == 0 || low > high {
            return Err(MusicError::InputShape(format!(
                "progression_length ({low}, {high}) must satisfy 1 <= low <= high"
            )));
        }
        if self.min_seed_scale_length == 0 {
            return Err(MusicError::InputShape(
                "min_seed_scale_length must be positive".into(),
            ));
        }
        if self.start_octaves.is_empty() {
            return Err(MusicError::InputShape("start_octaves is empty".into()));
        }
        for &octave in &self.start_octaves {
            if !(crate::pitch::MIN_OCTAVE..=crate::scale::MAX_SOURCE_OCTAVE).contains(&octave) {
                return Err(MusicError::range(
                    "start octave",
                    octave as f64,
                    crate::pitch::MIN_OCTAVE as f64,
                    crate::scale::MAX_SOURCE_OCTAVE as f64,
                ));
            }
        }
        instrument_program(&self.fallback_instrument)?;
        Ok(())
    }
}
