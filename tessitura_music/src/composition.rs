// Composition: the aggregate handed to the MIDI assembler.
//
// Owns its melodies and named chord progressions outright. All voices start
// at time zero, so the reported duration is the longest voice rather than
// the sum of voices. The instrument list is rebuilt from the voices after
// every addition, in track order: melodies first, then progressions by key.

use crate::chord::{Chord, progression_duration};
use crate::error::{MusicError, Result};
use crate::melody::Melody;
use crate::tables::check_tempo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub title: String,
    pub composer: String,
    pub date: String,
    pub tempo: f64,
    pub ensemble: String,
    pub instruments: Vec<String>,
    pub melodies: Vec<Melody>,
    pub chords: BTreeMap<String, Vec<Chord>>,
}

impl Composition {
    /// Start an empty composition dated today.
    pub fn new(title: impl Into<String>, composer: impl Into<String>, tempo: f64) -> Result<Self> {
        Ok(Composition {
            title: title.into(),
            composer: composer.into(),
            date: today(),
            tempo: check_tempo(tempo)?,
            ensemble: String::new(),
            instruments: Vec::new(),
            melodies: Vec::new(),
            chords: BTreeMap::new(),
        })
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_ensemble(mut self, ensemble: impl Into<String>) -> Self {
        self.ensemble = ensemble.into();
        self
    }

    pub fn add_melody(&mut self, melody: Melody) {
        self.melodies.push(melody);
        self.refresh_instruments();
    }

    /// Add a progression under a new key. Empty progressions and reused keys
    /// are rejected.
    pub fn add_progression(&mut self, key: impl Into<String>, chords: Vec<Chord>) -> Result<()> {
        let key = key.into();
        let _first = chords
            .first()
            .ok_or_else(|| MusicError::InputShape(format!("progression {key:?} is empty")))?;
        if self.chords.contains_key(&key) {
            return Err(MusicError::InputShape(format!(
                "progression {key:?} already exists"
            )));
        }
        self.chords.insert(key, chords);
        self.refresh_instruments();
        Ok(())
    }

    /// Instrument of each voice in track order.
    pub fn voice_instruments(&self) -> Vec<&str> {
        let melodies = self.melodies.iter().map(Melody::instrument);
        let progressions = self
            .chords
            .values()
            .filter_map(|chords| chords.first().map(Chord::instrument));
        melodies.chain(progressions).collect()
    }

    fn refresh_instruments(&mut self) {
        self.instruments = self
            .voice_instruments()
            .into_iter()
            .map(str::to_string)
            .collect();
    }

    /// Number of independent voices (melodies plus progressions).
    pub fn voice_count(&self) -> usize {
        self.melodies.len() + self.chords.len()
    }

    /// Length of the longest voice in seconds.
    pub fn duration(&self) -> f64 {
        let melodies = self.melodies.iter().map(Melody::duration);
        let progressions = self.chords.values().map(|c| progression_duration(c));
        melodies.chain(progressions).fold(0.0, f64::max)
    }
}

/// Today's date in the local time zone, e.g. "2024-05-17".
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::ChordBuilder;
    use crate::melody::MelodyBuilder;
    use crate::pitch::parse_notes;

    fn melody(rhythms: Vec<f64>) -> Melody {
        let notes = vec!["C4".parse().unwrap(); rhythms.len()];
        let dynamics = vec![64; rhythms.len()];
        MelodyBuilder::new()
            .notes(notes)
            .rhythms(rhythms)
            .dynamics(dynamics)
            .build()
            .unwrap()
    }

    fn chord(rhythm: f64) -> Chord {
        chord_on("Cello", rhythm)
    }

    fn chord_on(instrument: &str, rhythm: f64) -> Chord {
        ChordBuilder::new()
            .notes(parse_notes(&["C3", "G3"]).unwrap())
            .rhythm(rhythm)
            .dynamic(60)
            .instrument(instrument)
            .build()
            .unwrap()
    }

    #[test]
    fn duration_is_the_longest_voice() {
        let mut piece = Composition::new("Test", "Nobody", 60.0).unwrap();
        assert_eq!(piece.duration(), 0.0);
        piece.add_melody(melody(vec![1.0, 1.0, 1.0]));
        piece.add_melody(melody(vec![0.5, 0.5]));
        assert_eq!(piece.duration(), 3.0);
        piece
            .add_progression("progression-1", vec![chord(2.0), chord(2.5)])
            .unwrap();
        assert_eq!(piece.duration(), 4.5);
    }

    #[test]
    fn instruments_follow_voice_order() {
        let mut piece = Composition::new("Test", "Nobody", 72.0).unwrap();
        piece.add_melody(melody(vec![1.0]));
        piece.add_progression("a", vec![chord(1.0)]).unwrap();
        assert_eq!(piece.instruments, vec!["Acoustic Grand Piano", "Cello"]);
        assert_eq!(piece.voice_count(), 2);
    }

    #[test]
    fn instruments_match_track_order_whatever_the_insertion_order() {
        let mut piece = Composition::new("Test", "Nobody", 72.0).unwrap();
        piece.add_progression("progression-02", vec![chord(1.0)]).unwrap();
        piece
            .add_progression("progression-01", vec![chord_on("Viola", 1.0)])
            .unwrap();
        piece.add_melody(melody(vec![1.0]));
        assert_eq!(
            piece.instruments,
            vec!["Acoustic Grand Piano", "Viola", "Cello"]
        );
        assert_eq!(piece.voice_instruments(), piece.instruments);
    }

    #[test]
    fn progression_keys_must_be_unique_and_non_empty() {
        let mut piece = Composition::new("Test", "Nobody", 72.0).unwrap();
        piece.add_progression("a", vec![chord(1.0)]).unwrap();
        assert!(piece.add_progression("a", vec![chord(1.0)]).is_err());
        assert!(piece.add_progression("b", Vec::new()).is_err());
    }

    #[test]
    fn tempo_is_checked() {
        assert!(matches!(
            Composition::new("Test", "Nobody", 10.0),
            Err(MusicError::Range { .. })
        ));
    }

    #[test]
    fn json_round_trip_keeps_everything() {
        let mut piece = Composition::new("Test", "Nobody", 72.0)
            .unwrap()
            .with_date("2024-01-01")
            .with_ensemble("duet");
        piece.add_melody(melody(vec![1.0, 0.5]));
        piece.add_progression("a", vec![chord(1.0)]).unwrap();
        let json = serde_json::to_string(&piece).unwrap();
        let back: Composition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, piece);
    }
}
