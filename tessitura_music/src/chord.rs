// Chord container.
//
// A chord is 2–9 distinct note names sounding together for one duration at
// one velocity. Duplicates are removed at construction (first occurrence
// wins, order kept) before the size bound is checked.

use crate::error::{MusicError, Result};
use crate::melody::{DEFAULT_TEMPO, check_dynamic, check_rhythm};
use crate::pitch::NoteName;
use crate::scale::Provenance;
use crate::tables::{DEFAULT_INSTRUMENT, check_tempo, instrument_program};
use serde::{Deserialize, Serialize};

pub const MIN_CHORD_NOTES: usize = 2;
pub const MAX_CHORD_NOTES: usize = 9;

/// Notes struck together for one duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    tempo: f64,
    instrument: String,
    notes: Vec<NoteName>,
    rhythm: f64,
    dynamic: u8,
    provenance: Provenance,
}

impl Chord {
    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Distinct notes, in the order they were first drawn.
    pub fn notes(&self) -> &[NoteName] {
        &self.notes
    }

    /// Duration in seconds, shared by every note of the chord.
    pub fn rhythm(&self) -> f64 {
        self.rhythm
    }

    /// One velocity for the whole chord.
    pub fn dynamic(&self) -> u8 {
        self.dynamic
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// A chord lasts exactly its single rhythm value.
    pub fn duration(&self) -> f64 {
        self.rhythm
    }
}

/// Total length of a progression played chord after chord.
pub fn progression_duration(chords: &[Chord]) -> f64 {
    chords.iter().map(Chord::duration).sum()
}

#[derive(Debug, Clone, Default)]
pub struct ChordBuilder {
    tempo: Option<f64>,
    instrument: Option<String>,
    notes: Vec<NoteName>,
    rhythm: Option<f64>,
    dynamic: Option<u8>,
    provenance: Provenance,
}

impl ChordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tempo(mut self, tempo: f64) -> Self {
        self.tempo = Some(tempo);
        self
    }

    pub fn instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument = Some(instrument.into());
        self
    }

    pub fn provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn notes(mut self, notes: Vec<NoteName>) -> Self {
        self.notes = notes;
        self
    }

    pub fn rhythm(mut self, rhythm: f64) -> Self {
        self.rhythm = Some(rhythm);
        self
    }

    pub fn dynamic(mut self, dynamic: u8) -> Self {
        self.dynamic = Some(dynamic);
        self
    }

    pub fn build(self) -> Result<Chord> {
        let mut notes: Vec<NoteName> = Vec::with_capacity(self.notes.len());
        for note in self.notes {
            if !notes.contains(&note) {
                note.midi_number()?;
                notes.push(note);
            }
        }
        if !(MIN_CHORD_NOTES..=MAX_CHORD_NOTES).contains(&notes.len()) {
            return Err(MusicError::range(
                "chord size",
                notes.len() as f64,
                MIN_CHORD_NOTES as f64,
                MAX_CHORD_NOTES as f64,
            ));
        }

        let rhythm = self
            .rhythm
            .ok_or_else(|| MusicError::InputShape("chord has no rhythm".into()))?;
        let dynamic = self
            .dynamic
            .ok_or_else(|| MusicError::InputShape("chord has no dynamic".into()))?;
        let instrument = self
            .instrument
            .unwrap_or_else(|| DEFAULT_INSTRUMENT.to_string());
        instrument_program(&instrument)?;

        Ok(Chord {
            tempo: check_tempo(self.tempo.unwrap_or(DEFAULT_TEMPO))?,
            instrument,
            notes,
            rhythm: check_rhythm(rhythm)?,
            dynamic: check_dynamic(dynamic)?,
            provenance: self.provenance,
        })
    }
}
