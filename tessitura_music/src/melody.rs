// Melody container and its builder.
//
// A melody is three parallel sequences (notes, rhythms in seconds,
// velocities) plus tempo, instrument and provenance. The fields are private:
// the only way to get a `Melody` is `MelodyBuilder::build`, which refuses
// ragged sequences, unknown instruments, out-of-range tempos and notes
// without a playable MIDI pitch. Once built a melody is read-only.

use crate::error::{MusicError, Result};
use crate::pitch::NoteName;
use crate::scale::Provenance;
use crate::tables::{DEFAULT_INSTRUMENT, check_tempo, instrument_program};
use serde::{Deserialize, Serialize};

/// Tempo assumed when none is given.
pub const DEFAULT_TEMPO: f64 = 60.0;

/// A single line of notes with a rhythm and a velocity per note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Melody {
    tempo: f64,
    instrument: String,
    notes: Vec<NoteName>,
    rhythms: Vec<f64>,
    dynamics: Vec<u8>,
    provenance: Provenance,
}

impl Melody {
    /// Tempo in BPM the rhythms were scaled to.
    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    /// General MIDI instrument name.
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn notes(&self) -> &[NoteName] {
        &self.notes
    }

    /// Note durations in seconds at `tempo()`, one per note.
    pub fn rhythms(&self) -> &[f64] {
        &self.rhythms
    }

    /// MIDI velocities (1-127), one per note.
    pub fn dynamics(&self) -> &[u8] {
        &self.dynamics
    }

    /// Roots and Forte numbers of the scale the notes were drawn from.
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Total length in seconds: the sum of all rhythms.
    pub fn duration(&self) -> f64 {
        self.rhythms.iter().sum()
    }
}

/// Accumulates a melody's parts and checks them once in `build`.
#[derive(Debug, Clone, Default)]
pub struct MelodyBuilder {
    tempo: Option<f64>,
    instrument: Option<String>,
    notes: Vec<NoteName>,
    rhythms: Vec<f64>,
    dynamics: Vec<u8>,
    provenance: Provenance,
}

impl MelodyBuilder {
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

    pub fn rhythms(mut self, rhythms: Vec<f64>) -> Self {
        self.rhythms = rhythms;
        self
    }

    pub fn dynamics(mut self, dynamics: Vec<u8>) -> Self {
        self.dynamics = dynamics;
        self
    }

    /// Append one note with its rhythm and velocity.
    pub fn push(&mut self, note: NoteName, rhythm: f64, dynamic: u8) {
        self.notes.push(note);
        self.rhythms.push(rhythm);
        self.dynamics.push(dynamic);
    }

    pub fn build(self) -> Result<Melody> {
        let (notes, rhythms, dynamics) = (self.notes.len(), self.rhythms.len(), self.dynamics.len());
        if notes != rhythms || notes != dynamics {
            return Err(MusicError::LengthMismatch {
                notes,
                rhythms,
                dynamics,
            });
        }

        let tempo = check_tempo(self.tempo.unwrap_or(DEFAULT_TEMPO))?;
        let instrument = self
            .instrument
            .unwrap_or_else(|| DEFAULT_INSTRUMENT.to_string());
        instrument_program(&instrument)?;

        for note in &self.notes {
            note.midi_number()?;
        }
        for &rhythm in &self.rhythms {
            check_rhythm(rhythm)?;
        }
        for &dynamic in &self.dynamics {
            check_dynamic(dynamic)?;
        }

        Ok(Melody {
            tempo,
            instrument,
            notes: self.notes,
            rhythms: self.rhythms,
            dynamics: self.dynamics,
            provenance: self.provenance,
        })
    }
}

/// Durations must be positive, finite seconds.
pub(crate) fn check_rhythm(rhythm: f64) -> Result<f64> {
    if rhythm.is_finite() && rhythm > 0.0 {
        Ok(rhythm)
    } else {
        Err(MusicError::range("rhythm", rhythm, 0.001, f64::MAX))
    }
}

/// Velocities are 7-bit, and 0 is reserved: a NoteOn at velocity 0 is read
/// as a note-off.
pub(crate) fn check_dynamic(dynamic: u8) -> Result<u8> {
    if (1..=127).contains(&dynamic) {
        Ok(dynamic)
    } else {
        Err(MusicError::range("velocity", dynamic as f64, 1.0, 127.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::parse_notes;

    fn three_notes() -> MelodyBuilder {
        MelodyBuilder::new()
            .notes(parse_notes(&["C4", "E4", "G4"]).unwrap())
            .rhythms(vec![1.0, 0.5, 2.0])
            .dynamics(vec![64, 72, 80])
    }

    #[test]
    fn builds_with_defaults() {
        let melody = three_notes().build().unwrap();
        assert_eq!(melody.tempo(), DEFAULT_TEMPO);
        assert_eq!(melody.instrument(), "Acoustic Grand Piano");
        assert_eq!(melody.len(), 3);
        assert_eq!(melody.duration(), 3.5);
    }

    #[test]
    fn ragged_sequences_are_rejected() {
        let err = three_notes().dynamics(vec![64, 72]).build().unwrap_err();
        assert!(matches!(
            err,
            MusicError::LengthMismatch {
                notes: 3,
                rhythms: 3,
                dynamics: 2
            }
        ));
    }

    #[test]
    fn push_keeps_sequences_parallel() {
        let mut builder = MelodyBuilder::new().tempo(96.0).instrument("Flute");
        builder.push("D5".parse().unwrap(), 0.25, 90);
        builder.push("E5".parse().unwrap(), 0.25, 92);
        let melody = builder.build().unwrap();
        assert_eq!(melody.notes().len(), melody.rhythms().len());
        assert_eq!(melody.rhythms().len(), melody.dynamics().len());
    }

    #[test]
    fn invalid_fields_are_rejected() {
        assert!(matches!(
            three_notes().tempo(300.0).build(),
            Err(MusicError::Range { .. })
        ));
        assert!(matches!(
            three_notes().instrument("Kazoo").build(),
            Err(MusicError::LookupMiss { .. })
        ));
        assert!(matches!(
            three_notes().rhythms(vec![1.0, 0.0, 2.0]).build(),
            Err(MusicError::Range { .. })
        ));
        assert!(matches!(
            three_notes().dynamics(vec![64, 200, 80]).build(),
            Err(MusicError::Range { .. })
        ));
        assert!(matches!(
            three_notes().dynamics(vec![64, 0, 80]).build(),
            Err(MusicError::Range { .. })
        ));
        let bare = parse_notes(&["C", "E", "G"]).unwrap();
        assert!(matches!(
            three_notes().notes(bare).build(),
            Err(MusicError::MissingOctave(_))
        ));
    }

    #[test]
    fn empty_melody_is_allowed() {
        let melody = MelodyBuilder::new().build().unwrap();
        assert!(melody.is_empty());
        assert_eq!(melody.duration(), 0.0);
    }
}
