// Pitch-class arithmetic and note names.
//
// Pitch classes are plain integers. Reduced values live in 0..=11; raw
// values produced with `octave_equivalence = false` may run past that
// range and are used as scale-index offsets, reduced once at mapping time.
// Reduction is always `rem_euclid(12)`, so negative offsets and exactly 12
// fold correctly.
//
// Scalar and sequence forms are separate functions (`transpose` vs
// `transpose_all` vs `transpose_each`).
//
// `NoteName` is a spelling from the enharmonic table plus an optional
// octave ("C#4", "Bb", "E#3"). Only names with an octave can be resolved
// to a MIDI key number.

use crate::error::{MusicError, Result};
use crate::tables::{PITCH_CLASS_NAMES, spelling_pitch_class};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest transposition step accepted in either direction.
pub const MAX_INTERVAL: i32 = 11;

/// Octaves a `NoteName` may carry.
pub const MIN_OCTAVE: u8 = 2;
pub const MAX_OCTAVE: u8 = 8;

fn check_interval(interval: i32) -> Result<i32> {
    if (-MAX_INTERVAL..=MAX_INTERVAL).contains(&interval) {
        Ok(interval)
    } else {
        Err(MusicError::range(
            "interval",
            interval as f64,
            -MAX_INTERVAL as f64,
            MAX_INTERVAL as f64,
        ))
    }
}

/// Reduce a pitch value into 0..=11.
pub fn octave_equivalence(pitch: i32) -> i32 {
    pitch.rem_euclid(12)
}

/// Reduce every value into 0..=11.
pub fn octave_equivalence_all(pitches: &[i32]) -> Vec<i32> {
    pitches.iter().map(|&p| octave_equivalence(p)).collect()
}

/// Add `interval` to one pitch class, optionally folding the result.
pub fn transpose(pitch: i32, interval: i32, octave_equivalent: bool) -> Result<i32> {
    let raw = pitch + check_interval(interval)?;
    Ok(if octave_equivalent {
        octave_equivalence(raw)
    } else {
        raw
    })
}

/// Add the same `interval` to every pitch class.
pub fn transpose_all(pitches: &[i32], interval: i32, octave_equivalent: bool) -> Result<Vec<i32>> {
    pitches
        .iter()
        .map(|&p| transpose(p, interval, octave_equivalent))
        .collect()
}

/// Add per-position intervals. Both slices must be the same length.
pub fn transpose_each(
    pitches: &[i32],
    intervals: &[i32],
    octave_equivalent: bool,
) -> Result<Vec<i32>> {
    if pitches.len() != intervals.len() {
        return Err(MusicError::InputShape(format!(
            "{} pitches but {} intervals",
            pitches.len(),
            intervals.len()
        )));
    }
    pitches
        .iter()
        .zip(intervals)
        .map(|(&p, &iv)| transpose(p, iv, octave_equivalent))
        .collect()
}

/// A note spelling with an optional octave.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteName {
    spelling: String,
    octave: Option<u8>,
}

impl NoteName {
    /// Build from a spelling in the enharmonic table and an optional octave.
    pub fn new(spelling: &str, octave: Option<u8>) -> Result<Self> {
        if spelling_pitch_class(spelling).is_none() {
            return Err(MusicError::lookup("note name", spelling));
        }
        if let Some(o) = octave {
            if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&o) {
                return Err(MusicError::range(
                    "octave",
                    o as f64,
                    MIN_OCTAVE as f64,
                    MAX_OCTAVE as f64,
                ));
            }
        }
        Ok(NoteName {
            spelling: spelling.to_string(),
            octave,
        })
    }

    /// Default spelling of a pitch class (values outside 0..=11 are folded).
    pub fn from_pitch_class(pc: i32, octave: Option<u8>) -> Result<Self> {
        Self::new(PITCH_CLASS_NAMES[octave_equivalence(pc) as usize], octave)
    }

    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    pub fn octave(&self) -> Option<u8> {
        self.octave
    }

    pub fn with_octave(&self, octave: u8) -> Result<Self> {
        Self::new(&self.spelling, Some(octave))
    }

    pub fn pitch_class(&self) -> u8 {
        // The constructor guarantees the spelling is in the table.
        spelling_pitch_class(&self.spelling).unwrap_or(0)
    }

    /// Semitones above the written octave's C: the letter plus its
    /// accidentals. "Cb" is -1 and "B#" is 12, so ascending order of this
    /// value within one written octave is ascending sounding order.
    pub fn written_offset(&self) -> i32 {
        let mut chars = self.spelling.chars();
        let letter = match chars.next() {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            _ => 11,
        };
        let accidental: i32 = chars
            .map(|c| match c {
                '#' => 1,
                'b' => -1,
                _ => 0,
            })
            .sum();
        letter + accidental
    }

    /// MIDI key number, C4 = 60. Spellings like "B#3" and "Cb4" cross the
    /// octave boundary the way they sound (60 and 59).
    pub fn midi_number(&self) -> Result<u8> {
        let octave = self
            .octave
            .ok_or_else(|| MusicError::MissingOctave(self.spelling.clone()))?;
        let value = (octave as i32 + 1) * 12 + self.written_offset();
        if (0..=127).contains(&value) {
            Ok(value as u8)
        } else {
            Err(MusicError::range("MIDI pitch", value as f64, 0.0, 127.0))
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.octave {
            Some(o) => write!(f, "{}{}", self.spelling, o),
            None => write!(f, "{}", self.spelling),
        }
    }
}

impl FromStr for NoteName {
    type Err = MusicError;

    /// Parse "C", "c#4", "Bb3". The letter is case-insensitive; `b` after
    /// the letter is always a flat.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        let (name, digits) = s.split_at(split);
        let mut chars = name.chars();
        let spelling = match chars.next() {
            Some(letter) => {
                let mut spelling = letter.to_ascii_uppercase().to_string();
                spelling.extend(chars);
                spelling
            }
            None => return Err(MusicError::InputShape("empty note name".into())),
        };
        let octave = if digits.is_empty() {
            None
        } else {
            Some(
                digits
                    .parse::<u8>()
                    .map_err(|_| MusicError::InputShape(format!("bad octave in {s:?}")))?,
            )
        };
        NoteName::new(&spelling, octave)
    }
}

impl TryFrom<String> for NoteName {
    type Error = MusicError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<NoteName> for String {
    fn from(note: NoteName) -> String {
        note.to_string()
    }
}

/// Parse a list of note names, failing on the first bad one.
pub fn parse_notes(names: &[&str]) -> Result<Vec<NoteName>> {
    names.iter().map(|n| n.parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octave_equivalence_uses_modulo() {
        assert_eq!(octave_equivalence(12), 0);
        assert_eq!(octave_equivalence(13), 1);
        assert_eq!(octave_equivalence(-1), 11);
        assert_eq!(octave_equivalence(35), 11);
        assert_eq!(octave_equivalence_all(&[0, 11, 12, 24, -13]), vec![0, 11, 0, 0, 11]);
    }

    #[test]
    fn transpose_folded_is_idempotent_under_reduction() {
        for p in -30..30 {
            for t in -MAX_INTERVAL..=MAX_INTERVAL {
                let once = transpose(p, t, true).unwrap();
                assert!((0..12).contains(&once));
                assert_eq!(octave_equivalence(once), once);
                assert_eq!(octave_equivalence(octave_equivalence(once)), once);
            }
        }
    }

    #[test]
    fn transpose_unfolded_keeps_raw_offsets() {
        assert_eq!(transpose(10, 5, false).unwrap(), 15);
        assert_eq!(transpose(10, 5, true).unwrap(), 3);
        assert_eq!(transpose_all(&[0, 4, 7], 7, false).unwrap(), vec![7, 11, 14]);
    }

    #[test]
    fn transpose_rejects_large_intervals() {
        assert!(matches!(transpose(0, 12, true), Err(MusicError::Range { .. })));
        assert!(matches!(transpose(0, -12, true), Err(MusicError::Range { .. })));
    }

    #[test]
    fn transpose_each_requires_parallel_lists() {
        assert_eq!(
            transpose_each(&[0, 4, 7], &[1, 2, 3], true).unwrap(),
            vec![1, 6, 10]
        );
        assert!(matches!(
            transpose_each(&[0, 4, 7], &[1, 2], true),
            Err(MusicError::InputShape(_))
        ));
    }

    #[test]
    fn parse_and_display() {
        let n: NoteName = "c#4".parse().unwrap();
        assert_eq!(n.spelling(), "C#");
        assert_eq!(n.octave(), Some(4));
        assert_eq!(n.to_string(), "C#4");
        let bare: NoteName = "Bb".parse().unwrap();
        assert_eq!(bare.octave(), None);
        assert_eq!(bare.pitch_class(), 10);
    }

    #[test]
    fn parse_failures() {
        assert!(matches!("H4".parse::<NoteName>(), Err(MusicError::LookupMiss { .. })));
        assert!(matches!("C1".parse::<NoteName>(), Err(MusicError::Range { .. })));
        assert!(matches!("C9".parse::<NoteName>(), Err(MusicError::Range { .. })));
        assert!("".parse::<NoteName>().is_err());
    }

    #[test]
    fn midi_numbers() {
        assert_eq!("C4".parse::<NoteName>().unwrap().midi_number().unwrap(), 60);
        assert_eq!("A4".parse::<NoteName>().unwrap().midi_number().unwrap(), 69);
        assert_eq!("C2".parse::<NoteName>().unwrap().midi_number().unwrap(), 36);
        assert_eq!("B#3".parse::<NoteName>().unwrap().midi_number().unwrap(), 60);
        assert_eq!("Cb4".parse::<NoteName>().unwrap().midi_number().unwrap(), 59);
        assert_eq!("B8".parse::<NoteName>().unwrap().midi_number().unwrap(), 119);
        assert_eq!("Cb4".parse::<NoteName>().unwrap().written_offset(), -1);
        assert_eq!("B#3".parse::<NoteName>().unwrap().written_offset(), 12);
        assert!(matches!(
            "C".parse::<NoteName>().unwrap().midi_number(),
            Err(MusicError::MissingOctave(_))
        ));
    }

    #[test]
    fn serde_as_string() {
        let n: NoteName = "Eb5".parse().unwrap();
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"Eb5\"");
        let back: NoteName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
    }
}
