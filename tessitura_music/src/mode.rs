// Church modes as a source of root scales.
//
// Each mode is an interval pattern from its final. `ModeInstance` pairs a
// mode with a transposition (the final's pitch class), which is how
// `scale::pick_root` uses them: pick one of the seven modes, shift it by a
// random 0–11 semitones, and spell the resulting pitch classes.

use crate::pitch::octave_equivalence;
use crate::tables::PITCH_CLASS_NAMES;
use serde::{Deserialize, Serialize};

/// The seven church modes, each defined by its interval pattern from the final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// C D E F G A B (major)
    Ionian,
    /// D E F G A B C (minor with raised 6th)
    Dorian,
    /// E F G A B C D (half-step from 1 to 2)
    Phrygian,
    /// F G A B C D E (raised 4th)
    Lydian,
    /// G A B C D E F (major with lowered 7th)
    Mixolydian,
    /// A B C D E F G (natural minor)
    Aeolian,
    /// B C D E F G A (diminished 5th above the final)
    Locrian,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    /// Semitone intervals from the final to each scale degree.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Ionian => [0, 2, 4, 5, 7, 9, 11],
            Mode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Mode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Mode::Lydian => [0, 2, 4, 6, 7, 9, 11],
            Mode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Mode::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            Mode::Locrian => [0, 1, 3, 5, 6, 8, 10],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Ionian => "ionian",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Aeolian => "aeolian",
            Mode::Locrian => "locrian",
        }
    }
}

/// A specific mode instance: a mode type plus its final (tonic) pitch class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeInstance {
    pub mode: Mode,
    /// Pitch class of the final (0 = C, 2 = D, 4 = E, etc.)
    pub final_pc: u8,
}

impl ModeInstance {
    pub fn new(mode: Mode, final_pc: u8) -> Self {
        ModeInstance {
            mode,
            final_pc: final_pc % 12,
        }
    }

    /// Pitch classes of the transposed mode, in scale order starting at the final.
    pub fn pitch_classes(&self) -> Vec<u8> {
        self.mode
            .intervals()
            .iter()
            .map(|&iv| octave_equivalence(iv as i32 + self.final_pc as i32) as u8)
            .collect()
    }

    /// Human-readable label, e.g. "D dorian".
    pub fn label(&self) -> String {
        format!("{} {}", PITCH_CLASS_NAMES[self.final_pc as usize], self.mode.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d_dorian_pitch_classes() {
        let mode = ModeInstance::new(Mode::Dorian, 2);
        // D E F G A B C
        assert_eq!(mode.pitch_classes(), vec![2, 4, 5, 7, 9, 11, 0]);
        assert_eq!(mode.label(), "D dorian");
    }

    #[test]
    fn test_transposed_pitch_classes_wrap() {
        let mode = ModeInstance::new(Mode::Ionian, 7); // G major
        assert_eq!(mode.pitch_classes(), vec![7, 9, 11, 0, 2, 4, 6]);
        assert_eq!(mode.label(), "G ionian");
    }

    #[test]
    fn test_every_mode_is_a_rotation_of_ionian() {
        let ionian = Mode::Ionian.intervals();
        for (rotation, mode) in Mode::ALL.iter().enumerate() {
            let base = ionian[rotation];
            let rotated: Vec<u8> = (0..7)
                .map(|i| (ionian[(i + rotation) % 7] + 12 - base) % 12)
                .collect();
            assert_eq!(rotated, mode.intervals().to_vec(), "{:?}", mode);
        }
    }
}
