// Fixed music-theory lookup data.
//
// Everything here is immutable, process-wide constant data consumed
// read-only by the generators: the enharmonic spelling table, the 24
// diatonic key scales, the rhythm/dynamics/tempo catalogs and the General
// MIDI instrument list. Church modes live in `mode.rs` and the Forte
// prime-form catalog in `forte.rs`.
//
// Rhythm values are authored at an implicit 60 BPM baseline, so 1.0 is one
// quarter note = one second. `rhythm::scale_to_tempo` converts them.

use crate::error::{MusicError, Result};

// ---------------------------------------------------------------------------
// Pitch spelling
// ---------------------------------------------------------------------------

/// Default spelling for each pitch class, used when a generator produces raw
/// pitch-class integers (modes, Forte sets, derived scales).
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

/// Every accepted spelling, grouped by pitch class.
pub const ENHARMONICS: [&[&str]; 12] = [
    &["C", "B#"],
    &["C#", "Db"],
    &["D"],
    &["D#", "Eb"],
    &["E", "Fb"],
    &["F", "E#"],
    &["F#", "Gb"],
    &["G"],
    &["G#", "Ab"],
    &["A"],
    &["A#", "Bb"],
    &["B", "Cb"],
];

/// Pitch class of a spelling, or `None` if the spelling is not in the table.
pub fn spelling_pitch_class(spelling: &str) -> Option<u8> {
    ENHARMONICS
        .iter()
        .position(|names| names.contains(&spelling))
        .map(|pc| pc as u8)
}

// ---------------------------------------------------------------------------
// Diatonic key scales
// ---------------------------------------------------------------------------

pub const MAJOR_SCALES: [(&str, [&str; 7]); 12] = [
    ("C", ["C", "D", "E", "F", "G", "A", "B"]),
    ("Db", ["Db", "Eb", "F", "Gb", "Ab", "Bb", "C"]),
    ("D", ["D", "E", "F#", "G", "A", "B", "C#"]),
    ("Eb", ["Eb", "F", "G", "Ab", "Bb", "C", "D"]),
    ("E", ["E", "F#", "G#", "A", "B", "C#", "D#"]),
    ("F", ["F", "G", "A", "Bb", "C", "D", "E"]),
    ("F#", ["F#", "G#", "A#", "B", "C#", "D#", "E#"]),
    ("G", ["G", "A", "B", "C", "D", "E", "F#"]),
    ("Ab", ["Ab", "Bb", "C", "Db", "Eb", "F", "G"]),
    ("A", ["A", "B", "C#", "D", "E", "F#", "G#"]),
    ("Bb", ["Bb", "C", "D", "Eb", "F", "G", "A"]),
    ("B", ["B", "C#", "D#", "E", "F#", "G#", "A#"]),
];

/// Natural minor scales.
pub const MINOR_SCALES: [(&str, [&str; 7]); 12] = [
    ("C", ["C", "D", "Eb", "F", "G", "Ab", "Bb"]),
    ("C#", ["C#", "D#", "E", "F#", "G#", "A", "B"]),
    ("D", ["D", "E", "F", "G", "A", "Bb", "C"]),
    ("Eb", ["Eb", "F", "Gb", "Ab", "Bb", "Cb", "Db"]),
    ("E", ["E", "F#", "G", "A", "B", "C", "D"]),
    ("F", ["F", "G", "Ab", "Bb", "C", "Db", "Eb"]),
    ("F#", ["F#", "G#", "A", "B", "C#", "D", "E"]),
    ("G", ["G", "A", "Bb", "C", "D", "Eb", "F"]),
    ("G#", ["G#", "A#", "B", "C#", "D#", "E", "F#"]),
    ("A", ["A", "B", "C", "D", "E", "F", "G"]),
    ("Bb", ["Bb", "C", "Db", "Eb", "F", "Gb", "Ab"]),
    ("B", ["B", "C#", "D", "E", "F#", "G", "A"]),
];

// ---------------------------------------------------------------------------
// Rhythm, dynamics, tempo
// ---------------------------------------------------------------------------

/// Base durations in seconds at 60 BPM: whole, dotted half, half, dotted
/// quarter, quarter, dotted eighth, eighth, dotted sixteenth, sixteenth,
/// thirty-second.
pub const RHYTHMS: [f64; 10] = [4.0, 3.0, 2.0, 1.5, 1.0, 0.75, 0.5, 0.375, 0.25, 0.125];

/// MIDI velocities: soft 20–52, medium 56–88, loud 92–124.
pub const DYNAMICS: [u8; 27] = [
    20, 24, 28, 32, 36, 40, 44, 48, 52, // soft
    56, 60, 64, 68, 72, 76, 80, 84, 88, // medium
    92, 96, 100, 104, 108, 112, 116, 120, 124, // loud
];

/// Metronome markings used when no tempo is requested.
pub const TEMPOS: [f64; 39] = [
    40.0, 42.0, 44.0, 46.0, 48.0, 50.0, 52.0, 54.0, 56.0, 58.0, 60.0, 63.0, 66.0, 69.0, 72.0,
    76.0, 80.0, 84.0, 88.0, 92.0, 96.0, 100.0, 104.0, 108.0, 112.0, 116.0, 120.0, 126.0, 132.0,
    138.0, 144.0, 152.0, 160.0, 168.0, 176.0, 184.0, 192.0, 200.0, 208.0,
];

/// Accepted tempo bounds (inclusive).
pub const MIN_TEMPO: f64 = 40.0;
pub const MAX_TEMPO: f64 = 240.0;

/// Reject tempos outside `MIN_TEMPO..=MAX_TEMPO` (and NaN).
pub fn check_tempo(tempo: f64) -> Result<f64> {
    if (MIN_TEMPO..=MAX_TEMPO).contains(&tempo) {
        Ok(tempo)
    } else {
        Err(MusicError::range("tempo", tempo, MIN_TEMPO, MAX_TEMPO))
    }
}

// ---------------------------------------------------------------------------
// Instruments
// ---------------------------------------------------------------------------

pub const DEFAULT_INSTRUMENT: &str = "Acoustic Grand Piano";

/// General MIDI program names, indexed by program number.
pub const INSTRUMENTS: [&str; 128] = [
    "Acoustic Grand Piano",
    "Bright Acoustic Piano",
    "Electric Grand Piano",
    "Honky-tonk Piano",
    "Electric Piano 1",
    "Electric Piano 2",
    "Harpsichord",
    "Clavinet",
    "Celesta",
    "Glockenspiel",
    "Music Box",
    "Vibraphone",
    "Marimba",
    "Xylophone",
    "Tubular Bells",
    "Dulcimer",
    "Drawbar Organ",
    "Percussive Organ",
    "Rock Organ",
    "Church Organ",
    "Reed Organ",
    "Accordion",
    "Harmonica",
    "Tango Accordion",
    "Acoustic Guitar (nylon)",
    "Acoustic Guitar (steel)",
    "Electric Guitar (jazz)",
    "Electric Guitar (clean)",
    "Electric Guitar (muted)",
    "Overdriven Guitar",
    "Distortion Guitar",
    "Guitar Harmonics",
    "Acoustic Bass",
    "Electric Bass (finger)",
    "Electric Bass (pick)",
    "Fretless Bass",
    "Slap Bass 1",
    "Slap Bass 2",
    "Synth Bass 1",
    "Synth Bass 2",
    "Violin",
    "Viola",
    "Cello",
    "Contrabass",
    "Tremolo Strings",
    "Pizzicato Strings",
    "Orchestral Harp",
    "Timpani",
    "String Ensemble 1",
    "String Ensemble 2",
    "Synth Strings 1",
    "Synth Strings 2",
    "Choir Aahs",
    "Voice Oohs",
    "Synth Voice",
    "Orchestra Hit",
    "Trumpet",
    "Trombone",
    "Tuba",
    "Muted Trumpet",
    "French Horn",
    "Brass Section",
    "Synth Brass 1",
    "Synth Brass 2",
    "Soprano Sax",
    "Alto Sax",
    "Tenor Sax",
    "Baritone Sax",
    "Oboe",
    "English Horn",
    "Bassoon",
    "Clarinet",
    "Piccolo",
    "Flute",
    "Recorder",
    "Pan Flute",
    "Blown Bottle",
    "Shakuhachi",
    "Whistle",
    "Ocarina",
    "Lead 1 (square)",
    "Lead 2 (sawtooth)",
    "Lead 3 (calliope)",
    "Lead 4 (chiff)",
    "Lead 5 (charang)",
    "Lead 6 (voice)",
    "Lead 7 (fifths)",
    "Lead 8 (bass + lead)",
    "Pad 1 (new age)",
    "Pad 2 (warm)",
    "Pad 3 (polysynth)",
    "Pad 4 (choir)",
    "Pad 5 (bowed)",
    "Pad 6 (metallic)",
    "Pad 7 (halo)",
    "Pad 8 (sweep)",
    "FX 1 (rain)",
    "FX 2 (soundtrack)",
    "FX 3 (crystal)",
    "FX 4 (atmosphere)",
    "FX 5 (brightness)",
    "FX 6 (goblins)",
    "FX 7 (echoes)",
    "FX 8 (sci-fi)",
    "Sitar",
    "Banjo",
    "Shamisen",
    "Koto",
    "Kalimba",
    "Bagpipe",
    "Fiddle",
    "Shanai",
    "Tinkle Bell",
    "Agogo",
    "Steel Drums",
    "Woodblock",
    "Taiko Drum",
    "Melodic Tom",
    "Synth Drum",
    "Reverse Cymbal",
    "Guitar Fret Noise",
    "Breath Noise",
    "Seashore",
    "Bird Tweet",
    "Telephone Ring",
    "Helicopter",
    "Applause",
    "Gunshot",
];

/// Lowercase and collapse runs of whitespace, so "  acoustic   grand piano"
/// matches "Acoustic Grand Piano".
fn normalize_instrument(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve an instrument name to its General MIDI program number.
pub fn instrument_program(name: &str) -> Result<u8> {
    let wanted = normalize_instrument(name);
    INSTRUMENTS
        .iter()
        .position(|candidate| normalize_instrument(candidate) == wanted)
        .map(|p| p as u8)
        .ok_or_else(|| MusicError::lookup("instrument", name))
}
