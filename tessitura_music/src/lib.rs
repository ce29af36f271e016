// Tessitura generative music toolkit
//
// Randomly assembles melodies, chord progressions and multi-voice ensemble
// pieces from fixed music-theory tables, then writes them out as Standard
// MIDI Files plus a plain-text log. Given the same seed and configuration,
// every run produces the same piece.
//
// Architecture:
// - tables.rs: Fixed lookup data (note spellings, key scales, rhythms,
//   dynamics, tempos, General MIDI instruments)
// - mode.rs: The seven church modes and their pitch-class sets
// - forte.rs: Forte prime-form catalog (cardinalities 5-9) + set-class lookup
// - pitch.rs: Transposition, octave equivalence, NoteName parsing + MIDI numbers
// - scale.rs: Root selection strategies and multi-octave source scales
// - rhythm.rs: Duration/velocity sequences with run-repetition, tempo scaling
// - melody.rs, chord.rs, composition.rs: Containers, validated at build time
// - seed.rs: Caller-supplied seed data normalized to scale indices
// - generate.rs: Orchestrator filling melodies, chords and compositions
// - ensemble.rs: Fixed line-ups (duets, trios, quartets) over the orchestrator
// - midi.rs: Timeline assembly (seconds) + SMF output via midly
// - report.rs: Human-readable text log
// - config.rs: JSON generator configuration
// - error.rs: Crate-wide error type

pub mod chord;
pub mod composition;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod forte;
pub mod generate;
pub mod melody;
pub mod midi;
pub mod mode;
pub mod pitch;
pub mod report;
pub mod rhythm;
pub mod scale;
pub mod seed;
pub mod tables;

pub use error::{MusicError, Result};
pub use tessitura_prng::Prng;
