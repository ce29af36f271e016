// Error taxonomy for the generators and the MIDI assembler.
//
// Every failure is local and synchronous: a sub-step that cannot produce a
// result returns one of these, and the orchestrator propagates it with `?`
// without retrying. A composition is either fully built or not built at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MusicError {
    /// Argument has the wrong shape (e.g. per-position intervals whose
    /// length differs from the pitch list, or a non-finite float seed).
    #[error("input shape error: {0}")]
    InputShape(String),

    /// Numeric value outside its documented bound.
    #[error("{what} {value} out of range {low}..={high}")]
    Range {
        what: &'static str,
        value: f64,
        low: f64,
        high: f64,
    },

    /// A note name or instrument name missing from its reference table.
    #[error("unknown {table} entry: {key:?}")]
    LookupMiss { table: &'static str, key: String },

    /// Parallel sequences (notes/rhythms/dynamics) of differing lengths.
    #[error("length mismatch: {notes} notes, {rhythms} rhythms, {dynamics} dynamics")]
    LengthMismatch {
        notes: usize,
        rhythms: usize,
        dynamics: usize,
    },

    #[error("seed data is empty")]
    EmptySeed,

    #[error("malformed hex seed: {0:?}")]
    MalformedHex(String),

    /// A pitch-class-only note name reached a step that needs an octave.
    #[error("note {0:?} has no octave")]
    MissingOctave(String),

    #[error("MIDI encoding error: {0}")]
    Midi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MusicError {
    pub(crate) fn range(what: &'static str, value: f64, low: f64, high: f64) -> Self {
        MusicError::Range {
            what,
            value,
            low,
            high,
        }
    }

    pub(crate) fn lookup(table: &'static str, key: impl Into<String>) -> Self {
        MusicError::LookupMiss {
            table,
            key: key.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MusicError>;
