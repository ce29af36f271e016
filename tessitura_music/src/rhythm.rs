// Rhythm and dynamics sequences, and tempo scaling.
//
// Both sequence generators share one repetition policy: pick a catalog
// value, then flip a coin. Heads repeats it 1..=limit times (limit is a
// third of the requested total, at least 2); tails emits it once, but only
// if it is not already in the sequence. The result is weighted toward short
// repeated runs while the tails branch pushes for variety.
//
// Durations are authored at 60 BPM. `scale_to_tempo` multiplies by
// 60/bpm and rounds to 3 decimals so sums over long voices do not drift;
// `revert_tempo` is the inverse.

use crate::error::{MusicError, Result};
use crate::tables::{DYNAMICS, RHYTHMS};
use tessitura_prng::Prng;

/// Decimal places kept after tempo scaling.
const PRECISION: f64 = 1000.0;

/// Uniformly sample one base duration.
pub fn pick_duration(rng: &mut Prng) -> f64 {
    RHYTHMS[rng.range_usize(0, RHYTHMS.len())]
}

/// Uniformly sample one velocity.
pub fn pick_dynamic(rng: &mut Prng) -> u8 {
    DYNAMICS[rng.range_usize(0, DYNAMICS.len())]
}

/// Fill exactly `total` values using the repetition policy.
fn repeat_policy<T: Copy + PartialEq>(
    total: usize,
    rng: &mut Prng,
    mut pick: impl FnMut(&mut Prng) -> T,
) -> Vec<T> {
    let limit = (total / 3).max(2);
    let mut out = Vec::with_capacity(total);
    while out.len() < total {
        let value = pick(rng);
        if rng.coin() {
            let repeats = rng.range_usize_inclusive(1, limit).min(total - out.len());
            out.extend(std::iter::repeat_n(value, repeats));
        } else if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// A sequence of exactly `total` base durations (60 BPM seconds).
pub fn generate_rhythm_sequence(total: usize, rng: &mut Prng) -> Vec<f64> {
    repeat_policy(total, rng, pick_duration)
}

/// A sequence of exactly `total` velocities from the dynamics catalog.
pub fn generate_dynamics_sequence(total: usize, rng: &mut Prng) -> Vec<u8> {
    repeat_policy(total, rng, pick_dynamic)
}

fn check_bpm(tempo_bpm: f64) -> Result<f64> {
    if tempo_bpm.is_finite() && tempo_bpm > 0.0 {
        Ok(tempo_bpm)
    } else {
        Err(MusicError::range("tempo", tempo_bpm, f64::MIN_POSITIVE, f64::MAX))
    }
}

fn round(value: f64) -> f64 {
    (value * PRECISION).round() / PRECISION
}

/// Convert one 60 BPM duration to seconds at `tempo_bpm`.
pub fn scale_duration(tempo_bpm: f64, duration: f64) -> Result<f64> {
    Ok(round(duration * 60.0 / check_bpm(tempo_bpm)?))
}

/// Convert 60 BPM durations to seconds at `tempo_bpm`.
pub fn scale_to_tempo(tempo_bpm: f64, durations: &[f64]) -> Result<Vec<f64>> {
    let factor = 60.0 / check_bpm(tempo_bpm)?;
    Ok(durations.iter().map(|d| round(d * factor)).collect())
}

/// Undo `scale_to_tempo`: seconds at `tempo_bpm` back to 60 BPM durations.
pub fn revert_tempo(tempo_bpm: f64, durations: &[f64]) -> Result<Vec<f64>> {
    let factor = check_bpm(tempo_bpm)? / 60.0;
    Ok(durations.iter().map(|d| round(d * factor)).collect())
}
