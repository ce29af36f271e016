// Generation orchestrator: fills melodies, chords and compositions.
//
// Composes the pitch/scale engine (`scale.rs`) and the rhythm/dynamics
// engine (`rhythm.rs`). Every function takes the caller's `Prng`, so the
// same seed and config always produce the same output. Any failing
// sub-step aborts the whole call with its error; nothing is retried.
//
// Melodies pick notes either from seed data (each normalized integer is an
// index into the source scale) or uniformly at random. Rhythms and
// dynamics are generated afterwards to the same length, and rhythms are
// tempo-scaled. Chords sample 2–9 notes with replacement and de-duplicate.
// A composition pairs one melody with a progression built from that
// melody's own notes.

use crate::chord::{Chord, ChordBuilder, MAX_CHORD_NOTES, MIN_CHORD_NOTES};
use crate::composition::Composition;
use crate::config::GeneratorConfig;
use crate::error::{MusicError, Result};
use crate::melody::{Melody, MelodyBuilder};
use crate::pitch::NoteName;
use crate::rhythm::{
    generate_dynamics_sequence, generate_rhythm_sequence, pick_duration, pick_dynamic,
    scale_duration, scale_to_tempo,
};
use crate::scale::{SourceScale, build_source_scale, pick_root};
use crate::seed::{SeedData, clamp_indices};
use crate::tables::{INSTRUMENTS, TEMPOS, check_tempo};
use tessitura_prng::Prng;
use tracing::{debug, info};

/// Fewest notes an unseeded melody draws.
const MIN_MELODY_NOTES: usize = 3;

/// Uniformly pick a metronome marking.
pub fn pick_tempo(rng: &mut Prng) -> f64 {
    TEMPOS[rng.range_usize(0, TEMPOS.len())]
}

/// Uniformly pick a General MIDI instrument name.
pub fn pick_instrument(rng: &mut Prng) -> &'static str {
    INSTRUMENTS[rng.range_usize(0, INSTRUMENTS.len())]
}

fn resolve_tempo(tempo: Option<f64>, rng: &mut Prng) -> Result<f64> {
    match tempo {
        Some(t) => check_tempo(t),
        None => Ok(pick_tempo(rng)),
    }
}

fn resolve_instrument(config: &GeneratorConfig, instrument: Option<&str>) -> String {
    instrument
        .unwrap_or(config.fallback_instrument.as_str())
        .to_string()
}

/// Pick a fresh root and stack it to `length` notes.
pub fn generate_source_scale(
    config: &GeneratorConfig,
    length: usize,
    rng: &mut Prng,
) -> Result<SourceScale> {
    config.validate()?;
    let start_octave = *rng
        .choose(&config.start_octaves)
        .ok_or_else(|| MusicError::InputShape("start_octaves is empty".into()))?;
    let root = pick_root(rng)?;
    build_source_scale(&root, length, start_octave, rng)
}

/// Select one scale note per seed value, folding out-of-range indices.
pub fn seeded_notes(scale: &SourceScale, values: &[i64]) -> Result<Vec<NoteName>> {
    if values.is_empty() {
        return Err(MusicError::EmptySeed);
    }
    Ok(clamp_indices(values, scale.len())?
        .into_iter()
        .map(|i| scale.notes[i].clone())
        .collect())
}

/// Generate a melody, optionally steered by seed data.
pub fn generate_melody(
    config: &GeneratorConfig,
    tempo: Option<f64>,
    instrument: Option<&str>,
    seed: Option<&SeedData>,
    rng: &mut Prng,
) -> Result<Melody> {
    config.validate()?;
    let values = seed.map(SeedData::normalize).transpose()?;
    let length = match &values {
        Some(v) => v.len().max(config.min_seed_scale_length),
        None => {
            let (low, high) = config.scale_length;
            rng.range_usize_inclusive(low, high)
        }
    };
    let scale = generate_source_scale(config, length, rng)?;
    debug!(
        seed = seed.map(SeedData::kind),
        scale_len = scale.len(),
        roots = ?scale.roots,
        "building melody"
    );
    melody_from_scale(config, &scale, tempo, instrument, values.as_deref(), rng)
}

/// Generate a melody over an existing source scale.
///
/// With seed values, note `i` is `scale[values[i]]` after folding (see
/// `clamp_indices`). Without, a
/// random total between 3 and the scale length is drawn uniformly.
pub fn melody_from_scale(
    config: &GeneratorConfig,
    scale: &SourceScale,
    tempo: Option<f64>,
    instrument: Option<&str>,
    seed_values: Option<&[i64]>,
    rng: &mut Prng,
) -> Result<Melody> {
    config.validate()?;
    if scale.is_empty() {
        return Err(MusicError::InputShape("source scale is empty".into()));
    }
    let tempo = resolve_tempo(tempo, rng)?;

    let notes = match seed_values {
        Some(values) => seeded_notes(scale, values)?,
        None => {
            let total = rng.range_usize_inclusive(MIN_MELODY_NOTES.min(scale.len()), scale.len());
            (0..total)
                .map(|_| scale.notes[rng.range_usize(0, scale.len())].clone())
                .collect()
        }
    };

    let total = notes.len();
    let rhythms = scale_to_tempo(tempo, &generate_rhythm_sequence(total, rng))?;
    let dynamics = generate_dynamics_sequence(total, rng);

    MelodyBuilder::new()
        .tempo(tempo)
        .instrument(resolve_instrument(config, instrument))
        .provenance(scale.provenance())
        .notes(notes)
        .rhythms(rhythms)
        .dynamics(dynamics)
        .build()
}

/// Generate one chord. Without a scale, a fresh one is built first.
pub fn generate_chord(
    config: &GeneratorConfig,
    tempo: Option<f64>,
    instrument: Option<&str>,
    scale: Option<&SourceScale>,
    rng: &mut Prng,
) -> Result<Chord> {
    config.validate()?;
    let owned;
    let scale = match scale {
        Some(s) => s,
        None => {
            let (low, high) = config.scale_length;
            owned = generate_source_scale(config, rng.range_usize_inclusive(low, high), rng)?;
            &owned
        }
    };
    let tempo = resolve_tempo(tempo, rng)?;

    let mut distinct: Vec<&NoteName> = Vec::new();
    for note in &scale.notes {
        if !distinct.contains(&note) {
            distinct.push(note);
        }
    }
    if distinct.len() < MIN_CHORD_NOTES {
        return Err(MusicError::InputShape(format!(
            "need at least {MIN_CHORD_NOTES} distinct notes for a chord, scale has {}",
            distinct.len()
        )));
    }

    // Sample with replacement, then top up until two distinct notes exist.
    let size = rng.range_usize_inclusive(MIN_CHORD_NOTES, MAX_CHORD_NOTES);
    let mut notes: Vec<NoteName> = Vec::with_capacity(size);
    for _ in 0..size {
        let note = &scale.notes[rng.range_usize(0, scale.len())];
        if !notes.contains(note) {
            notes.push(note.clone());
        }
    }
    while notes.len() < MIN_CHORD_NOTES {
        let note = &scale.notes[rng.range_usize(0, scale.len())];
        if !notes.contains(note) {
            notes.push(note.clone());
        }
    }

    ChordBuilder::new()
        .tempo(tempo)
        .instrument(resolve_instrument(config, instrument))
        .provenance(scale.provenance())
        .notes(notes)
        .rhythm(scale_duration(tempo, pick_duration(rng))?)
        .dynamic(pick_dynamic(rng))
        .build()
}

/// Generate `total` chords sharing one tempo and one scale.
pub fn generate_chord_progression(
    config: &GeneratorConfig,
    total: Option<usize>,
    tempo: Option<f64>,
    instrument: Option<&str>,
    scale: Option<&SourceScale>,
    rng: &mut Prng,
) -> Result<Vec<Chord>> {
    config.validate()?;
    let total = match total {
        Some(0) => {
            return Err(MusicError::InputShape(
                "a progression needs at least one chord".into(),
            ));
        }
        Some(n) => n,
        None => {
            let (low, high) = config.progression_length;
            rng.range_usize_inclusive(low, high)
        }
    };
    let tempo = resolve_tempo(tempo, rng)?;
    let owned;
    let scale = match scale {
        Some(s) => s,
        None => {
            let (low, high) = config.scale_length;
            owned = generate_source_scale(config, rng.range_usize_inclusive(low, high), rng)?;
            &owned
        }
    };

    (0..total)
        .map(|_| generate_chord(config, Some(tempo), instrument, Some(scale), rng))
        .collect()
}

/// Source scale made from a melody's own notes, for harmonizing it.
///
/// `None` when the melody has fewer than two distinct notes, since no chord
/// could be drawn from it.
pub fn scale_from_melody(melody: &Melody) -> Option<SourceScale> {
    let notes = melody.notes();
    if !notes.iter().any(|n| *n != notes[0]) {
        return None;
    }
    let provenance = melody.provenance();
    Some(SourceScale {
        notes: notes.to_vec(),
        roots: provenance.roots.clone(),
        forte: provenance.forte.clone(),
    })
}

/// Key under which the n-th progression of a composition is stored.
pub fn progression_key(index: usize) -> String {
    format!("progression-{:02}", index + 1)
}

/// A random title such as "Study 412".
pub fn generate_title(config: &GeneratorConfig, rng: &mut Prng) -> String {
    format!("{} {}", config.title_prefix, rng.range_usize(1, 1000))
}

/// One melody plus one progression harmonizing it, with random instruments.
pub fn generate_composition(
    config: &GeneratorConfig,
    tempo: Option<f64>,
    seed: Option<&SeedData>,
    rng: &mut Prng,
) -> Result<Composition> {
    config.validate()?;
    let tempo = resolve_tempo(tempo, rng)?;
    let melody_instrument = pick_instrument(rng);
    let chord_instrument = pick_instrument(rng);

    let melody = generate_melody(config, Some(tempo), Some(melody_instrument), seed, rng)?;
    let harmony = scale_from_melody(&melody);
    if harmony.is_none() {
        debug!("melody too uniform to harmonize, using a fresh scale");
    }
    let chords = generate_chord_progression(
        config,
        None,
        Some(tempo),
        Some(chord_instrument),
        harmony.as_ref(),
        rng,
    )?;

    let mut piece = Composition::new(generate_title(config, rng), config.composer.clone(), tempo)?
        .with_ensemble("melody with chords");
    piece.add_melody(melody);
    piece.add_progression(progression_key(0), chords)?;

    info!(
        title = %piece.title,
        tempo,
        voices = piece.voice_count(),
        duration = piece.duration(),
        "generated composition"
    );
    Ok(piece)
}
