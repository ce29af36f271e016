// Ensemble recipes: fixed line-ups run through the orchestrator.
//
// A recipe is data only: a name, a display label and an ordered list of
// voices, each either a melody or a chord progression on one instrument.
// `compose_ensemble` walks the voices under a single shared tempo. The
// first melody voice takes the seed data (if any); later melodies are
// unseeded. Progressions harmonize the notes of the first melody that has
// at least two distinct pitches, otherwise they draw from a fresh scale.

use crate::composition::Composition;
use crate::config::GeneratorConfig;
use crate::error::{MusicError, Result};
use crate::generate::{
    generate_chord_progression, generate_melody, generate_title, pick_tempo, progression_key,
    scale_from_melody,
};
use crate::scale::SourceScale;
use crate::seed::SeedData;
use serde::Serialize;
use tessitura_prng::Prng;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Voice {
    Melody { instrument: &'static str },
    Progression { instrument: &'static str },
}

impl Voice {
    pub fn instrument(self) -> &'static str {
        match self {
            Voice::Melody { instrument } | Voice::Progression { instrument } => instrument,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Ensemble {
    /// Lookup key, e.g. "string-quartet".
    pub name: &'static str,
    /// Stamped on the composition, e.g. "string quartet".
    pub label: &'static str,
    pub voices: &'static [Voice],
}

const fn melody(instrument: &'static str) -> Voice {
    Voice::Melody { instrument }
}

const fn progression(instrument: &'static str) -> Voice {
    Voice::Progression { instrument }
}

pub static ENSEMBLES: [Ensemble; 5] = [
    Ensemble {
        name: "solo-piano",
        label: "solo piano",
        voices: &[
            melody("Acoustic Grand Piano"),
            progression("Acoustic Grand Piano"),
        ],
    },
    Ensemble {
        name: "piano-duet",
        label: "piano duet",
        voices: &[
            melody("Acoustic Grand Piano"),
            melody("Bright Acoustic Piano"),
            progression("Acoustic Grand Piano"),
        ],
    },
    Ensemble {
        name: "string-trio",
        label: "string trio",
        voices: &[melody("Violin"), melody("Viola"), progression("Cello")],
    },
    Ensemble {
        name: "string-quartet",
        label: "string quartet",
        voices: &[
            melody("Violin"),
            melody("Violin"),
            melody("Viola"),
            progression("Cello"),
        ],
    },
    Ensemble {
        name: "wind-quintet",
        label: "wind quintet",
        voices: &[
            melody("Flute"),
            melody("Oboe"),
            melody("Clarinet"),
            melody("French Horn"),
            progression("Bassoon"),
        ],
    },
];

/// Find a recipe by name; case and '-'/'_'/' ' separators are ignored.
pub fn by_name(name: &str) -> Result<&'static Ensemble> {
    let wanted = normalize(name);
    ENSEMBLES
        .iter()
        .find(|e| normalize(e.name) == wanted)
        .ok_or_else(|| MusicError::lookup("ensemble", name))
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '_' | ' ' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Run every voice of `ensemble` through the orchestrator.
///
/// `tempo` defaults to a random catalog marking shared by all voices.
pub fn compose_ensemble(
    ensemble: &Ensemble,
    config: &GeneratorConfig,
    tempo: Option<f64>,
    seed: Option<&SeedData>,
    rng: &mut Prng,
) -> Result<Composition> {
    config.validate()?;
    let tempo = match tempo {
        Some(t) => t,
        None => pick_tempo(rng),
    };
    let mut piece = Composition::new(generate_title(config, rng), config.composer.clone(), tempo)?
        .with_ensemble(ensemble.label);

    let mut seed = seed;
    let mut harmony: Option<SourceScale> = None;
    let mut progressions = 0;

    for voice in ensemble.voices {
        match *voice {
            Voice::Melody { instrument } => {
                let melody = generate_melody(config, Some(tempo), Some(instrument), seed.take(), rng)?;
                debug!(instrument, notes = melody.len(), "ensemble melody");
                if harmony.is_none() {
                    harmony = scale_from_melody(&melody);
                }
                piece.add_melody(melody);
            }
            Voice::Progression { instrument } => {
                let chords = generate_chord_progression(
                    config,
                    None,
                    Some(tempo),
                    Some(instrument),
                    harmony.as_ref(),
                    rng,
                )?;
                debug!(instrument, chords = chords.len(), "ensemble progression");
                piece.add_progression(progression_key(progressions), chords)?;
                progressions += 1;
            }
        }
    }

    info!(
        ensemble = ensemble.name,
        title = %piece.title,
        tempo,
        voices = piece.voice_count(),
        "composed ensemble piece"
    );
    Ok(piece)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::instrument_program;

    #[test]
    fn recipe_instruments_are_in_the_catalog() {
        for ensemble in &ENSEMBLES {
            assert!(!ensemble.voices.is_empty());
            for voice in ensemble.voices {
                instrument_program(voice.instrument()).unwrap();
            }
        }
    }

    #[test]
    fn lookup_ignores_case_and_separators() {
        assert_eq!(by_name("String_Quartet").unwrap().name, "string-quartet");
        assert_eq!(by_name("wind quintet").unwrap().voices.len(), 5);
        assert!(matches!(by_name("gamelan"), Err(MusicError::LookupMiss { .. })));
    }

    #[test]
    fn bad_config_is_rejected_before_composing() {
        let config = GeneratorConfig {
            start_octaves: vec![],
            ..Default::default()
        };
        let trio = by_name("string-trio").unwrap();
        assert!(compose_ensemble(trio, &config, None, None, &mut Prng::new(2)).is_err());
    }

    #[test]
    fn quartet_has_one_track_per_voice() {
        let config = GeneratorConfig::default();
        let quartet = by_name("string-quartet").unwrap();
        let piece = compose_ensemble(quartet, &config, Some(96.0), None, &mut Prng::new(5)).unwrap();
        assert_eq!(piece.melodies.len(), 3);
        assert_eq!(piece.chords.len(), 1);
        assert_eq!(piece.instruments, vec!["Violin", "Violin", "Viola", "Cello"]);
        assert_eq!(piece.ensemble, "string quartet");
        assert!(piece.melodies.iter().all(|m| m.tempo() == 96.0));
    }

    #[test]
    fn progressions_harmonize_the_first_melody() {
        let config = GeneratorConfig::default();
        let trio = by_name("string-trio").unwrap();
        let piece = compose_ensemble(trio, &config, None, None, &mut Prng::new(9)).unwrap();
        let lead = piece.melodies[0].notes();
        for chord in &piece.chords[&progression_key(0)] {
            assert!(chord.notes().iter().all(|n| lead.contains(n)));
        }
    }

    #[test]
    fn only_the_first_melody_is_seeded() {
        let config = GeneratorConfig::default();
        let duet = by_name("piano-duet").unwrap();
        let seed = SeedData::Ints(vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let piece = compose_ensemble(duet, &config, None, Some(&seed), &mut Prng::new(2)).unwrap();
        assert_eq!(piece.melodies[0].len(), 11);
    }
}
