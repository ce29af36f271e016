// Root scales and multi-octave source scales.
//
// A `ScaleRoot` is a short octave-less note list (5–12 names) with a label
// for provenance. `pick_root` chooses one of three strategies uniformly:
// a diatonic key scale from the tables, a church mode shifted by 0–11
// semitones, or a freshly derived 5–9 note pitch-class set. Forte catalog
// roots are available through `pick_root_from(ScaleSource::Forte, ..)`.
//
// `build_source_scale` stacks a root upward through octaves until the
// target length is reached. When the octave counter would pass
// `MAX_SOURCE_OCTAVE` a new root is picked and the octave resets, so long
// runs wander through several tonal centers instead of repeating one scale.
// Every root visited is recorded on the resulting `SourceScale`.

use crate::error::{MusicError, Result};
use crate::forte;
use crate::mode::{Mode, ModeInstance};
use crate::pitch::{MIN_OCTAVE, NoteName, octave_equivalence_all, transpose_all};
use crate::tables::{MAJOR_SCALES, MINOR_SCALES};
use serde::{Deserialize, Serialize};
use tessitura_prng::Prng;
use tracing::debug;

/// Highest octave a source scale climbs to before re-rooting.
pub const MAX_SOURCE_OCTAVE: u8 = 5;

/// Where a root scale comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleSource {
    /// One of the 12 major or 12 natural minor key scales.
    Diatonic,
    /// A church mode transposed by 0–11 semitones.
    Mode,
    /// A Forte prime form transposed by 0–11 semitones.
    Forte,
    /// A random 5–9 note pitch-class set, sorted ascending.
    Derived,
}

impl ScaleSource {
    /// The strategies `pick_root` chooses between.
    pub const DEFAULT_CHOICES: [ScaleSource; 3] =
        [ScaleSource::Diatonic, ScaleSource::Mode, ScaleSource::Derived];
}

/// An octave-less root scale plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleRoot {
    pub notes: Vec<NoteName>,
    /// e.g. "C major", "D dorian", "[0, 2, 5, 7, 9]".
    pub label: String,
    /// Forte number of the root's set class, when it has 5–9 notes.
    pub forte: Option<String>,
}

impl ScaleRoot {
    /// Build a root from spellings such as `["C", "D", "E"]`.
    pub fn from_names(names: &[&str], label: impl Into<String>) -> Result<Self> {
        let notes = names
            .iter()
            .map(|n| n.parse::<NoteName>())
            .collect::<Result<Vec<_>>>()?;
        Self::from_notes(notes, label)
    }

    /// Build a root from pitch classes, spelled with the default names.
    pub fn from_pitch_classes(pcs: &[i32], label: impl Into<String>) -> Result<Self> {
        let notes = pcs
            .iter()
            .map(|&pc| NoteName::from_pitch_class(pc, None))
            .collect::<Result<Vec<_>>>()?;
        Self::from_notes(notes, label)
    }

    fn from_notes(notes: Vec<NoteName>, label: impl Into<String>) -> Result<Self> {
        if notes.is_empty() {
            return Err(MusicError::InputShape("root scale has no notes".into()));
        }
        let pcs: Vec<i32> = notes.iter().map(|n| n.pitch_class() as i32).collect();
        Ok(ScaleRoot {
            forte: forte::identify(&pcs).map(|set| set.number.to_string()),
            label: label.into(),
            notes,
        })
    }
}

/// Pick a root with one of the three default strategies, chosen uniformly.
pub fn pick_root(rng: &mut Prng) -> Result<ScaleRoot> {
    let source = ScaleSource::DEFAULT_CHOICES[rng.range_usize(0, 3)];
    pick_root_from(source, rng)
}

/// Pick a root with a specific strategy.
pub fn pick_root_from(source: ScaleSource, rng: &mut Prng) -> Result<ScaleRoot> {
    let root = match source {
        ScaleSource::Diatonic => {
            let (table, quality) = if rng.coin() {
                (&MAJOR_SCALES, "major")
            } else {
                (&MINOR_SCALES, "minor")
            };
            let (tonic, notes) = table[rng.range_usize(0, table.len())];
            ScaleRoot::from_names(&notes, format!("{tonic} {quality}"))?
        }
        ScaleSource::Mode => {
            let mode = Mode::ALL[rng.range_usize(0, Mode::ALL.len())];
            let instance = ModeInstance::new(mode, rng.range_usize(0, 12) as u8);
            let pcs: Vec<i32> = instance.pitch_classes().iter().map(|&p| p as i32).collect();
            ScaleRoot::from_pitch_classes(&pcs, instance.label())?
        }
        ScaleSource::Forte => {
            let set = &forte::catalog()[rng.range_usize(0, forte::catalog().len())];
            let prime: Vec<i32> = set.pcs.iter().map(|&p| p as i32).collect();
            let shift = rng.range_usize(0, 12) as i32;
            let mut pcs = transpose_all(&prime, shift, true)?;
            pcs.sort_unstable();
            ScaleRoot::from_pitch_classes(&pcs, format!("Forte {} {:?}", set.number, pcs))?
        }
        ScaleSource::Derived => {
            let pcs = derive_scale(rng);
            ScaleRoot::from_pitch_classes(&pcs, format!("{pcs:?}"))?
        }
    };
    debug!(?source, label = %root.label, forte = ?root.forte, "picked root scale");
    Ok(root)
}

/// Synthesize a 5–9 note scale by drawing unused pitch classes until the
/// target cardinality is reached, then sorting ascending.
pub fn derive_scale(rng: &mut Prng) -> Vec<i32> {
    let total = rng.range_usize_inclusive(forte::MIN_CARDINALITY, forte::MAX_CARDINALITY);
    let mut pcs: Vec<i32> = Vec::with_capacity(total);
    while pcs.len() < total {
        let pc = rng.range_usize(0, 12) as i32;
        if !pcs.contains(&pc) {
            pcs.push(pc);
        }
    }
    pcs.sort_unstable();
    octave_equivalence_all(&pcs)
}

/// A multi-octave note sequence used as the index space for note selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceScale {
    pub notes: Vec<NoteName>,
    /// Labels of every root used, in order.
    pub roots: Vec<String>,
    /// Forte numbers of every root used, where known.
    pub forte: Vec<String>,
}

impl SourceScale {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Provenance record for containers built from this scale.
    pub fn provenance(&self) -> Provenance {
        Provenance {
            roots: self.roots.clone(),
            forte: self.forte.clone(),
        }
    }

    fn record_root(&mut self, root: &ScaleRoot) {
        self.roots.push(root.label.clone());
        if let Some(number) = &root.forte {
            self.forte.push(number.clone());
        }
    }
}

/// Which roots (and their set classes) a melody or chord was drawn from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub roots: Vec<String>,
    pub forte: Vec<String>,
}

/// Cycle `root` upward from `start_octave` until `target_length` notes exist.
///
/// The octave advances whenever the next note's written position is not
/// above the previous one, so "C D E F G A B" gives C2..B2 then C3..., and
/// "D E F# G A B C#" places C# in the octave above B.
pub fn build_source_scale(
    root: &ScaleRoot,
    target_length: usize,
    start_octave: u8,
    rng: &mut Prng,
) -> Result<SourceScale> {
    let mut scale = SourceScale::default();
    if target_length == 0 {
        return Ok(scale);
    }
    if root.notes.is_empty() {
        return Err(MusicError::InputShape("root scale has no notes".into()));
    }
    if !(MIN_OCTAVE..=MAX_SOURCE_OCTAVE).contains(&start_octave) {
        return Err(MusicError::range(
            "start octave",
            start_octave as f64,
            MIN_OCTAVE as f64,
            MAX_SOURCE_OCTAVE as f64,
        ));
    }

    let mut current = root.clone();
    scale.record_root(&current);
    let mut octave = start_octave;
    let mut index = 0;
    let mut previous: Option<i32> = None;

    while scale.notes.len() < target_length {
        let note = &current.notes[index];
        let position = note.written_offset();
        if previous.is_some_and(|prev| position <= prev) {
            octave += 1;
        }
        if octave > MAX_SOURCE_OCTAVE {
            current = pick_root(rng)?;
            debug!(label = %current.label, at = scale.notes.len(), "re-rooting source scale");
            scale.record_root(&current);
            octave = start_octave;
            index = 0;
            previous = None;
            continue;
        }
        scale.notes.push(note.with_octave(octave)?);
        previous = Some(position);
        index = (index + 1) % current.notes.len();
    }

    Ok(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_major() -> ScaleRoot {
        ScaleRoot::from_names(&["C", "D", "E", "F", "G", "A", "B"], "C major").unwrap()
    }

    fn names(scale: &SourceScale) -> Vec<String> {
        scale.notes.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn c_major_cycles_into_the_next_octave() {
        let mut rng = Prng::new(1);
        let scale = build_source_scale(&c_major(), 10, 2, &mut rng).unwrap();
        assert_eq!(
            names(&scale),
            vec!["C2", "D2", "E2", "F2", "G2", "A2", "B2", "C3", "D3", "E3"]
        );
        assert_eq!(scale.roots, vec!["C major"]);
        assert_eq!(scale.forte, vec!["7-35"]);
    }

    #[test]
    fn zero_length_is_empty() {
        let mut rng = Prng::new(1);
        let scale = build_source_scale(&c_major(), 0, 2, &mut rng).unwrap();
        assert!(scale.is_empty());
    }

    #[test]
    fn rotated_roots_keep_ascending() {
        let mut rng = Prng::new(1);
        let d_major =
            ScaleRoot::from_names(&["D", "E", "F#", "G", "A", "B", "C#"], "D major").unwrap();
        let scale = build_source_scale(&d_major, 14, 3, &mut rng).unwrap();
        let midi: Vec<u8> = scale.notes.iter().map(|n| n.midi_number().unwrap()).collect();
        assert!(midi.windows(2).all(|w| w[0] < w[1]), "{midi:?}");
        assert_eq!(scale.notes[6].to_string(), "C#4");
    }

    #[test]
    fn flat_spellings_stay_ascending() {
        let mut rng = Prng::new(1);
        let root = ScaleRoot::from_names(&MINOR_SCALES[3].1, "Eb minor").unwrap();
        let scale = build_source_scale(&root, 7, 3, &mut rng).unwrap();
        let midi: Vec<u8> = scale.notes.iter().map(|n| n.midi_number().unwrap()).collect();
        assert!(midi.windows(2).all(|w| w[0] < w[1]), "{midi:?}");
    }

    #[test]
    fn long_scales_re_root_past_octave_five() {
        let mut rng = Prng::new(99);
        // Octaves 2..=5 of C major hold 28 notes; anything longer re-roots.
        let scale = build_source_scale(&c_major(), 60, 2, &mut rng).unwrap();
        assert_eq!(scale.len(), 60);
        assert!(scale.roots.len() >= 2);
        assert_eq!(scale.notes[27].to_string(), "B5");
        assert!(scale.notes.iter().all(|n| {
            let o = n.octave().unwrap();
            (2..=MAX_SOURCE_OCTAVE).contains(&o)
        }));
    }

    #[test]
    fn bad_start_octave() {
        let mut rng = Prng::new(1);
        assert!(matches!(
            build_source_scale(&c_major(), 4, 7, &mut rng),
            Err(MusicError::Range { .. })
        ));
    }

    #[test]
    fn derived_scales_are_sorted_unique_and_sized() {
        let mut rng = Prng::new(5);
        for _ in 0..200 {
            let pcs = derive_scale(&mut rng);
            assert!((5..=9).contains(&pcs.len()));
            assert!(pcs.windows(2).all(|w| w[0] < w[1]));
            assert!(pcs.iter().all(|p| (0..12).contains(p)));
            assert!(forte::identify(&pcs).is_some());
        }
    }

    #[test]
    fn every_source_produces_a_usable_root() {
        let mut rng = Prng::new(11);
        for source in [
            ScaleSource::Diatonic,
            ScaleSource::Mode,
            ScaleSource::Forte,
            ScaleSource::Derived,
        ] {
            for _ in 0..50 {
                let root = pick_root_from(source, &mut rng).unwrap();
                assert!((5..=12).contains(&root.notes.len()), "{}", root.label);
                assert!(!root.label.is_empty());
                assert!(root.forte.is_some(), "{}", root.label);
            }
        }
    }

    #[test]
    fn pick_root_is_deterministic() {
        let a = pick_root(&mut Prng::new(3)).unwrap();
        let b = pick_root(&mut Prng::new(3)).unwrap();
        assert_eq!(a, b);
    }
}
