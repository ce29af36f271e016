// Plain-text log of a composition.
//
// Written next to the MIDI file so a listener can see what was generated:
// the header metadata, then every voice with its instrument, note names,
// rhythms (seconds), dynamics (velocities) and the source scales it was
// drawn from. Progressions list one line per chord.

use crate::chord::{Chord, progression_duration};
use crate::composition::Composition;
use crate::error::Result;
use crate::melody::Melody;
use crate::scale::Provenance;
use std::fmt::Write;
use std::path::Path;
use tracing::info;

/// Render the full log as a string.
pub fn render(piece: &Composition) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "title: {}", piece.title);
    let _ = writeln!(out, "composer: {}", piece.composer);
    let _ = writeln!(out, "date: {}", piece.date);
    let _ = writeln!(out, "tempo: {} bpm", piece.tempo);
    if !piece.ensemble.is_empty() {
        let _ = writeln!(out, "ensemble: {}", piece.ensemble);
    }
    let _ = writeln!(out, "instruments: {}", piece.voice_instruments().join(", "));
    let _ = writeln!(out, "duration: {:.3} s", piece.duration());

    for (i, melody) in piece.melodies.iter().enumerate() {
        out.push('\n');
        render_melody(&mut out, i + 1, melody);
    }
    for (key, chords) in &piece.chords {
        out.push('\n');
        render_progression(&mut out, key, chords);
    }
    out
}

fn render_melody(out: &mut String, number: usize, melody: &Melody) {
    let _ = writeln!(out, "melody {number} ({})", melody.instrument());
    let notes: Vec<String> = melody.notes().iter().map(|n| n.to_string()).collect();
    let rhythms: Vec<String> = melody.rhythms().iter().map(|r| r.to_string()).collect();
    let dynamics: Vec<String> = melody.dynamics().iter().map(|d| d.to_string()).collect();
    let _ = writeln!(out, "  notes: {}", notes.join(" "));
    let _ = writeln!(out, "  rhythms: {}", rhythms.join(" "));
    let _ = writeln!(out, "  dynamics: {}", dynamics.join(" "));
    let _ = writeln!(out, "  duration: {:.3} s", melody.duration());
    render_provenance(out, melody.provenance());
}

fn render_progression(out: &mut String, key: &str, chords: &[Chord]) {
    let instrument = chords.first().map(Chord::instrument).unwrap_or_default();
    let _ = writeln!(out, "{key} ({instrument}, {} chords)", chords.len());
    for chord in chords {
        let notes: Vec<String> = chord.notes().iter().map(|n| n.to_string()).collect();
        let _ = writeln!(
            out,
            "  [{}] rhythm {} dynamic {}",
            notes.join(" "),
            chord.rhythm(),
            chord.dynamic()
        );
    }
    let _ = writeln!(out, "  duration: {:.3} s", progression_duration(chords));
    if let Some(first) = chords.first() {
        render_provenance(out, first.provenance());
    }
}

fn render_provenance(out: &mut String, provenance: &Provenance) {
    if !provenance.roots.is_empty() {
        let _ = writeln!(out, "  scales: {}", provenance.roots.join("; "));
    }
    if !provenance.forte.is_empty() {
        let _ = writeln!(out, "  forte: {}", provenance.forte.join(", "));
    }
}

/// Write the log to `path`.
pub fn write(piece: &Composition, path: &Path) -> Result<()> {
    std::fs::write(path, render(piece))?;
    info!(path = %path.display(), "wrote text log");
    Ok(())
}
