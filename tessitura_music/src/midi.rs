// MIDI output from compositions.
//
// Two stages. `assemble` turns a Composition into a Timeline: one track per
// melody and per chord progression, each note carrying an absolute
// [start, end) interval in seconds. `timeline_to_smf` then converts seconds
// to ticks at the composition tempo and builds a Standard MIDI File.
//
// Cursor discipline: within one voice the cursor starts at 0 and advances by
// each note's own rhythm, so consecutive notes are contiguous and never
// overlap. Every note of a chord shares the chord's interval and the cursor
// advances once per chord. All tracks start at time zero.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 1
// (multi-track): track 0 holds the title and tempo, then one track per
// voice. Channels are assigned in track order, skipping percussion channel 9.

use crate::chord::Chord;
use crate::composition::Composition;
use crate::error::{MusicError, Result};
use crate::melody::Melody;
use crate::tables::instrument_program;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

const PERCUSSION_CHANNEL: u8 = 9;

/// Melodic channels available once percussion is skipped.
pub const MAX_TRACKS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedNote {
    pub pitch: u8,
    pub velocity: u8,
    /// Seconds from the start of the piece.
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineTrack {
    pub name: String,
    pub instrument: String,
    pub program: u8,
    pub notes: Vec<TimedNote>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub title: String,
    pub tempo: f64,
    pub tracks: Vec<TimelineTrack>,
}

impl Timeline {
    /// End of the last sounding note.
    pub fn duration(&self) -> f64 {
        self.tracks
            .iter()
            .flat_map(|t| t.notes.iter())
            .map(|n| n.end)
            .fold(0.0, f64::max)
    }
}

/// Lay every voice of `piece` out on an absolute time line.
pub fn assemble(piece: &Composition) -> Result<Timeline> {
    let mut tracks = Vec::with_capacity(piece.voice_count());
    for (i, melody) in piece.melodies.iter().enumerate() {
        tracks.push(melody_track(format!("melody-{:02}", i + 1), melody)?);
    }
    for (key, chords) in &piece.chords {
        tracks.push(progression_track(key.clone(), chords)?);
    }
    debug!(title = %piece.title, tracks = tracks.len(), "assembled timeline");
    Ok(Timeline {
        title: piece.title.clone(),
        tempo: piece.tempo,
        tracks,
    })
}

fn melody_track(name: String, melody: &Melody) -> Result<TimelineTrack> {
    let (notes, rhythms, dynamics) = (melody.notes(), melody.rhythms(), melody.dynamics());
    if notes.len() != rhythms.len() || notes.len() != dynamics.len() {
        return Err(MusicError::LengthMismatch {
            notes: notes.len(),
            rhythms: rhythms.len(),
            dynamics: dynamics.len(),
        });
    }

    let mut timed = Vec::with_capacity(notes.len());
    let mut start = 0.0;
    for ((note, &rhythm), &velocity) in notes.iter().zip(rhythms).zip(dynamics) {
        let end = start + rhythm;
        timed.push(TimedNote {
            pitch: note.midi_number()?,
            velocity: check_velocity(velocity)?,
            start,
            end,
        });
        start = end;
    }

    Ok(TimelineTrack {
        name,
        instrument: melody.instrument().to_string(),
        program: instrument_program(melody.instrument())?,
        notes: timed,
    })
}

fn progression_track(name: String, chords: &[Chord]) -> Result<TimelineTrack> {
    let first = chords
        .first()
        .ok_or_else(|| MusicError::InputShape(format!("progression {name:?} is empty")))?;

    let mut timed = Vec::new();
    let mut start = 0.0;
    for chord in chords {
        let end = start + chord.rhythm();
        let velocity = check_velocity(chord.dynamic())?;
        for note in chord.notes() {
            timed.push(TimedNote {
                pitch: note.midi_number()?,
                velocity,
                start,
                end,
            });
        }
        start = end;
    }

    Ok(TimelineTrack {
        name,
        instrument: first.instrument().to_string(),
        program: instrument_program(first.instrument())?,
        notes: timed,
    })
}

/// A sounding note needs velocity 1..=127; 0 would read as a note-off.
fn check_velocity(velocity: u8) -> Result<u8> {
    if !(1..=127).contains(&velocity) {
        return Err(MusicError::range("velocity", velocity as f64, 1.0, 127.0));
    }
    Ok(velocity)
}

/// Seconds to MIDI ticks at `tempo` BPM.
pub fn seconds_to_ticks(seconds: f64, tempo: f64) -> u32 {
    (seconds * tempo / 60.0 * TICKS_PER_QUARTER as f64).round() as u32
}

/// Microseconds per quarter note, as stored in the tempo meta event.
pub fn tempo_microseconds(tempo: f64) -> u32 {
    (60_000_000.0 / tempo).round() as u32
}

/// MIDI channel for the n-th voice track.
pub fn channel_for_track(index: usize) -> Result<u8> {
    if index >= MAX_TRACKS {
        return Err(MusicError::Midi(format!(
            "{} voice tracks exceed the {MAX_TRACKS} melodic channels",
            index + 1
        )));
    }
    let channel = index as u8;
    Ok(if channel >= PERCUSSION_CHANNEL {
        channel + 1
    } else {
        channel
    })
}

/// Convert a Timeline to an in-memory SMF borrowing its names.
pub fn timeline_to_smf(timeline: &Timeline) -> Result<Smf<'_>> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: title and tempo
    let tempo_track: Track<'_> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(timeline.title.as_bytes())),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds(
                timeline.tempo,
            )))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ];
    smf.tracks.push(tempo_track);

    for (i, voice) in timeline.tracks.iter().enumerate() {
        let channel = u4::new(channel_for_track(i)?);
        let mut track: Track<'_> = Vec::with_capacity(voice.notes.len() * 2 + 3);

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(voice.name.as_bytes())),
        });
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(voice.program),
                },
            },
        });

        // (tick, is_on, key, vel). Offs sort before ons at the same tick so
        // a repeated pitch is released before it is struck again.
        let mut events: Vec<(u32, bool, u8, u8)> = Vec::with_capacity(voice.notes.len() * 2);
        for note in &voice.notes {
            if note.pitch > 127 {
                return Err(MusicError::range("pitch", note.pitch as f64, 0.0, 127.0));
            }
            check_velocity(note.velocity)?;
            events.push((seconds_to_ticks(note.start, timeline.tempo), true, note.pitch, note.velocity));
            events.push((seconds_to_ticks(note.end, timeline.tempo), false, note.pitch, 0));
        }
        events.sort_by_key(|&(tick, is_on, key, _)| (tick, is_on, key));

        let mut last_tick = 0;
        for (tick, is_on, key, vel) in events {
            let message = if is_on {
                MidiMessage::NoteOn {
                    key: u7::new(key),
                    vel: u7::new(vel),
                }
            } else {
                MidiMessage::NoteOff {
                    key: u7::new(key),
                    vel: u7::new(0),
                }
            };
            track.push(TrackEvent {
                delta: u28::new(tick - last_tick),
                kind: TrackEventKind::Midi { channel, message },
            });
            last_tick = tick;
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);
    }

    Ok(smf)
}

/// Assemble and encode a composition as SMF bytes.
pub fn to_bytes(piece: &Composition) -> Result<Vec<u8>> {
    let timeline = assemble(piece)?;
    let smf = timeline_to_smf(&timeline)?;
    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| MusicError::Midi(e.to_string()))?;
    Ok(buf)
}

/// Convert a composition to MIDI and write to a file.
pub fn write_midi(piece: &Composition, path: &Path) -> Result<()> {
    let buf = to_bytes(piece)?;
    std::fs::write(path, &buf)?;
    info!(path = %path.display(), bytes = buf.len(), "wrote MIDI file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::ChordBuilder;
    use crate::melody::MelodyBuilder;
    use crate::pitch::parse_notes;

    fn melody(rhythms: Vec<f64>) -> Melody {
        let n = rhythms.len();
        MelodyBuilder::new()
            .tempo(60.0)
            .notes(parse_notes(&["C4", "E4", "G4", "C5"][..n]).unwrap())
            .rhythms(rhythms)
            .dynamics(vec![80; n])
            .build()
            .unwrap()
    }

    fn chord(names: &[&str], rhythm: f64) -> Chord {
        ChordBuilder::new()
            .notes(parse_notes(names).unwrap())
            .rhythm(rhythm)
            .dynamic(60)
            .instrument("Cello")
            .build()
            .unwrap()
    }

    fn piece() -> Composition {
        let mut piece = Composition::new("Test", "Nobody", 60.0).unwrap();
        piece.add_melody(melody(vec![1.0, 0.5, 2.0]));
        piece
            .add_progression("progression-01", vec![chord(&["C3", "G3"], 2.0), chord(&["F3", "A3", "C4"], 1.0)])
            .unwrap();
        piece
    }

    #[test]
    fn melody_notes_are_contiguous() {
        let timeline = assemble(&piece()).unwrap();
        let spans: Vec<(f64, f64)> = timeline.tracks[0]
            .notes
            .iter()
            .map(|n| (n.start, n.end))
            .collect();
        assert_eq!(spans, vec![(0.0, 1.0), (1.0, 1.5), (1.5, 3.5)]);
        assert_eq!(timeline.tracks[0].notes[0].pitch, 60);
    }

    #[test]
    fn chord_notes_share_their_interval() {
        let timeline = assemble(&piece()).unwrap();
        let chords = &timeline.tracks[1];
        assert_eq!(chords.name, "progression-01");
        assert_eq!(chords.program, 42);
        assert_eq!(chords.notes.len(), 5);
        assert!(chords.notes[..2].iter().all(|n| n.start == 0.0 && n.end == 2.0));
        assert!(chords.notes[2..].iter().all(|n| n.start == 2.0 && n.end == 3.0));
        assert_eq!(timeline.duration(), 3.5);
    }

    #[test]
    fn ragged_melody_is_rejected() {
        let json = r#"{
            "tempo": 60.0, "instrument": "Acoustic Grand Piano",
            "notes": ["C4", "D4"], "rhythms": [1.0], "dynamics": [80, 80],
            "provenance": { "roots": [], "forte": [] }
        }"#;
        let ragged: Melody = serde_json::from_str(json).unwrap();
        let mut piece = Composition::new("Ragged", "Nobody", 60.0).unwrap();
        piece.add_melody(ragged);
        assert!(matches!(
            assemble(&piece),
            Err(MusicError::LengthMismatch {
                notes: 2,
                rhythms: 1,
                dynamics: 2
            })
        ));
    }

    #[test]
    fn silent_velocity_is_rejected() {
        let json = r#"{
            "tempo": 60.0, "instrument": "Acoustic Grand Piano",
            "notes": ["C4", "D4"], "rhythms": [1.0, 1.0], "dynamics": [80, 0],
            "provenance": { "roots": [], "forte": [] }
        }"#;
        let quiet: Melody = serde_json::from_str(json).unwrap();
        let mut quiet_piece = Composition::new("Quiet", "Nobody", 60.0).unwrap();
        quiet_piece.add_melody(quiet);
        assert!(matches!(to_bytes(&quiet_piece), Err(MusicError::Range { .. })));

        let mut timeline = assemble(&piece()).unwrap();
        timeline.tracks[0].notes[1].velocity = 0;
        assert!(timeline_to_smf(&timeline).is_err());
    }

    #[test]
    fn tick_conversion() {
        assert_eq!(seconds_to_ticks(1.0, 60.0), 480);
        assert_eq!(seconds_to_ticks(0.5, 120.0), 480);
        assert_eq!(seconds_to_ticks(1.5, 60.0), 720);
        assert_eq!(tempo_microseconds(60.0), 1_000_000);
        assert_eq!(tempo_microseconds(240.0), 250_000);
    }

    #[test]
    fn channels_skip_percussion() {
        assert_eq!(channel_for_track(0).unwrap(), 0);
        assert_eq!(channel_for_track(8).unwrap(), 8);
        assert_eq!(channel_for_track(9).unwrap(), 10);
        assert_eq!(channel_for_track(14).unwrap(), 15);
        assert!(channel_for_track(15).is_err());
    }

    #[test]
    fn smf_has_a_tempo_track_plus_one_per_voice() {
        let timeline = assemble(&piece()).unwrap();
        let smf = timeline_to_smf(&timeline).unwrap();
        assert_eq!(smf.tracks.len(), 3);
        let melody = &smf.tracks[1];
        // name + program + 3 on + 3 off + end
        assert_eq!(melody.len(), 9);
        let chords = &smf.tracks[2];
        assert_eq!(chords.len(), 13);
    }

    #[test]
    fn note_off_precedes_note_on_at_the_same_tick() {
        let timeline = assemble(&piece()).unwrap();
        let smf = timeline_to_smf(&timeline).unwrap();
        let mut sounding = 0i32;
        for event in &smf.tracks[1] {
            if let TrackEventKind::Midi { message, .. } = &event.kind {
                match message {
                    MidiMessage::NoteOn { .. } => sounding += 1,
                    MidiMessage::NoteOff { .. } => sounding -= 1,
                    _ => {}
                }
                assert!(sounding <= 1, "melody notes overlap");
            }
        }
        assert_eq!(sounding, 0);
    }

    #[test]
    fn bytes_parse_back() {
        let bytes = to_bytes(&piece()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks.len(), 3);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(TICKS_PER_QUARTER)));
    }
}
