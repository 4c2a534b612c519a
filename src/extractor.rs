use std::path::{Path, PathBuf};

use log::{debug, trace};
use midi_file::core::{Message, NoteMessage};
use midi_file::file::{Division, Event, Format, MetaEvent, TrackEvent};
use midi_file::MidiFile;

use crate::error::FileError;
use crate::song_event::{RawKind, RawMessage};

// microseconds per quarter note until the first tempo event (120 bpm)
const DEFAULT_TEMPO: u32 = 500_000;

/// Flattens every track of a MIDI file into a single time-ordered stream of
/// [`RawMessage`]s whose delta times are in seconds.
pub struct Extractor {
    midi_file: MidiFile,
    pulses_per_qn: u16,
}

/// What the converter needs to know about a track event, detached from `midi_file`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Payload {
    Channel { channel: u8, kind: RawKind },
    Tempo(u32),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TickEvent {
    ticks: u32, // absolute
    payload: Payload,
}

impl Extractor {
    pub fn load(path: &Path) -> Result<Self, FileError> {
        let midi_file = MidiFile::load(path).map_err(|source| FileError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(midi_file, path)
    }

    pub fn new(midi_file: MidiFile, path: &Path) -> Result<Self, FileError> {
        // format 2 tracks are independent sequences and can't share one timeline
        if let Format::Sequential = midi_file.header().format() {
            return Err(FileError::UnsupportedFormat {
                path: PathBuf::from(path),
            });
        }

        let pulses_per_qn = match midi_file.header().division() {
            Division::QuarterNote(qtr) => qtr.get(),
            Division::Smpte(_) => {
                return Err(FileError::UnsupportedDivision {
                    path: PathBuf::from(path),
                })
            }
        };
        debug!("quarter note division: {}", pulses_per_qn);

        Ok(Self {
            midi_file,
            pulses_per_qn,
        })
    }

    pub fn run(&self) -> Vec<RawMessage> {
        let tracks: Vec<Vec<(u32, Payload)>> = self
            .midi_file
            .tracks()
            .map(|t| t.events().map(|e| (e.delta_time(), payload(e))).collect())
            .collect();
        debug!("merging {} tracks", tracks.len());

        timeline(merge_tracks(tracks), self.pulses_per_qn)
    }
}

fn payload(track_event: &TrackEvent) -> Payload {
    match track_event.event() {
        Event::Midi(Message::NoteOn(note)) => note_payload(note, true),
        Event::Midi(Message::NoteOff(note)) => note_payload(note, false),
        Event::Midi(Message::ProgramChange(pc)) => Payload::Channel {
            channel: pc.channel().get(), // midi_file is 0-based
            kind: RawKind::ProgramChange {
                program: pc.program().get(),
            },
        },
        Event::Meta(MetaEvent::SetTempo(tempo)) => Payload::Tempo(tempo.get()),
        _ => Payload::Other,
    }
}

fn note_payload(note: &NoteMessage, on: bool) -> Payload {
    let (note_number, velocity) = (note.note_number().get(), note.velocity().get());
    let kind = if on {
        RawKind::NoteOn {
            note: note_number,
            velocity,
        }
    } else {
        RawKind::NoteOff {
            note: note_number,
            velocity,
        }
    };
    Payload::Channel {
        channel: note.channel().get(),
        kind,
    }
}

/// Puts the events of all tracks on one absolute tick axis. Events sharing a tick
/// keep track order, then their order within the track.
fn merge_tracks(tracks: Vec<Vec<(u32, Payload)>>) -> Vec<TickEvent> {
    let mut merged = Vec::new();
    for track in tracks {
        let mut ticks: u32 = 0;
        for (delta, payload) in track {
            ticks = ticks.saturating_add(delta);
            merged.push(TickEvent { ticks, payload });
        }
    }
    // sort_by_key is stable
    merged.sort_by_key(|e| e.ticks);
    merged
}

/// Converts tick positions to per-message delta seconds, following tempo changes.
fn timeline(events: Vec<TickEvent>, pulses_per_qn: u16) -> Vec<RawMessage> {
    let mut tempo = DEFAULT_TEMPO;
    let mut last_ticks: u32 = 0;
    let mut messages = Vec::with_capacity(events.len());

    for event in events {
        let time = ticks_to_seconds(event.ticks - last_ticks, pulses_per_qn, tempo);
        last_ticks = event.ticks;

        let message = match event.payload {
            Payload::Channel { channel, kind } => RawMessage::new(time, channel, kind),
            Payload::Tempo(new_tempo) => {
                debug!(
                    "tempo change at tick {}: {:.2} bpm",
                    event.ticks,
                    60_000_000.0 / new_tempo as f64
                );
                tempo = new_tempo;
                RawMessage::new(time, 0, RawKind::Other)
            }
            Payload::Other => RawMessage::new(time, 0, RawKind::Other),
        };
        trace!("{:?}", message);
        messages.push(message);
    }

    messages
}

fn ticks_to_seconds(ticks: u32, pulses_per_qn: u16, tempo: u32) -> f64 {
    // MIDI tempo is in microseconds per quarter note
    let scale = tempo as f64 * 1e-6 / pulses_per_qn as f64;
    ticks as f64 * scale
}
