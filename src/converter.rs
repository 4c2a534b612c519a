use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::{debug, trace};
use tempfile::{Builder, NamedTempFile};

use crate::error::FileError;
use crate::extractor::Extractor;
use crate::formatter::{CHeaderFormatter, EventFormatter};
use crate::instrument_map::ProgramMap;
use crate::song_event::{EventType, OutputEvent, RawKind, RawMessage};

/// Highest channel the player has voices for. Channel 9 is percussion.
const MAX_CHANNEL: u8 = 9;
const DRUM_CHANNEL: u8 = 9;

pub struct Converter {
    program_map: ProgramMap,
}

impl Converter {
    pub fn new(program_map: ProgramMap) -> Self {
        Self { program_map }
    }

    /// Turns a decoded message stream into song events, ending with the terminator.
    ///
    /// Time of every dropped message is carried into the delay of the next kept event.
    pub fn convert_messages(&self, messages: &[RawMessage]) -> Vec<OutputEvent> {
        let mut events = Vec::new();
        let mut pending_time = 0.0;

        for msg in messages {
            pending_time += msg.time;

            if let Some((event_type, note, velocity)) = self.classify(msg) {
                events.push(OutputEvent {
                    event_type,
                    delay_ms: (pending_time * 1000.0) as u32,
                    channel: msg.channel,
                    note,
                    velocity,
                });
                pending_time = 0.0;
            }
        }

        events.push(OutputEvent::end_of_song());
        events
    }

    fn classify(&self, msg: &RawMessage) -> Option<(EventType, u8, u8)> {
        if msg.kind == RawKind::Other {
            return None;
        }
        if msg.channel > MAX_CHANNEL {
            trace!("dropping {:?}: channel out of range", msg);
            return None;
        }

        match msg.kind {
            RawKind::ProgramChange { .. } if msg.channel == DRUM_CHANNEL => {
                trace!("dropping program change on drum channel");
                None
            }
            RawKind::ProgramChange { program } => Some((
                EventType::ProgramChange,
                self.program_map.resolve(program),
                0,
            )),
            RawKind::NoteOn { note, velocity } if velocity > 0 => {
                Some((EventType::NoteOn, note, velocity))
            }
            // a zero-velocity note on is a note off
            RawKind::NoteOn { note, .. } | RawKind::NoteOff { note, .. } => {
                Some((EventType::NoteOff, note, 0))
            }
            RawKind::Other => None,
        }
    }
}

/// Converts the MIDI file at `input` into a C header at `output` declaring `array_name`.
///
/// Returns the number of events written, not counting the terminator.
pub fn convert(
    input: &Path,
    output: &Path,
    array_name: &str,
    program_map: ProgramMap,
) -> Result<usize, FileError> {
    println!(
        "Parsing {} (MT-32 Mode: {})...",
        input.display(),
        program_map.is_mt32()
    );

    let messages = Extractor::load(input)?.run();
    debug!("decoded {} messages", messages.len());

    let events = Converter::new(program_map).convert_messages(&messages);
    let rendered = CHeaderFormatter::new(array_name).render(&events);
    write_atomically(output, rendered.as_bytes())?;

    let count = events.len() - 1;
    println!("Done! Saved {} events.", count);
    Ok(count)
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), FileError> {
    let output_error = |source| FileError::Output {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = temp_file_in(dir).map_err(output_error)?;
    // an overwritten header keeps its mode
    if let Ok(existing) = fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .map_err(output_error)?;
    }
    file.write_all(contents).map_err(output_error)?;
    file.persist(path).map_err(|e| output_error(e.error))?;
    Ok(())
}

/// Creates the staging file with the usual 0666-minus-umask mode instead of 0600.
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}
