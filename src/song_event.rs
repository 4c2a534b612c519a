/// One decoded MIDI message, with its delta time already converted to seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    pub time: f64, // seconds since the previous message
    pub channel: u8,
    pub kind: RawKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8, velocity: u8 },
    ProgramChange { program: u8 },
    Other,
}

impl RawMessage {
    pub fn new(time: f64, channel: u8, kind: RawKind) -> Self {
        Self {
            time,
            channel,
            kind,
        }
    }
}

/// Event type codes understood by the player's `SongEvent` struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventType {
    NoteOff = 0,
    NoteOn = 1,
    EndOfSong = 2,
    ProgramChange = 3,
}

impl EventType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEvent {
    pub event_type: EventType,
    pub delay_ms: u32, // since the previous retained event
    pub channel: u8,
    pub note: u8, // pitch, or program number for program changes
    pub velocity: u8,
}

impl OutputEvent {
    pub fn end_of_song() -> Self {
        Self {
            event_type: EventType::EndOfSong,
            delay_ms: 0,
            channel: 0,
            note: 0,
            velocity: 0,
        }
    }

    pub fn is_terminator(&self) -> bool {
        self.event_type == EventType::EndOfSong
    }
}
