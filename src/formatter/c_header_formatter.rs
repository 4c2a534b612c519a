use crate::formatter::EventFormatter;
use crate::song_event::OutputEvent;

/// Writes events as a `SongEvent` array inside a C header, for the OPL player firmware.
pub struct CHeaderFormatter {
    array_name: String,
}

impl CHeaderFormatter {
    pub fn new(array_name: impl Into<String>) -> Self {
        Self {
            array_name: array_name.into(),
        }
    }

    fn guard(&self) -> String {
        format!("{}_H", self.array_name.to_uppercase())
    }
}

impl EventFormatter for CHeaderFormatter {
    fn format(&self, event: &OutputEvent) -> String {
        if event.is_terminator() {
            // the player's struct zero-fills the remaining fields
            return format!(
                "    {{ .type={}, .delay_ms={} }} // End",
                event.event_type.code(),
                event.delay_ms
            );
        }
        format!(
            "    {{ .type={event_type}, .delay_ms={delay}, \
             .channel={channel}, .note={note}, .velocity={velocity} }},",
            event_type = event.event_type.code(),
            delay = event.delay_ms,
            channel = event.channel,
            note = event.note,
            velocity = event.velocity
        )
    }

    fn render(&self, events: &[OutputEvent]) -> String {
        let guard = self.guard();
        let body: Vec<String> = events
            .iter()
            .filter(|e| !e.is_terminator())
            .map(|e| self.format(e))
            .collect();

        let mut out = String::new();
        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        out.push_str("#include \"opl.h\"\n\n");
        out.push_str(&format!("const SongEvent {}[] = {{\n", self.array_name));
        out.push_str(&body.join("\n"));
        out.push('\n');
        out.push_str(&self.format(&OutputEvent::end_of_song()));
        out.push_str("\n};\n\n#endif\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song_event::EventType;

    fn event(
        event_type: EventType,
        delay_ms: u32,
        channel: u8,
        note: u8,
        velocity: u8,
    ) -> OutputEvent {
        OutputEvent {
            event_type,
            delay_ms,
            channel,
            note,
            velocity,
        }
    }

    #[test]
    fn formats_data_line() {
        let formatter = CHeaderFormatter::new("midi_song");
        let line = formatter.format(&event(EventType::NoteOn, 500, 0, 60, 100));
        assert_eq!(
            line,
            "    { .type=1, .delay_ms=500, .channel=0, .note=60, .velocity=100 },"
        );
    }

    #[test]
    fn formats_terminator_without_channel_fields() {
        let line = CHeaderFormatter::new("midi_song").format(&OutputEvent::end_of_song());
        assert_eq!(line, "    { .type=2, .delay_ms=0 } // End");
    }

    #[test]
    fn renders_whole_header() {
        let events = vec![
            event(EventType::ProgramChange, 0, 1, 62, 0),
            event(EventType::NoteOff, 250, 1, 60, 0),
            OutputEvent::end_of_song(),
        ];
        let expected = "#ifndef MIDI_SONG_H\n\
                        #define MIDI_SONG_H\n\
                        \n\
                        #include \"opl.h\"\n\
                        \n\
                        const SongEvent midi_song[] = {\n    \
                        { .type=3, .delay_ms=0, .channel=1, .note=62, .velocity=0 },\n    \
                        { .type=0, .delay_ms=250, .channel=1, .note=60, .velocity=0 },\n    \
                        { .type=2, .delay_ms=0 } // End\n\
                        };\n\
                        \n\
                        #endif\n";
        assert_eq!(CHeaderFormatter::new("midi_song").render(&events), expected);
    }

    #[test]
    fn empty_song_leaves_blank_line_before_terminator() {
        let rendered = CHeaderFormatter::new("midi_song").render(&[OutputEvent::end_of_song()]);
        let body = "const SongEvent midi_song[] = {\n\n    { .type=2, .delay_ms=0 } // End\n};";
        assert!(rendered.contains(body));
    }

    #[test]
    fn guard_uses_uppercased_array_name() {
        let rendered = CHeaderFormatter::new("level1Theme").render(&[]);
        assert!(rendered.starts_with("#ifndef LEVEL1THEME_H\n#define LEVEL1THEME_H\n"));
        assert!(rendered.contains("const SongEvent level1Theme[] = {"));
    }
}
