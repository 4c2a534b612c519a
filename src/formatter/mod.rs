use crate::song_event::OutputEvent;

mod c_header_formatter;

pub use c_header_formatter::CHeaderFormatter;

pub trait EventFormatter {
    /// Formats a single event as one line of output.
    fn format(&self, event: &OutputEvent) -> String;

    /// Formats a complete song, terminator included.
    fn render(&self, events: &[OutputEvent]) -> String;
}
