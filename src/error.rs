use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reading the input MIDI file or writing the generated header.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("unable to load MIDI file {}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: midi_file::Error,
    },

    #[error("{}: asynchronous (format 2) MIDI files are not supported", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("{}: SMPTE time division is not supported", path.display())]
    UnsupportedDivision { path: PathBuf },

    #[error("unable to write {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
