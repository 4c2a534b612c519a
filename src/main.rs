use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

mod converter;
mod error;
mod extractor;
mod formatter;
mod instrument_map;
mod song_event;

use instrument_map::ProgramMap;

#[derive(Parser, Debug)]
#[command(version, about = "Convert a MIDI file into an OPL SongEvent table")]
struct Args {
    /// MIDI file to convert
    input: PathBuf,

    #[arg(long, help = "Translate MT-32 program numbers to General MIDI")]
    mt32: bool,

    #[arg(short, long, default_value = "song_data.h")]
    output: PathBuf,

    #[arg(
        short,
        long,
        default_value = "midi_song",
        help = "Name of the generated array, also used for the include guard"
    )]
    array_name: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version are not failures
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    let program_map = ProgramMap::from_mt32_flag(args.mt32);
    converter::convert(&args.input, &args.output, &args.array_name, program_map)
        .with_context(|| format!("convert {}", args.input.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mt32_flag_can_come_first() {
        let args = Args::try_parse_from(["midi2opl", "--mt32", "doom.mid"]).unwrap();
        assert!(args.mt32);
        assert_eq!(args.input, PathBuf::from("doom.mid"));
    }

    #[test]
    fn defaults_match_player_build() {
        let args = Args::try_parse_from(["midi2opl", "doom.mid"]).unwrap();
        assert!(!args.mt32);
        assert_eq!(args.output, PathBuf::from("song_data.h"));
        assert_eq!(args.array_name, "midi_song");
    }

    #[test]
    fn input_is_required() {
        assert!(Args::try_parse_from(["midi2opl", "--mt32"]).is_err());
    }
}
