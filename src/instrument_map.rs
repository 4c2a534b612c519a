//! Program (instrument) number remapping for program change events.
//!
//! Songs authored for the Roland MT-32 use its own preset numbering, which has to be
//! translated before a General MIDI patch bank can play them. Both tables are static.

/// MT-32 preset -> General MIDI program, indexed by MT-32 preset number.
/// Presets past the end of the table have no clean GM equivalent and pass through.
const MT32_TO_GM: [u8; 80] = [
    // pianos
    0, 1, 3, 4, 5, 6, 7, 2, //
    // organs
    16, 17, 18, 19, 20, 21, 22, 23, //
    // keyboards / synths
    62, 63, 38, 39, 80, 81, 54, 55, //
    // bass
    32, 33, 34, 35, 36, 37, 38, 39, //
    // winds / brass
    56, 57, 58, 59, 60, 61, 62, 63, //
    64, 65, 66, 67, 68, 69, 70, 71, //
    72, 73, 74, 75, 76, 77, 78, 79, //
    // strings
    40, 41, 42, 43, 44, 45, 46, 47, //
    // guitars
    24, 25, 26, 27, 28, 29, 30, 31, //
    // effects / ethnic
    104, 105, 106, 107, 108, 109, 110, 111,
];

/// Per-program overrides applied after any MT-32 translation, for GM patches that
/// sound weak on the OPL bank.
const GM_FIX_MAP: &[(u8, u8)] = &[
    (30, 30), // distortion guitar
    (34, 34), // picked bass
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramMap {
    #[default]
    GeneralMidi,
    Mt32,
}

impl ProgramMap {
    pub fn from_mt32_flag(use_mt32_map: bool) -> Self {
        if use_mt32_map {
            ProgramMap::Mt32
        } else {
            ProgramMap::GeneralMidi
        }
    }

    pub fn is_mt32(self) -> bool {
        self == ProgramMap::Mt32
    }

    /// Resolves the program number to emit for a program change to `original`.
    pub fn resolve(self, original: u8) -> u8 {
        let program = match self {
            ProgramMap::Mt32 => mt32_to_gm(original),
            ProgramMap::GeneralMidi => original,
        };
        gm_fix(program)
    }
}

fn mt32_to_gm(program: u8) -> u8 {
    MT32_TO_GM
        .get(program as usize)
        .copied()
        .unwrap_or(program)
}

fn gm_fix(program: u8) -> u8 {
    GM_FIX_MAP
        .iter()
        .find(|(from, _)| *from == program)
        .map(|(_, to)| *to)
        .unwrap_or(program)
}
