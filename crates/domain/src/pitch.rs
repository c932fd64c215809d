use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Highest valid MIDI note number.
pub const MAX_MIDI: u8 = 127;

const NATURAL_PITCH_CLASSES: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// True for white-key pitch classes (C D E F G A B).
pub fn is_natural(midi: u8) -> bool {
    NATURAL_PITCH_CLASSES.contains(&(midi % 12))
}

/// Scientific pitch name with sharps, e.g. 60 -> "C4", 61 -> "C#4".
pub fn note_name(midi: u8) -> String {
    let octave = i32::from(midi / 12) - 1;
    format!("{}{}", SHARP_NAMES[usize::from(midi % 12)], octave)
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Clef {
    Treble,
    Bass,
}

impl Clef {
    /// Pitch sitting on the clef's middle staff line (B4 for treble, D3 for bass).
    pub fn middle_line_midi(self) -> u8 {
        match self {
            Clef::Treble => 71,
            Clef::Bass => 50,
        }
    }

    /// Range targets are drawn from when no calibration narrows it.
    pub fn canonical_range(self) -> KeyboardRange {
        match self {
            Clef::Treble => KeyboardRange { min: 60, max: 108 },
            Clef::Bass => KeyboardRange { min: 21, max: 60 },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Clef::Treble => "treble",
            Clef::Bass => "bass",
        }
    }
}

impl fmt::Display for Clef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum ClefMode {
    #[default]
    Treble,
    Bass,
    Random,
}

#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    /// Glyph shown next to the note head; empty for naturals.
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "♯",
            Accidental::Flat => "♭",
        }
    }
}

/// Inclusive MIDI range, typically supplied by keyboard calibration.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "RawRange")]
pub struct KeyboardRange {
    min: u8,
    max: u8,
}

#[derive(Deserialize)]
struct RawRange {
    min: u8,
    max: u8,
}

impl TryFrom<RawRange> for KeyboardRange {
    type Error = DomainError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        KeyboardRange::new(raw.min, raw.max)
    }
}

impl KeyboardRange {
    pub fn new(min: u8, max: u8) -> Result<Self, DomainError> {
        if max > MAX_MIDI {
            return Err(DomainError::validation(format!(
                "range upper bound {max} exceeds MIDI maximum {MAX_MIDI}"
            )));
        }
        if min > max {
            return Err(DomainError::validation(format!(
                "range lower bound {min} is above upper bound {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn contains(&self, midi: u8) -> bool {
        (self.min..=self.max).contains(&midi)
    }

    /// Overlap of two ranges, `None` when they are disjoint.
    pub fn intersect(&self, other: &KeyboardRange) -> Option<KeyboardRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(KeyboardRange { min, max })
    }

    /// Natural pitches inside the range, ascending.
    pub fn naturals(&self) -> impl Iterator<Item = u8> {
        (self.min..=self.max).filter(|midi| is_natural(*midi))
    }
}

impl fmt::Display for KeyboardRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", note_name(self.min), note_name(self.max))
    }
}
