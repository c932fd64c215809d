pub mod attempt;
pub mod error;
pub mod io;
pub mod pitch;

pub use crate::attempt::{Attempt, AttemptOutcome, NoteTarget};
pub use crate::error::DomainError;
pub use crate::io::{decode_json, encode_json};
pub use crate::pitch::{is_natural, note_name, Accidental, Clef, ClefMode, KeyboardRange};
