pub mod analytics;
pub mod error;
pub mod generator;
pub mod midi;
pub mod scoring;
pub mod session;
pub mod store;

pub use analytics::{cross_session_note_performance, weakest_notes, NotePerformance};
pub use error::TutorError;
pub use generator::{choose_clef, effective_range, random_note, NoteGenerator};
pub use midi::{decode_note_on, MidiDevice, MidiManager, NoteStream};
pub use scoring::{
    first_try_correct_count, multiple_attempts_count, unresolved_count, AttemptLog, NoteKey,
    SessionSummary,
};
pub use session::{PlayResult, PracticeSession, SessionConfig, SessionRecord};
pub use store::{JsonFileStore, MemoryStore, SessionStore};
