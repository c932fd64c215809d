use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::pitch::{is_natural, note_name, Accidental, Clef};
use crate::DomainError;

/// A note the learner is asked to play.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NoteTarget {
    pub midi: u8,
    pub clef: Clef,
    pub accidental: Accidental,
}

impl NoteTarget {
    /// Natural target; rejects black-key pitches and out-of-range numbers.
    pub fn natural(midi: u8, clef: Clef) -> Result<Self, DomainError> {
        if midi > crate::pitch::MAX_MIDI {
            return Err(DomainError::validation(format!(
                "midi note {midi} out of range"
            )));
        }
        if !is_natural(midi) {
            return Err(DomainError::validation(format!(
                "{} is not a natural pitch",
                note_name(midi)
            )));
        }
        Ok(Self {
            midi,
            clef,
            accidental: Accidental::Natural,
        })
    }

    pub fn label(&self) -> String {
        format!("{}{}", note_name(self.midi), self.accidental.symbol())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AttemptOutcome {
    Correct,
    Incorrect,
}

impl AttemptOutcome {
    /// Only the pitch is compared; clef and accidental are descriptive.
    pub fn classify(target: &NoteTarget, played_midi: u8) -> Self {
        if played_midi == target.midi {
            AttemptOutcome::Correct
        } else {
            AttemptOutcome::Incorrect
        }
    }

    pub fn is_correct(self) -> bool {
        matches!(self, AttemptOutcome::Correct)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Attempt {
    pub target: NoteTarget,
    pub played_midi: u8,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub outcome: AttemptOutcome,
}

impl Attempt {
    pub fn new(target: NoteTarget, played_midi: u8, timestamp: OffsetDateTime) -> Self {
        Self {
            target,
            played_midi,
            timestamp,
            outcome: AttemptOutcome::classify(&target, played_midi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_targets_only() {
        assert!(NoteTarget::natural(60, Clef::Treble).is_ok());
        assert!(NoteTarget::natural(61, Clef::Treble).is_err());
        assert!(NoteTarget::natural(200, Clef::Bass).is_err());
    }

    #[test]
    fn outcome_ignores_clef() {
        let target = NoteTarget::natural(60, Clef::Bass).unwrap();
        let attempt = Attempt::new(target, 60, OffsetDateTime::UNIX_EPOCH);
        assert_eq!(attempt.outcome, AttemptOutcome::Correct);
        let miss = Attempt::new(target, 72, OffsetDateTime::UNIX_EPOCH);
        assert_eq!(miss.outcome, AttemptOutcome::Incorrect);
    }

    #[test]
    fn attempt_serializes_timestamp_as_rfc3339() {
        let target = NoteTarget::natural(67, Clef::Treble).unwrap();
        let attempt = Attempt::new(target, 67, OffsetDateTime::UNIX_EPOCH);
        let json = serde_json::to_string(&attempt).unwrap();
        assert!(json.contains("1970-01-01T00:00:00Z"));
        let back: Attempt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attempt);
    }
}
