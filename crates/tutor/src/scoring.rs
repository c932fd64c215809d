use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use notewise_domain::{Accidental, Attempt, AttemptOutcome, Clef, NoteTarget};

use crate::session::{PracticeSession, SessionRecord};

/// Identity attempts are grouped under: the target's pitch, clef and accidental.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteKey {
    pub midi: u8,
    pub clef: Clef,
    pub accidental: Accidental,
}

impl NoteKey {
    pub fn of(attempt: &Attempt) -> Self {
        Self::from(&attempt.target)
    }
}

impl From<&NoteTarget> for NoteKey {
    fn from(target: &NoteTarget) -> Self {
        Self {
            midi: target.midi,
            clef: target.clef,
            accidental: target.accidental,
        }
    }
}

/// Anything that carries an append-only attempt log.
pub trait AttemptLog {
    fn attempts(&self) -> &[Attempt];
}

impl AttemptLog for PracticeSession {
    fn attempts(&self) -> &[Attempt] {
        PracticeSession::attempts(self)
    }
}

impl AttemptLog for SessionRecord {
    fn attempts(&self) -> &[Attempt] {
        SessionRecord::attempts(self)
    }
}

impl AttemptLog for [Attempt] {
    fn attempts(&self) -> &[Attempt] {
        self
    }
}

impl AttemptLog for Vec<Attempt> {
    fn attempts(&self) -> &[Attempt] {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeyHistory {
    pub first_outcome: AttemptOutcome,
    pub ever_correct: bool,
}

/// Per-key history of one log: the earliest attempt's outcome (log order breaks
/// timestamp ties) and whether any attempt was correct.
pub(crate) fn key_histories(attempts: &[Attempt]) -> BTreeMap<NoteKey, KeyHistory> {
    let mut earliest: BTreeMap<NoteKey, (&Attempt, bool)> = BTreeMap::new();
    for attempt in attempts {
        let correct = attempt.outcome.is_correct();
        earliest
            .entry(NoteKey::of(attempt))
            .and_modify(|(first, ever_correct)| {
                if attempt.timestamp < first.timestamp {
                    *first = attempt;
                }
                *ever_correct |= correct;
            })
            .or_insert((attempt, correct));
    }
    earliest
        .into_iter()
        .map(|(key, (first, ever_correct))| {
            (
                key,
                KeyHistory {
                    first_outcome: first.outcome,
                    ever_correct,
                },
            )
        })
        .collect()
}

/// Keys whose earliest attempt was correct.
pub fn first_try_correct_count<L: AttemptLog + ?Sized>(log: &L) -> usize {
    key_histories(log.attempts())
        .values()
        .filter(|history| history.first_outcome.is_correct())
        .count()
}

/// Keys whose earliest attempt was incorrect.
///
/// This does not tell "needed a retry, then got it" apart from "never got it":
/// both count. Use [`unresolved_count`] to isolate the second case.
pub fn multiple_attempts_count<L: AttemptLog + ?Sized>(log: &L) -> usize {
    key_histories(log.attempts())
        .values()
        .filter(|history| !history.first_outcome.is_correct())
        .count()
}

/// Keys with no correct attempt at all.
pub fn unresolved_count<L: AttemptLog + ?Sized>(log: &L) -> usize {
    key_histories(log.attempts())
        .values()
        .filter(|history| !history.ever_correct)
        .count()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    pub first_try_correct: usize,
    pub multiple_attempts: usize,
    pub unresolved: usize,
    pub total_attempts: usize,
    /// Correct attempts over all attempts.
    pub accuracy: f32,
}

impl SessionSummary {
    pub fn empty() -> Self {
        Self {
            first_try_correct: 0,
            multiple_attempts: 0,
            unresolved: 0,
            total_attempts: 0,
            accuracy: 0.0,
        }
    }

    pub fn from_log<L: AttemptLog + ?Sized>(log: &L) -> Self {
        let attempts = log.attempts();
        if attempts.is_empty() {
            return Self::empty();
        }
        let histories = key_histories(attempts);
        let first_try_correct = histories
            .values()
            .filter(|h| h.first_outcome.is_correct())
            .count();
        let correct = attempts.iter().filter(|a| a.outcome.is_correct()).count();
        Self {
            first_try_correct,
            multiple_attempts: histories.len() - first_try_correct,
            unresolved: histories.values().filter(|h| !h.ever_correct).count(),
            total_attempts: attempts.len(),
            accuracy: correct as f32 / attempts.len() as f32,
        }
    }
}
