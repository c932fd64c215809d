use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use notewise_domain::{Attempt, AttemptOutcome, ClefMode, KeyboardRange, NoteTarget};

use crate::generator::NoteGenerator;
use crate::TutorError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Number of targets in the session.
    pub length: usize,
    pub clef_mode: ClefMode,
    /// Calibrated keyboard range, `None` when uncalibrated.
    pub range: Option<KeyboardRange>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            length: 10,
            clef_mode: ClefMode::Treble,
            range: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), TutorError> {
        if self.length == 0 {
            return Err(TutorError::configuration(
                "session length must be at least one note",
            ));
        }
        Ok(())
    }
}

/// What happened to a single played note.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayResult {
    /// `None` when the session was already complete and the note was dropped.
    pub outcome: Option<AttemptOutcome>,
    pub is_complete: bool,
}

/// A drill over a fixed list of targets.
///
/// Targets are generated up front. Each played note is appended to the attempt
/// log against the current target; only a correct note moves on to the next
/// one. Once every target is answered the session ignores further input.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    id: String,
    started_at: OffsetDateTime,
    targets: Vec<NoteTarget>,
    attempts: Vec<Attempt>,
    current_index: usize,
}

impl PracticeSession {
    #[instrument(skip(rng))]
    pub fn generate<R: Rng>(config: &SessionConfig, rng: &mut R) -> Result<Self, TutorError> {
        config.validate()?;
        let mut generator = NoteGenerator::new(rng, config.clef_mode, config.range);
        let targets = generator.targets(config.length)?;
        Self::from_targets(targets)
    }

    pub fn from_targets(targets: Vec<NoteTarget>) -> Result<Self, TutorError> {
        if targets.is_empty() {
            return Err(TutorError::configuration(
                "session length must be at least one note",
            ));
        }
        let started_at = OffsetDateTime::now_utc();
        let session = Self {
            id: format!("session-{}", started_at.unix_timestamp_nanos()),
            started_at,
            targets,
            attempts: Vec::new(),
            current_index: 0,
        };
        info!(id = %session.id, length = session.targets.len(), "practice session created");
        Ok(session)
    }

    /// Replaces every target, e.g. after the keyboard was recalibrated.
    /// Only allowed before the first note is played.
    pub fn regenerate<R: Rng>(
        &mut self,
        clef_mode: ClefMode,
        range: Option<KeyboardRange>,
        rng: &mut R,
    ) -> Result<(), TutorError> {
        if !self.attempts.is_empty() {
            return Err(TutorError::SessionStarted);
        }
        let mut generator = NoteGenerator::new(rng, clef_mode, range);
        self.targets = generator.targets(self.targets.len())?;
        info!(id = %self.id, ?range, "targets regenerated");
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn targets(&self) -> &[NoteTarget] {
        &self.targets
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_target(&self) -> Option<&NoteTarget> {
        self.targets.get(self.current_index)
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn is_complete(&self) -> bool {
        self.current_index == self.targets.len()
    }

    /// Fraction of targets answered correctly so far.
    pub fn progress(&self) -> f32 {
        self.current_index as f32 / self.targets.len() as f32
    }

    pub fn record_played_note(&mut self, played_midi: u8) -> PlayResult {
        self.record_played_note_at(played_midi, OffsetDateTime::now_utc())
    }

    /// Timestamps never go backwards in the log; an earlier `timestamp` is
    /// clamped to the previous attempt's.
    pub fn record_played_note_at(
        &mut self,
        played_midi: u8,
        timestamp: OffsetDateTime,
    ) -> PlayResult {
        let Some(target) = self.current_target().copied() else {
            debug!(id = %self.id, played_midi, "session complete, ignoring note");
            return PlayResult {
                outcome: None,
                is_complete: true,
            };
        };
        let timestamp = match self.attempts.last() {
            Some(last) if last.timestamp > timestamp => last.timestamp,
            _ => timestamp,
        };
        let attempt = Attempt::new(target, played_midi, timestamp);
        let outcome = attempt.outcome;
        self.attempts.push(attempt);
        if outcome.is_correct() {
            self.current_index += 1;
        }
        debug!(
            id = %self.id,
            target = target.midi,
            played_midi,
            ?outcome,
            index = self.current_index,
            "attempt recorded"
        );
        if self.is_complete() {
            info!(id = %self.id, attempts = self.attempts.len(), "practice session complete");
        }
        PlayResult {
            outcome: Some(outcome),
            is_complete: self.is_complete(),
        }
    }

    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            id: self.id.clone(),
            started_at: self.started_at,
            completed: self.is_complete(),
            targets: self.targets.clone(),
            attempts: self.attempts.clone(),
        }
    }
}

/// Stored form of a session, consumed by the analytics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    pub completed: bool,
    pub targets: Vec<NoteTarget>,
    pub attempts: Vec<Attempt>,
}

impl SessionRecord {
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }
}
