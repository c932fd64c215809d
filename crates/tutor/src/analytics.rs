use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scoring::{key_histories, AttemptLog, NoteKey};

/// How reliably one note has been read across sessions. Always derived from
/// attempt logs, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotePerformance {
    pub key: NoteKey,
    /// Sessions in which the first attempt at this note was correct.
    pub correct_count: usize,
    /// Sessions in which this note was attempted.
    pub total_count: usize,
    pub accuracy: f32,
}

/// Ranks every note seen in `sessions`, worst first.
///
/// Each session contributes one occurrence per note it attempted, counted as
/// correct when the note's earliest attempt in that session was correct.
/// Equal accuracies are ordered by key (pitch, then clef, then accidental).
pub fn cross_session_note_performance<L: AttemptLog>(sessions: &[L]) -> Vec<NotePerformance> {
    let mut tallies: BTreeMap<NoteKey, (usize, usize)> = BTreeMap::new();
    for session in sessions {
        for (key, history) in key_histories(session.attempts()) {
            let (correct, total) = tallies.entry(key).or_insert((0, 0));
            *total += 1;
            if history.first_outcome.is_correct() {
                *correct += 1;
            }
        }
    }

    let mut performance: Vec<NotePerformance> = tallies
        .into_iter()
        .map(|(key, (correct_count, total_count))| NotePerformance {
            key,
            correct_count,
            total_count,
            accuracy: correct_count as f32 / total_count as f32,
        })
        .collect();
    performance.sort_by(|a, b| {
        a.accuracy
            .partial_cmp(&b.accuracy)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    performance
}

/// The `limit` notes with the lowest first-try accuracy.
pub fn weakest_notes<L: AttemptLog>(sessions: &[L], limit: usize) -> Vec<NotePerformance> {
    let mut ranked = cross_session_note_performance(sessions);
    ranked.truncate(limit);
    ranked
}
