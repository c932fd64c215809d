use rand::rngs::StdRng;
use rand::SeedableRng;
use time::{Duration, OffsetDateTime};

use notewise_domain::{AttemptOutcome, Clef, ClefMode, KeyboardRange, NoteTarget};
use notewise_tutor::{
    cross_session_note_performance, first_try_correct_count, multiple_attempts_count,
    MemoryStore, PracticeSession, SessionConfig, SessionStore, SessionSummary,
};

fn play_perfectly(session: &mut PracticeSession) {
    while let Some(target) = session.current_target().copied() {
        session.record_played_note(target.midi);
    }
}

#[test]
fn calibrated_session_round_trips_through_store() {
    let config = SessionConfig {
        length: 8,
        clef_mode: ClefMode::Random,
        range: Some(KeyboardRange::new(48, 72).unwrap()),
    };
    let mut rng = StdRng::seed_from_u64(2024);
    let mut session = PracticeSession::generate(&config, &mut rng).unwrap();
    for target in session.targets() {
        assert!((48..=72).contains(&target.midi));
    }

    play_perfectly(&mut session);
    assert!(session.is_complete());

    let mut store = MemoryStore::new();
    store.save(&session.to_record()).unwrap();
    let history = store.load_all().unwrap();
    assert_eq!(history.len(), 1);
    let ranking = cross_session_note_performance(&history);
    assert!(ranking.iter().all(|p| p.accuracy == 1.0));
}

#[test]
fn retries_show_up_in_history() {
    let start = OffsetDateTime::UNIX_EPOCH;
    let targets = vec![
        NoteTarget::natural(43, Clef::Bass).unwrap(),
        NoteTarget::natural(57, Clef::Bass).unwrap(),
    ];

    let mut first = PracticeSession::from_targets(targets.clone()).unwrap();
    first.record_played_note_at(45, start);
    first.record_played_note_at(41, start + Duration::seconds(1));
    assert_eq!(first.current_index(), 0);
    let hit = first.record_played_note_at(43, start + Duration::seconds(2));
    assert_eq!(hit.outcome, Some(AttemptOutcome::Correct));
    assert_eq!(first.current_index(), 1);
    first.record_played_note_at(57, start + Duration::seconds(3));
    assert!(first.is_complete());

    assert_eq!(first_try_correct_count(&first), 1);
    assert_eq!(multiple_attempts_count(&first), 1);
    let summary = SessionSummary::from_log(&first);
    assert_eq!(summary.total_attempts, 4);

    let mut second = PracticeSession::from_targets(targets).unwrap();
    second.record_played_note_at(43, start + Duration::hours(1));
    second.record_played_note_at(59, start + Duration::hours(1) + Duration::seconds(1));
    second.record_played_note_at(57, start + Duration::hours(1) + Duration::seconds(2));

    let history = vec![first.to_record(), second.to_record()];
    let ranking = cross_session_note_performance(&history);
    let summary: Vec<(u8, f32)> = ranking.iter().map(|p| (p.key.midi, p.accuracy)).collect();
    assert_eq!(summary, vec![(43, 0.5), (57, 0.5)]);
}
