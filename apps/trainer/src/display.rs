//! Terminal rendering of the staff and results.

use notewise_domain::{note_name, NoteTarget};
use notewise_notation::layout::STAFF_HALF_HEIGHT;
use notewise_notation::{ledger_steps, staff_step};
use notewise_tutor::{NotePerformance, SessionSummary};

const WIDTH: usize = 21;
const NOTE_COLUMN: usize = WIDTH / 2;

/// Draws the staff from the top line down with the target's note head.
/// Rows alternate between lines and spaces, one row per staff step.
pub fn render_staff(target: &NoteTarget) -> String {
    let step = staff_step(target.midi, target.clef);
    let ledgers = ledger_steps(step);
    let top = step.max(STAFF_HALF_HEIGHT + 1);
    let bottom = step.min(-STAFF_HALF_HEIGHT - 1);

    let mut out = format!("{} clef\n", target.clef);
    for row_step in (bottom..=top).rev() {
        let mut row = vec![' '; WIDTH];
        if row_step % 2 == 0 && row_step.abs() <= STAFF_HALF_HEIGHT {
            row.iter_mut().for_each(|c| *c = '-');
        } else if ledgers.contains(&row_step) {
            row[NOTE_COLUMN - 2..=NOTE_COLUMN + 2]
                .iter_mut()
                .for_each(|c| *c = '-');
        }
        if row_step == step {
            row[NOTE_COLUMN] = 'O';
        }
        out.extend(row.iter());
        out.push('\n');
    }
    out
}

pub fn render_summary(summary: &SessionSummary) -> String {
    format!(
        "first try: {}  needed retries: {}  never found: {}  attempts: {}  accuracy: {:.0}%",
        summary.first_try_correct,
        summary.multiple_attempts,
        summary.unresolved,
        summary.total_attempts,
        summary.accuracy * 100.0
    )
}

pub fn render_ranking(ranking: &[NotePerformance]) -> String {
    if ranking.is_empty() {
        return "no practice history yet\n".to_string();
    }
    ranking
        .iter()
        .map(|p| {
            format!(
                "{:<5} {:<7} {:>3}/{:<3} {:>4.0}%\n",
                note_name(p.key.midi),
                p.key.clef.name(),
                p.correct_count,
                p.total_count,
                p.accuracy * 100.0
            )
        })
        .collect()
}
