//! Pitch to staff geometry.
//!
//! Everything here is a pure function of `(midi, clef, geometry)`, so a live
//! view and a results thumbnail drawn from the same inputs land on the same
//! pixels.

use serde::{Deserialize, Serialize};

use notewise_domain::Clef;

/// Letter position (C=0 .. B=6) for each pitch class. Black keys are spelled
/// as the sharp of the natural below them.
const LETTER_OF_PITCH_CLASS: [i32; 12] = [0, 0, 1, 1, 2, 3, 3, 4, 4, 5, 5, 6];

/// Steps from the middle line to the outer staff lines.
pub const STAFF_HALF_HEIGHT: i32 = 4;

/// Monotonic index over natural pitches: one per letter name, seven per octave.
pub fn diatonic_index(midi: u8) -> i32 {
    let octave = i32::from(midi / 12);
    octave * 7 + LETTER_OF_PITCH_CLASS[usize::from(midi % 12)]
}

/// Signed distance in half line spacings from the clef's middle line.
/// Positive is above the middle line.
pub fn staff_step(midi: u8, clef: Clef) -> i32 {
    diatonic_index(midi) - diatonic_index(clef.middle_line_midi())
}

/// Steps that need a ledger line for a note at `step`.
///
/// Lines only sit on even steps. A note in a space beyond the staff gets lines
/// up to the enclosing even step, never one through its own position.
pub fn ledger_steps(step: i32) -> Vec<i32> {
    if step.abs() <= STAFF_HALF_HEIGHT {
        return Vec::new();
    }
    let first = STAFF_HALF_HEIGHT + 2;
    let last = step.abs() - step.abs() % 2;
    (first..=last)
        .step_by(2)
        .map(|magnitude| magnitude * step.signum())
        .collect()
}

/// Vertical layout parameters for a treble and a bass staff.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct StaffGeometry {
    pub treble_middle_y: f32,
    pub bass_middle_y: f32,
    /// Distance between two adjacent staff lines.
    pub line_spacing: f32,
}

impl Default for StaffGeometry {
    fn default() -> Self {
        Self {
            treble_middle_y: 80.0,
            bass_middle_y: 80.0,
            line_spacing: 12.0,
        }
    }
}

impl StaffGeometry {
    /// Geometry for a staff whose middle line sits at `middle_y`, for both clefs.
    pub fn centered(middle_y: f32, line_spacing: f32) -> Self {
        Self {
            treble_middle_y: middle_y,
            bass_middle_y: middle_y,
            line_spacing,
        }
    }

    pub fn half_line_spacing(&self) -> f32 {
        self.line_spacing / 2.0
    }

    pub fn middle_line_y(&self, clef: Clef) -> f32 {
        match clef {
            Clef::Treble => self.treble_middle_y,
            Clef::Bass => self.bass_middle_y,
        }
    }

    pub fn step_y(&self, step: i32, clef: Clef) -> f32 {
        self.middle_line_y(clef) - step as f32 * self.half_line_spacing()
    }

    pub fn y(&self, midi: u8, clef: Clef) -> f32 {
        self.step_y(staff_step(midi, clef), clef)
    }

    pub fn position(&self, midi: u8, clef: Clef) -> StaffPosition {
        let step = staff_step(midi, clef);
        StaffPosition {
            step,
            y: self.step_y(step, clef),
        }
    }

    /// y of each ledger line a note needs, ordered outward from the staff.
    pub fn ledger_lines(&self, midi: u8, clef: Clef) -> Vec<f32> {
        ledger_steps(staff_step(midi, clef))
            .into_iter()
            .map(|step| self.step_y(step, clef))
            .collect()
    }

    /// y of the five staff lines, top to bottom.
    pub fn staff_lines(&self, clef: Clef) -> [f32; 5] {
        let mut lines = [0.0; 5];
        for (slot, step) in lines
            .iter_mut()
            .zip((-STAFF_HALF_HEIGHT..=STAFF_HALF_HEIGHT).rev().step_by(2))
        {
            *slot = self.step_y(step, clef);
        }
        lines
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct StaffPosition {
    pub step: i32,
    pub y: f32,
}

impl StaffPosition {
    pub fn is_on_line(&self) -> bool {
        self.step % 2 == 0
    }

    pub fn needs_ledger_lines(&self) -> bool {
        !ledger_steps(self.step).is_empty()
    }
}
