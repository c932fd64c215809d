use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use notewise_domain::{Clef, ClefMode, KeyboardRange, NoteTarget};

use crate::TutorError;

/// Range targets are sampled from: the clef's canonical range narrowed by the
/// calibrated keyboard range.
///
/// When the two share no natural pitch the calibration is ignored and the
/// canonical range is used instead. This is logged, not reported.
pub fn effective_range(clef: Clef, allowed: Option<KeyboardRange>) -> KeyboardRange {
    let canonical = clef.canonical_range();
    let Some(allowed) = allowed else {
        return canonical;
    };
    match canonical.intersect(&allowed) {
        Some(range) if range.naturals().next().is_some() => range,
        _ => {
            warn!(
                %clef,
                calibrated = %allowed,
                fallback = %canonical,
                "calibrated range has no playable notes for clef, using full clef range"
            );
            canonical
        }
    }
}

/// Uniformly samples a natural pitch inside the effective range.
pub fn random_note<R: Rng + ?Sized>(
    clef: Clef,
    allowed: Option<KeyboardRange>,
    rng: &mut R,
) -> Result<u8, TutorError> {
    sample_natural(clef, effective_range(clef, allowed), rng)
}

fn sample_natural<R: Rng + ?Sized>(
    clef: Clef,
    range: KeyboardRange,
    rng: &mut R,
) -> Result<u8, TutorError> {
    let candidates: Vec<u8> = range.naturals().collect();
    if candidates.is_empty() {
        return Err(TutorError::configuration(format!(
            "no natural pitches in {range} for {clef} clef"
        )));
    }
    Ok(candidates[rng.gen_range(0..candidates.len())])
}

pub fn choose_clef<R: Rng + ?Sized>(mode: ClefMode, rng: &mut R) -> Clef {
    match mode {
        ClefMode::Treble => Clef::Treble,
        ClefMode::Bass => Clef::Bass,
        ClefMode::Random => {
            if rng.gen_bool(0.5) {
                Clef::Treble
            } else {
                Clef::Bass
            }
        }
    }
}

/// Produces natural note targets from an injected random source.
///
/// Effective ranges are resolved once per clef the mode can draw, so a
/// calibration fallback is logged once per generator rather than per note.
pub struct NoteGenerator<R> {
    rng: R,
    mode: ClefMode,
    range: Option<KeyboardRange>,
    treble: Option<KeyboardRange>,
    bass: Option<KeyboardRange>,
}

impl<R: Rng> NoteGenerator<R> {
    pub fn new(rng: R, mode: ClefMode, range: Option<KeyboardRange>) -> Self {
        let uses_treble = !matches!(mode, ClefMode::Bass);
        let uses_bass = !matches!(mode, ClefMode::Treble);
        Self {
            rng,
            mode,
            range,
            treble: uses_treble.then(|| effective_range(Clef::Treble, range)),
            bass: uses_bass.then(|| effective_range(Clef::Bass, range)),
        }
    }

    pub fn mode(&self) -> ClefMode {
        self.mode
    }

    pub fn range(&self) -> Option<KeyboardRange> {
        self.range
    }

    /// Resolved sampling range for `clef`, or `None` when the mode never
    /// draws that clef.
    pub fn effective_range(&self, clef: Clef) -> Option<KeyboardRange> {
        match clef {
            Clef::Treble => self.treble,
            Clef::Bass => self.bass,
        }
    }

    pub fn next_target(&mut self) -> Result<NoteTarget, TutorError> {
        let clef = choose_clef(self.mode, &mut self.rng);
        let range = self
            .effective_range(clef)
            .unwrap_or_else(|| clef.canonical_range());
        let midi = sample_natural(clef, range, &mut self.rng)?;
        Ok(NoteTarget::natural(midi, clef)?)
    }

    /// All `count` targets at once; either every target is produced or none.
    pub fn targets(&mut self, count: usize) -> Result<Vec<NoteTarget>, TutorError> {
        let targets = (0..count)
            .map(|_| self.next_target())
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count, mode = ?self.mode, "generated targets");
        Ok(targets)
    }
}

impl NoteGenerator<StdRng> {
    pub fn from_entropy(mode: ClefMode, range: Option<KeyboardRange>) -> Self {
        Self::new(StdRng::from_entropy(), mode, range)
    }

    pub fn seeded(seed: u64, mode: ClefMode, range: Option<KeyboardRange>) -> Self {
        Self::new(StdRng::seed_from_u64(seed), mode, range)
    }
}
