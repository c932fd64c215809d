//! Typed note input for playing without a MIDI keyboard.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::warn;

use notewise_domain::pitch::MAX_MIDI;

/// Parses `60`, `C4`, `f#3` or `Bb2` into a MIDI number.
pub fn parse_note(input: &str) -> Option<u8> {
    let input = input.trim();
    if let Ok(midi) = input.parse::<u8>() {
        return (midi <= MAX_MIDI).then_some(midi);
    }
    let mut chars = input.chars();
    let pitch_class: i32 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let (alter, octave) = if let Some(octave) = rest.strip_prefix('#') {
        (1, octave)
    } else if let Some(octave) = rest.strip_prefix('b') {
        (-1, octave)
    } else {
        (0, rest)
    };
    let octave: i32 = octave.parse().ok()?;
    let midi = (octave + 1) * 12 + pitch_class + alter;
    u8::try_from(midi).ok().filter(|midi| *midi <= MAX_MIDI)
}

/// Reads notes from stdin on a background thread. The channel closes on end of
/// input or when the user types `q`.
pub fn spawn_stdin_notes() -> Receiver<u8> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") {
                break;
            }
            if line.is_empty() {
                continue;
            }
            match parse_note(line) {
                Some(midi) => {
                    if tx.send(midi).is_err() {
                        break;
                    }
                }
                None => warn!(input = line, "not a note, try C4 or 60"),
            }
        }
    });
    rx
}
