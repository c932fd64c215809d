use std::sync::mpsc::{self, Receiver};

use anyhow::{anyhow, Result};
use midir::{MidiInput, MidiInputConnection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const CLIENT_NAME: &str = "notewise";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MidiDevice {
    pub name: String,
}

/// Pitch of a note-on message on any channel.
///
/// Note-on with velocity 0 is how many keyboards send note-off, so it is
/// dropped along with every other message type.
pub fn decode_note_on(message: &[u8]) -> Option<u8> {
    match message {
        &[status, pitch, velocity, ..] if status & 0xF0 == 0x90 && velocity > 0 => {
            Some(pitch & 0x7F)
        }
        _ => None,
    }
}

/// An open input port. Played pitches arrive in order on `notes`; dropping the
/// stream closes the port.
pub struct NoteStream {
    _connection: MidiInputConnection<()>,
    pub notes: Receiver<u8>,
}

pub struct MidiManager;

impl MidiManager {
    pub fn list_inputs() -> Result<Vec<MidiDevice>> {
        let input = MidiInput::new(CLIENT_NAME)?;
        Ok(input
            .ports()
            .iter()
            .map(|port| MidiDevice {
                name: input.port_name(port).unwrap_or_else(|_| "Unknown".into()),
            })
            .collect())
    }

    /// Connects to the named port, or the first port when `name` is `None`.
    ///
    /// midir calls back on its own thread; decoded pitches are forwarded over
    /// a channel so a single consumer feeds them to the session one at a time.
    pub fn open_note_stream(name: Option<&str>) -> Result<NoteStream> {
        let input = MidiInput::new(CLIENT_NAME)?;
        let ports = input.ports();
        let port = match name {
            Some(name) => ports
                .iter()
                .find(|port| input.port_name(port).map(|n| n == name).unwrap_or(false)),
            None => ports.first(),
        }
        .cloned()
        .ok_or_else(|| anyhow!("midi input port not found: {}", name.unwrap_or("<any>")))?;
        let port_name = input.port_name(&port).unwrap_or_else(|_| "Unknown".into());

        let (tx, rx) = mpsc::channel();
        let connection = input
            .connect(
                &port,
                "notewise-input",
                move |_stamp, message, _| {
                    if let Some(pitch) = decode_note_on(message) {
                        debug!(pitch, "note on");
                        let _ = tx.send(pitch);
                    }
                },
                (),
            )
            .map_err(|err| anyhow!("midi connect error: {err}"))?;
        info!(port = %port_name, "listening for notes");
        Ok(NoteStream {
            _connection: connection,
            notes: rx,
        })
    }
}
