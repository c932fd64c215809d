mod display;
mod input;
mod settings;

use std::sync::mpsc::Receiver;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use notewise_domain::{note_name, AttemptOutcome, ClefMode, KeyboardRange};
use notewise_tutor::{
    cross_session_note_performance, weakest_notes, JsonFileStore, MidiManager, NoteStream,
    PracticeSession, SessionStore, SessionSummary,
};

use crate::settings::TrainerSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Practice reading notes on the staff", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a practice session (default)
    Drill(DrillArgs),
    /// Show per-note accuracy across all saved sessions, worst first
    Stats {
        /// Only show this many notes
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List MIDI input devices
    Devices,
}

#[derive(Args, Debug, Default)]
struct DrillArgs {
    /// Number of notes in the session
    #[arg(short = 'n', long)]
    length: Option<usize>,
    /// Which clef targets are drawn on
    #[arg(short, long, value_enum)]
    clef: Option<ClefArg>,
    /// Lowest key on the keyboard (MIDI number)
    #[arg(long, requires = "highest")]
    lowest: Option<u8>,
    /// Highest key on the keyboard (MIDI number)
    #[arg(long, requires = "lowest")]
    highest: Option<u8>,
    /// MIDI input device name; the first device is used when omitted
    #[arg(short, long)]
    device: Option<String>,
    /// Type note names instead of playing a MIDI keyboard
    #[arg(short, long)]
    typed: bool,
    /// Seed for reproducible targets
    #[arg(long)]
    seed: Option<u64>,
    /// Remember length, clef, range and device for later runs
    #[arg(long)]
    save_settings: bool,
    /// Do not store the finished session
    #[arg(long)]
    no_save: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClefArg {
    Treble,
    Bass,
    Random,
}

impl From<ClefArg> for ClefMode {
    fn from(arg: ClefArg) -> Self {
        match arg {
            ClefArg::Treble => ClefMode::Treble,
            ClefArg::Bass => ClefMode::Bass,
            ClefArg::Random => ClefMode::Random,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Drill(DrillArgs::default())) {
        Command::Drill(args) => drill(args),
        Command::Stats { limit } => stats(limit),
        Command::Devices => {
            for device in MidiManager::list_inputs()? {
                println!("{}", device.name);
            }
            Ok(())
        }
    }
}

fn merge_settings(mut settings: TrainerSettings, args: &DrillArgs) -> Result<TrainerSettings> {
    if let Some(length) = args.length {
        settings.session_length = Some(length);
    }
    if let Some(clef) = args.clef {
        settings.clef_mode = Some(clef.into());
    }
    if let (Some(lowest), Some(highest)) = (args.lowest, args.highest) {
        settings.range = Some(KeyboardRange::new(lowest, highest)?);
    }
    if let Some(device) = &args.device {
        settings.midi_device = Some(device.clone());
    }
    Ok(settings)
}

fn drill(args: DrillArgs) -> Result<()> {
    let stored = TrainerSettings::load().unwrap_or_else(|err| {
        warn!(%err, "could not read settings, using defaults");
        TrainerSettings::default()
    });
    let settings = merge_settings(stored, &args)?;
    if args.save_settings {
        settings.save()?;
    }

    let config = settings.session_config();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = PracticeSession::generate(&config, &mut rng)?;

    // The stream owns the MIDI connection; keep it alive for the whole drill.
    let midi_stream: NoteStream;
    let typed_notes: Receiver<u8>;
    let notes = if args.typed {
        println!("Type each note (C4, F#3 or a MIDI number), q to stop.");
        typed_notes = input::spawn_stdin_notes();
        &typed_notes
    } else {
        midi_stream = MidiManager::open_note_stream(settings.midi_device.as_deref())
            .context("open MIDI input (use --typed to enter notes by name)")?;
        &midi_stream.notes
    };

    run_session(&mut session, notes);

    let summary = SessionSummary::from_log(&session);
    println!("{}", display::render_summary(&summary));
    if !session.is_complete() {
        info!(id = session.id(), "session stopped early, not saved");
        return Ok(());
    }
    if args.no_save {
        return Ok(());
    }

    let mut store = JsonFileStore::default_location()?;
    store.save(&session.to_record())?;
    let history = store.load_all()?;
    println!("\nNotes to work on:");
    print!("{}", display::render_ranking(&weakest_notes(&history, 5)));
    Ok(())
}

/// Single consumer: every played note is applied to the session in arrival
/// order until the session completes or input ends.
fn run_session(session: &mut PracticeSession, notes: &Receiver<u8>) {
    while let Some(target) = session.current_target().copied() {
        println!(
            "\n[{}/{}]\n{}",
            session.current_index() + 1,
            session.len(),
            display::render_staff(&target)
        );
        loop {
            let Ok(played) = notes.recv() else {
                return;
            };
            let result = session.record_played_note(played);
            match result.outcome {
                Some(AttemptOutcome::Correct) => {
                    println!("{} correct", note_name(played));
                    break;
                }
                Some(AttemptOutcome::Incorrect) => {
                    println!("{} is not it, try again", note_name(played));
                }
                None => return,
            }
        }
    }
}

fn stats(limit: Option<usize>) -> Result<()> {
    let store = JsonFileStore::default_location()?;
    let history = store.load_all()?;
    info!(sessions = history.len(), dir = ?store.dir(), "loaded practice history");
    let ranking = match limit {
        Some(limit) => weakest_notes(&history, limit),
        None => cross_session_note_performance(&history),
    };
    print!("{}", display::render_ranking(&ranking));
    Ok(())
}
