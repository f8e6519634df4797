//! bandstand - a procedural backing band in the terminal
//!
//! Run with: cargo run -- --genre jazz --style 1 --progression "Dm7 G7 Cmaj7"

mod app;
mod ui;

use std::{fs::File, path::PathBuf, sync::Arc};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::Level;

use app::App;
use saavy_band::{
    analysis::{PitchAnalyzer, PitchConfig},
    band::{Band, BandConfig, BassMode},
    engine::{self, EngineConfig},
    io::{self, InputDevice, OutputDevice},
    sequencing::StyleLibrary,
    theory::ChordProgression,
    voices::{BassTone, DrumKit, PianoTone},
};

#[derive(Parser)]
#[command(name = "bandstand")]
#[command(about = "Synthesized drums, bass and piano to play along with", long_about = None)]
struct Cli {
    /// Genre to play (see --list-styles)
    #[arg(short, long, default_value = "rock")]
    genre: String,

    /// Style number within the genre, 1-12
    #[arg(short, long, default_value = "1")]
    style: u8,

    /// Tempo in BPM, 40-240 (default: the style's own tempo)
    #[arg(short, long)]
    bpm: Option<f32>,

    /// Chord progression, e.g. "C G Am F" or "Dm7-G7-Cmaj7"
    #[arg(short, long, default_value = "C G Am F")]
    progression: String,

    /// Measures each chord lasts
    #[arg(long, default_value = "1")]
    measures_per_chord: u64,

    /// Bass line: root, walking or melodic
    #[arg(long, default_value = "root")]
    bass_mode: BassMode,

    /// Drum kit: acoustic, electronic, rock or jazz
    #[arg(long, default_value = "acoustic")]
    kit: DrumKit,

    /// Bass tone: fingerstyle, slap, pick or synth
    #[arg(long, default_value = "fingerstyle")]
    bass_tone: BassTone,

    /// Piano tone: grand, bright or electric
    #[arg(long, default_value = "grand")]
    piano_tone: PianoTone,

    /// Listen on the default input and show a tuner
    #[arg(long)]
    tuner: bool,

    /// Write logs to this file (the terminal is busy with the UI)
    #[arg(long)]
    log: Option<PathBuf>,

    /// More log detail (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print every genre and style, then exit
    #[arg(long)]
    list_styles: bool,
}

fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = cli.log.as_ref() else {
        return Ok(());
    };
    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn list_styles(library: &StyleLibrary) {
    for genre in library.genres() {
        println!("{genre}");
        for style in library.styles_in(genre) {
            let (low, high) = style.bpm_range();
            println!(
                "  {:>2}  {:<22} {:>5}  {:.0}-{:.0} bpm",
                style.style_id(),
                style.name,
                style.time_signature().to_string(),
                low,
                high
            );
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli)?;

    let library = Arc::new(StyleLibrary::reference().wrap_err("style table is invalid")?);
    if cli.list_styles {
        list_styles(&library);
        return Ok(());
    }

    let progression: ChordProgression = cli
        .progression
        .parse()
        .wrap_err_with(|| format!("could not read progression '{}'", cli.progression))?;
    let bpm = cli
        .bpm
        .unwrap_or_else(|| library.resolve(&cli.genre, cli.style).default_bpm());

    // Audio first: if the device is unavailable nothing else starts
    let sample_rate =
        io::default_output_sample_rate().wrap_err("no usable audio output device")?;
    let (engine, renderer) = engine::create(EngineConfig::new(sample_rate));
    let output = OutputDevice::open(renderer).wrap_err("failed to open audio output")?;

    let config = BandConfig::default()
        .with_measures_per_chord(cli.measures_per_chord)
        .with_kit(cli.kit)
        .with_bass_tone(cli.bass_tone)
        .with_piano_tone(cli.piano_tone)
        .with_bass_mode(cli.bass_mode);
    let band = Band::new(Arc::clone(&library), engine, config);

    let analyzer = if cli.tuner {
        let input = InputDevice::open(16_384).wrap_err("failed to open audio input")?;
        let mut analyzer = PitchAnalyzer::new(input.sample_rate(), PitchConfig::default());
        Some((analyzer_input(&mut analyzer), analyzer, input))
    } else {
        None
    };

    let mut app = App::new(band, cli.genre, cli.style, bpm, progression, output.name().to_string());
    if let Some((events, mut analyzer, input)) = analyzer {
        analyzer.start(input);
        app = app.with_tuner(analyzer, events);
    }

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

/// Route analyzer events into a queue the UI drains each frame.
fn analyzer_input(
    analyzer: &mut PitchAnalyzer,
) -> rtrb::Consumer<saavy_band::analysis::AnalyzerEvent> {
    let (mut producer, consumer) = rtrb::RingBuffer::new(256);
    analyzer.set_listener(move |event| {
        // A full queue means the UI is behind; it only needs the latest
        let _ = producer.push(event);
    });
    consumer
}
