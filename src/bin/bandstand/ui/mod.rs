//! TUI module for bandstand
//!
//! Transport, mixer meters and the tuner, redrawn every frame from library
//! snapshots.

mod mixer;
pub mod state;
mod transport;
mod tuner;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use saavy_band::{
    band::{Mixer, TransportSnapshot},
    engine::Levels,
    theory::ChordProgression,
};

pub use state::TunerState;

use mixer::render_mixer;
use transport::render_transport;
use tuner::render_tuner;

/// Everything one frame draws.
pub struct View<'a> {
    pub transport: TransportSnapshot,
    pub mixer: Mixer,
    pub levels: Levels,
    pub progression: &'a ChordProgression,
    pub device: &'a str,
    pub tuner: &'a TunerState,
}

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Transport bar
            Constraint::Length(6), // Mixer
            Constraint::Length(5), // Tuner
            Constraint::Min(0),
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_transport(frame, chunks[0], &view.transport, view.progression, view.device);
    render_mixer(frame, chunks[1], &view.mixer, &view.levels);
    render_tuner(frame, chunks[2], view.tuner);

    let help = Paragraph::new(
        " [Space] Play/Stop  [+/-] BPM  [B] Bass mode  [1/2/3] Mute  [[/]] Drum vol  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);
}
