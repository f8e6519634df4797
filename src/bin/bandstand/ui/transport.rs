//! Transport bar widget - play state, style, tempo, position and chord

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use saavy_band::{band::TransportSnapshot, theory::ChordProgression};

/// Render the transport bar
pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    transport: &TransportSnapshot,
    progression: &ChordProgression,
    device: &str,
) {
    let block = Block::default().title(" bandstand ").borders(Borders::ALL);

    let (play_symbol, play_state, play_color) = if transport.playing {
        ("▶", "Playing", Color::Green)
    } else {
        ("■", "Stopped", Color::Yellow)
    };
    let style = match (&transport.style, &transport.style_name) {
        (Some(key), Some(name)) => format!("{key} {name}"),
        _ => "-".to_string(),
    };
    let chord = transport
        .chord
        .map(|chord| chord.to_string())
        .unwrap_or_else(|| "-".to_string());

    let status = Line::from(vec![
        Span::styled(
            format!(" {play_symbol} {play_state}  "),
            Style::default().fg(play_color),
        ),
        Span::styled(
            format!("BPM: {:.0}  ", transport.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Bar {} | Beat {}  ", transport.measure + 1, transport.beat.floor() as u64 + 1),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("{style}  "), Style::default().fg(Color::Magenta)),
        Span::styled(
            format!("Bass: {}", transport.bass_mode),
            Style::default().fg(Color::Blue),
        ),
    ]);
    let harmony = Line::from(vec![
        Span::styled(format!(" Chord: {chord:<8}"), Style::default().fg(Color::LightYellow)),
        Span::styled(format!("{progression}  "), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("Out: {device}"), Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(vec![status, harmony]).block(block), area);
}
