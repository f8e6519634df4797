//! Channel strips - fader position, mute state and live RMS per channel

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use saavy_band::{
    band::Mixer,
    engine::{Channel, Levels},
};

/// RMS that fills a meter. Mixed program material rarely sits above this.
const METER_FULL_SCALE: f32 = 0.5;

pub fn render_mixer(frame: &mut Frame, area: Rect, mixer: &Mixer, levels: &Levels) {
    let block = Block::default().title(" Mixer ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); Channel::COUNT + 1])
        .split(inner);

    for (i, channel) in Channel::ALL.into_iter().enumerate() {
        let strip = mixer.channel(channel);
        let level = levels.channel(channel);
        let (color, state) = if strip.muted {
            (Color::DarkGray, "muted")
        } else {
            (Color::Green, "")
        };
        let label = format!(
            "[{}] {:<6} vol {:>3.0}% {state}",
            i + 1,
            channel.name(),
            strip.gain * 100.0
        );
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(meter_ratio(level))
            .label(label);
        frame.render_widget(gauge, rows[i]);
    }

    let master = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(meter_ratio(levels.master))
        .label(format!("    master vol {:>3.0}%", mixer.master() * 100.0));
    frame.render_widget(master, rows[Channel::COUNT]);
}

fn meter_ratio(rms: f32) -> f64 {
    (rms / METER_FULL_SCALE).clamp(0.0, 1.0) as f64
}
