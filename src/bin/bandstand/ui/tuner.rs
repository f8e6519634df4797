//! Tuner widget - detected note and how far off it is

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::TunerState;

/// Within this many cents the needle turns green.
const IN_TUNE_CENTS: f32 = 5.0;
const NEEDLE_WIDTH: usize = 41;

pub fn render_tuner(frame: &mut Frame, area: Rect, tuner: &TunerState) {
    let block = Block::default().title(" Tuner ").borders(Borders::ALL);

    if !tuner.enabled {
        let hint = Paragraph::new(" Start with --tuner to listen on the default input")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let mut lines = match tuner.estimate {
        Some(estimate) => {
            let color = if estimate.cents.abs() <= IN_TUNE_CENTS {
                Color::Green
            } else {
                Color::Yellow
            };
            vec![
                Line::from(vec![
                    Span::styled(
                        format!(" {:<3}{}  ", estimate.note_name(), estimate.octave),
                        Style::default().fg(color),
                    ),
                    Span::raw(format!(
                        "{:>7.1} Hz  {:+5.1} cents  confidence {:.2}",
                        estimate.frequency, estimate.cents, estimate.confidence
                    )),
                ]),
                Line::from(Span::styled(needle(estimate.cents), Style::default().fg(color))),
            ]
        }
        None => vec![Line::from(Span::styled(
            " listening...",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    lines.push(Line::from(Span::styled(
        format!(" input rms {:.3}  peak {:.3}", tuner.rms, tuner.peak),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// `-50 ....|.... +50` with a marker at `cents`.
fn needle(cents: f32) -> String {
    let centre = NEEDLE_WIDTH / 2;
    let offset = (cents / 50.0 * centre as f32).round() as isize;
    let position = (centre as isize + offset).clamp(0, NEEDLE_WIDTH as isize - 1) as usize;
    let dial: String = (0..NEEDLE_WIDTH)
        .map(|i| {
            if i == position {
                '●'
            } else if i == centre {
                '|'
            } else {
                '·'
            }
        })
        .collect();
    format!(" -50 {dial} +50")
}
