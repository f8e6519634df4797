//! bandstand - event loop and key handling

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use rtrb::Consumer;

use saavy_band::{
    analysis::{AnalyzerEvent, PitchAnalyzer},
    band::Band,
    engine::Channel,
    theory::ChordProgression,
};

use crate::ui::{self, TunerState, View};

const BPM_STEP: f32 = 5.0;
const VOLUME_STEP: f32 = 0.1;

pub struct App {
    band: Band,
    genre: String,
    style: u8,
    bpm: f32,
    progression: ChordProgression,
    device: String,
    analyzer: Option<PitchAnalyzer>,
    analyzer_rx: Option<Consumer<AnalyzerEvent>>,
    tuner: TunerState,
    should_quit: bool,
}

impl App {
    pub fn new(
        band: Band,
        genre: String,
        style: u8,
        bpm: f32,
        progression: ChordProgression,
        device: String,
    ) -> Self {
        Self {
            band,
            genre,
            style,
            bpm,
            progression,
            device,
            analyzer: None,
            analyzer_rx: None,
            tuner: TunerState::default(),
            should_quit: false,
        }
    }

    pub fn with_tuner(mut self, analyzer: PitchAnalyzer, events: Consumer<AnalyzerEvent>) -> Self {
        self.analyzer = Some(analyzer);
        self.analyzer_rx = Some(events);
        self.tuner.enabled = true;
        self
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.play();

        while !self.should_quit {
            self.poll_tuner();

            let view = View {
                transport: self.band.transport(),
                mixer: self.band.mixer(),
                levels: self.band.levels(),
                progression: &self.progression,
                device: &self.device,
                tuner: &self.tuner,
            };
            terminal.draw(|frame| ui::render(frame, &view))?;

            // ~60 fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.band.stop();
        if let Some(analyzer) = self.analyzer.as_mut() {
            analyzer.stop();
        }
        Ok(())
    }

    fn play(&mut self) {
        let key = self.band.play(
            &self.genre,
            self.style,
            self.bpm,
            Some(self.progression.clone()),
        );
        // Keep the resolved style so a restart does not fall back again
        self.genre = key.genre;
        self.style = key.style_id;
    }

    fn poll_tuner(&mut self) {
        let Some(events) = self.analyzer_rx.as_mut() else {
            return;
        };
        while let Ok(event) = events.pop() {
            self.tuner.apply(event);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                if self.band.is_playing() {
                    self.band.stop();
                } else {
                    self.play();
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.bpm = self.band.set_bpm(self.band.bpm() + BPM_STEP);
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                self.bpm = self.band.set_bpm(self.band.bpm() - BPM_STEP);
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.band.set_bass_mode(self.band.bass_mode().next());
            }
            KeyCode::Char('1') => {
                self.band.toggle_mute(Channel::Drums);
            }
            KeyCode::Char('2') => {
                self.band.toggle_mute(Channel::Bass);
            }
            KeyCode::Char('3') => {
                self.band.toggle_mute(Channel::Piano);
            }
            KeyCode::Char('[') => self.nudge_drums(-VOLUME_STEP),
            KeyCode::Char(']') => self.nudge_drums(VOLUME_STEP),
            _ => {}
        }
    }

    fn nudge_drums(&mut self, step: f32) {
        let volume = self.band.mixer().volume(Channel::Drums);
        self.band.set_channel_volume(Channel::Drums, volume + step);
    }
}
