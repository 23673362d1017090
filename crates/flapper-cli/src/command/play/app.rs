use crossterm::event::{Event, KeyCode};
use flapper_engine::{CourseSeed, PlaySession, SessionState};
use flapper_learn::dataset::{DatasetError, TelemetryWriter};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    command::play::pilot::Pilot,
    tui::{App, RenderMode, Runtime, TickPace},
    ui::widgets::SessionDisplay,
};

const FPS: f64 = 60.0;

#[derive(Debug)]
pub struct PlayApp {
    session: PlaySession,
    pilot: Pilot,
    telemetry: Option<TelemetryWriter>,
    turbo: bool,
    is_exiting: bool,
    error: Option<anyhow::Error>,
}

impl PlayApp {
    pub fn new(session: PlaySession, pilot: Pilot, telemetry: Option<TelemetryWriter>) -> Self {
        Self {
            session,
            pilot,
            telemetry,
            turbo: false,
            is_exiting: false,
            error: None,
        }
    }

    pub fn turbo(self, turbo: bool) -> Self {
        Self { turbo, ..self }
    }

    /// Flushes telemetry and reports the first error hit while playing.
    pub fn finish(self) -> anyhow::Result<()> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if let Some(mut telemetry) = self.telemetry {
            telemetry.flush()?;
            tracing::info!(rows = telemetry.rows(), "telemetry saved");
        }
        Ok(())
    }

    fn tick_pace(&self) -> TickPace {
        if self.turbo {
            TickPace::Unthrottled
        } else {
            TickPace::from_rate(f64::from(self.session.episode().config().tick_rate))
        }
    }

    fn fail(&mut self, err: anyhow::Error) {
        self.error = Some(err);
        self.is_exiting = true;
    }

    fn log_telemetry(&mut self, rows: &[flapper_engine::TelemetryRow]) -> Result<(), DatasetError> {
        if let Some(telemetry) = &mut self.telemetry {
            telemetry.append_all(rows)?;
        }
        Ok(())
    }

    fn restart(&mut self) {
        let seed: CourseSeed = rand::random();
        if let Err(err) = self.session.restart(seed) {
            self.fail(err.into());
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_pace(self.tick_pace());
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) {
        let state = self.session.session_state();
        let is_playing = state.is_playing();
        let can_toggle_pause = is_playing || state.is_paused();

        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Char(' ') | KeyCode::Up if is_playing => {
                    if let Some(keyboard) = self.pilot.keyboard_mut() {
                        keyboard.flap();
                    }
                }
                KeyCode::Char('t') if !self.pilot.is_manual() => {
                    self.turbo = !self.turbo;
                    runtime.set_pace(self.tick_pace());
                }
                KeyCode::Char('p') if can_toggle_pause => self.session.toggle_pause(),
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
                _ => {}
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session, self.pilot.name()).turbo(self.turbo);
        let turbo_text = match (self.pilot.is_manual(), self.turbo) {
            (true, _) => "",
            (false, true) => " | T (Turbo: ON)",
            (false, false) => " | T (Turbo: OFF)",
        };
        let help_text = match self.session.session_state() {
            SessionState::Playing if self.pilot.is_manual() => {
                "Controls: Space/↑ (Flap) | P (Pause) | R (Restart) | Q (Quit)".to_owned()
            }
            SessionState::Playing => {
                format!("Controls: P (Pause) | R (Restart){turbo_text} | Q (Quit)")
            }
            SessionState::Paused => "Controls: P (Resume) | R (Restart) | Q (Quit)".to_owned(),
            SessionState::GameOver => "Controls: R (Restart) | Q (Quit)".to_owned(),
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        let Some(report) = self.session.step(&mut self.pilot) else {
            return;
        };
        if let Err(err) = self.log_telemetry(&report.telemetry) {
            self.fail(anyhow::Error::new(err).context("Failed to append telemetry"));
        }
    }
}
