use std::io;

use crate::tui::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode, TickPace},
};

/// Owns the terminal session and feeds ticks, renders and input to an [`App`].
#[derive(Debug, Default)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pace(&mut self, pace: TickPace) {
        self.events.set_pace(pace);
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Runs `app` until it asks to exit, restoring the terminal afterwards.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(&mut self),
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, &event),
                }
            }
            Ok(())
        })
    }
}
