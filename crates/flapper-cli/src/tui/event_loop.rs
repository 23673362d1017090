use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// How often ticks are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TickPace {
    /// No ticks; the app only reacts to input.
    #[default]
    Stopped,
    Fixed(Duration),
    /// A tick whenever nothing else is pending.
    Unthrottled,
}

impl TickPace {
    #[must_use]
    pub fn from_rate(rate: f64) -> Self {
        Self::Fixed(Duration::from_secs_f64(1.0 / rate))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render after every tick or input event.
    #[default]
    OnDirty,
    /// Render after changes, at most once per interval.
    Throttled(Duration),
}

impl RenderMode {
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Decides which event comes next.
///
/// Priority is render, then pending input, then tick, so an unthrottled
/// simulation cannot starve the screen or the keyboard.
#[derive(Debug)]
pub(super) struct EventLoop {
    pace: TickPace,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        let now = Instant::now();
        let long_ago = now.checked_sub(Duration::from_secs(3600)).unwrap_or(now);
        Self {
            pace: TickPace::default(),
            render_mode: RenderMode::default(),
            last_tick: long_ago,
            last_render: long_ago,
            dirty: true,
        }
    }
}

impl EventLoop {
    pub(super) fn set_pace(&mut self, pace: TickPace) {
        self.pace = pace;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    fn render_due(&self, now: Instant) -> bool {
        match self.render_mode {
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && now.duration_since(self.last_render) >= interval
            }
        }
    }

    fn next_tick_at(&self) -> Option<Instant> {
        match self.pace {
            TickPace::Stopped => None,
            TickPace::Fixed(interval) => Some(self.last_tick + interval),
            TickPace::Unthrottled => Some(self.last_tick),
        }
    }

    /// Blocks until the next event is due.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if self.render_due(now) {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            let next_tick_at = self.next_tick_at();
            let next_render_at = match self.render_mode {
                RenderMode::OnDirty => None,
                RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
            };
            let timeout = [next_tick_at, next_render_at]
                .into_iter()
                .flatten()
                .min()
                .map(|at| at.saturating_duration_since(now));

            let has_input = match timeout {
                Some(timeout) => event::poll(timeout)?,
                None => true,
            };
            if has_input {
                self.dirty = true;
                return Ok(event::read()?.into());
            }

            if next_tick_at.is_some_and(|at| Instant::now() >= at) {
                self.last_tick = Instant::now();
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_schedule() {
        let mut events = EventLoop::default();
        assert_eq!(events.next_tick_at(), None);
        events.set_pace(TickPace::Unthrottled);
        assert_eq!(events.next_tick_at(), Some(events.last_tick));
        events.set_pace(TickPace::from_rate(4.0));
        assert_eq!(
            events.next_tick_at(),
            Some(events.last_tick + Duration::from_millis(250))
        );
    }

    #[test]
    fn test_throttled_render_waits_for_interval() {
        let mut events = EventLoop::default();
        events.set_render_mode(RenderMode::throttled_from_rate(10.0));
        let now = Instant::now();
        assert!(events.render_due(now));
        events.last_render = now;
        assert!(!events.render_due(now + Duration::from_millis(50)));
        assert!(events.render_due(now + Duration::from_millis(100)));
        events.dirty = false;
        assert!(!events.render_due(now + Duration::from_millis(200)));
    }
}
