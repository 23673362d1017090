use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Runtime;

/// An application driven by [`Runtime::run`].
pub trait App {
    /// Called once before the loop starts; configure the tick pace here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event);

    fn draw(&self, frame: &mut Frame);

    /// Called on every tick.
    fn update(&mut self, runtime: &mut Runtime);
}
