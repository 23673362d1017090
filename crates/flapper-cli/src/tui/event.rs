use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Advance the simulation by one step.
    Tick,
    /// Redraw the terminal.
    Render,
    /// Key press, resize and other terminal input.
    Crossterm(CrosstermEvent),
}
