//! Minimal fixed-timestep runtime for the interactive modes.

pub use self::{
    app::App,
    event_loop::{RenderMode, TickPace},
    runtime::Runtime,
};

mod app;
mod event;
mod event_loop;
mod runtime;
