//! Episode simulation and the controller boundary.
//!
//! - [`Episode`] - Many birds flying one pipe course, each with its own fitness
//! - [`PlaySession`] - Single-bird episode with pause and restart for interactive play
//! - [`Controller`] - Decides [`Action`]s from [`Observation`]s
//! - [`TelemetryRow`] - What a bird saw and did on one tick
//!
//! # Tick Order
//!
//! Each [`Episode::step`]:
//!
//! 1. Picks the target pipe (the second one once the lead bird has cleared the first)
//! 2. Moves every live bird, credits the survival reward and asks its controller
//! 3. Kills birds touching a pipe (collision penalty) and detects passed pipes
//! 4. On a pass, bumps the score, rewards every live bird and spawns one pipe
//! 5. Retires off-screen pipes and kills birds outside the screen
//! 6. Scrolls the ground

pub use self::{controller::*, episode::*, session::*, telemetry::*};

mod controller;
mod episode;
mod session;
mod telemetry;
