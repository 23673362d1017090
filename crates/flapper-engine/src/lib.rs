//! Side-scrolling flap-through-the-gap game world.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - Geometry, bird physics, pipe scrolling, pixel masks and the
//!   seeded pipe course
//! - [`engine`] - Episodes with many birds, fitness accounting, telemetry and
//!   the [`Controller`] trait
//!
//! Nothing here draws or reads input; the CLI crate renders an [`Episode`]
//! and turns key presses into a [`Controller`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
