//! Decision interface between the world and whatever flies the bird.
//!
//! Each tick a live bird's [`Controller`] receives an [`Observation`] of the
//! bird and the pipe it is heading for, and answers with an [`Action`].
//!
//! # Example
//!
//! ```
//! use flapper_engine::{Action, Controller, Observation};
//!
//! /// Flaps whenever the bird sinks below the middle of the gap.
//! #[derive(Debug)]
//! struct Midline;
//!
//! impl Controller for Midline {
//!     fn decide(&mut self, observation: &Observation) -> Action {
//!         if observation.gap_top_distance() > observation.gap_bottom_distance() {
//!             Action::Jump
//!         } else {
//!             Action::Idle
//!         }
//!     }
//! }
//!
//! let observation = Observation {
//!     bird_y: 420.0,
//!     bird_velocity: 3.0,
//!     pipe_x: 500,
//!     gap_top: 250,
//!     gap_bottom: 450,
//! };
//! assert_eq!(Midline.decide(&observation), Action::Jump);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a bird sees on a given tick.
///
/// The pipe fields describe the target pipe: the first pipe on screen, or the
/// next one once the lead bird has cleared the first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub bird_y: f32,
    pub bird_velocity: f32,
    pub pipe_x: i32,
    /// Y coordinate where the top pipe ends.
    pub gap_top: i32,
    /// Y coordinate where the bottom pipe begins.
    pub gap_bottom: i32,
}

impl Observation {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn gap_top_distance(&self) -> f32 {
        (self.bird_y - self.gap_top as f32).abs()
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn gap_bottom_distance(&self) -> f32 {
        (self.bird_y - self.gap_bottom as f32).abs()
    }

    /// Inputs fed to evolved networks: height and absolute distances to both gap edges.
    #[must_use]
    pub fn network_inputs(&self) -> [f32; 3] {
        [
            self.bird_y,
            self.gap_top_distance(),
            self.gap_bottom_distance(),
        ]
    }

    /// Feature vector in telemetry column order (`bird_y`, `bird_velocity`,
    /// `pipe_x`, `pipe_height`).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn telemetry_features(&self) -> [f32; 4] {
        [
            self.bird_y,
            self.bird_velocity,
            self.pipe_x as f32,
            self.gap_top as f32,
        ]
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum Action {
    #[default]
    #[display("idle")]
    Idle,
    #[display("jump")]
    Jump,
}

impl Action {
    /// Class label used in telemetry and classifiers (0 = idle, 1 = jump).
    #[must_use]
    pub const fn label(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Jump => 1,
        }
    }

    #[must_use]
    pub const fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(Self::Idle),
            1 => Some(Self::Jump),
            _ => None,
        }
    }
}

pub trait Controller: fmt::Debug {
    /// Chooses the action for this tick.
    fn decide(&mut self, observation: &Observation) -> Action;
}

impl<C> Controller for Box<C>
where
    C: Controller + ?Sized,
{
    fn decide(&mut self, observation: &Observation) -> Action {
        (**self).decide(observation)
    }
}

impl<C> Controller for &mut C
where
    C: Controller + ?Sized,
{
    fn decide(&mut self, observation: &Observation) -> Action {
        (**self).decide(observation)
    }
}

/// Replays a fixed action forever. Handy as a baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantController(pub Action);

impl Controller for ConstantController {
    fn decide(&mut self, _observation: &Observation) -> Action {
        self.0
    }
}
