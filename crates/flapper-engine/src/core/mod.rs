//! World primitives: sprites, physics and the pipe course.

pub use self::{bird::*, config::*, course::*, pipe::*};

mod bird;
mod config;
mod course;
pub mod mask;
mod pipe;
