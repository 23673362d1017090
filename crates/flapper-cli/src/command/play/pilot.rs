use std::mem;

use flapper_engine::{Action, Controller, Observation};
use flapper_learn::controller::ForestController;
use flapper_neuro::network::NetworkController;

/// Turns key presses into flaps, one flap per press.
#[derive(Debug, Default)]
pub struct KeyboardController {
    pending: bool,
}

impl KeyboardController {
    pub fn flap(&mut self) {
        self.pending = true;
    }
}

impl Controller for KeyboardController {
    fn decide(&mut self, _observation: &Observation) -> Action {
        if mem::take(&mut self.pending) {
            Action::Jump
        } else {
            Action::Idle
        }
    }
}

/// Whoever is flying the bird on screen.
#[derive(Debug)]
pub enum Pilot {
    Keyboard(KeyboardController),
    Network(NetworkController),
    Forest(ForestController),
}

impl Pilot {
    pub fn name(&self) -> &'static str {
        match self {
            Pilot::Keyboard(_) => "keyboard",
            Pilot::Network(_) => "network",
            Pilot::Forest(_) => "forest",
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Pilot::Keyboard(_))
    }

    pub fn keyboard_mut(&mut self) -> Option<&mut KeyboardController> {
        match self {
            Pilot::Keyboard(keyboard) => Some(keyboard),
            Pilot::Network(_) | Pilot::Forest(_) => None,
        }
    }
}

impl Controller for Pilot {
    fn decide(&mut self, observation: &Observation) -> Action {
        match self {
            Pilot::Keyboard(keyboard) => keyboard.decide(observation),
            Pilot::Network(network) => network.decide(observation),
            Pilot::Forest(forest) => forest.decide(observation),
        }
    }
}
