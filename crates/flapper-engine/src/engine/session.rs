use std::{slice, time::Duration};

use crate::{CourseSeed, GameConfig};

use super::{
    controller::Controller,
    episode::{Episode, EpisodeBudget, EpisodeError, TickReport},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// A single-bird episode with pause, restart and a best-score record.
///
/// Used by the interactive modes; the simulation itself lives in [`Episode`].
#[derive(Debug, Clone)]
pub struct PlaySession {
    episode: Episode,
    session_state: SessionState,
    best_score: u32,
    attempts: u32,
}

impl PlaySession {
    pub fn new(config: GameConfig, seed: CourseSeed) -> Result<Self, EpisodeError> {
        Ok(Self {
            episode: Episode::new(config, seed, 1, EpisodeBudget::UNLIMITED)?,
            session_state: SessionState::Playing,
            best_score: 0,
            attempts: 1,
        })
    }

    #[must_use]
    pub fn episode(&self) -> &Episode {
        &self.episode
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.episode.score()
    }

    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.best_score.max(self.episode.score())
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Simulated time of the current attempt.
    #[must_use]
    pub fn duration(&self) -> Duration {
        const NANOS_PER_SEC: u64 = 1_000_000_000;
        let rate = u64::from(self.episode.config().tick_rate.max(1));
        let ticks = self.episode.tick();
        let secs = ticks / rate;
        let nanos = (ticks % rate) * NANOS_PER_SEC / rate;
        Duration::from_secs(secs) + Duration::from_nanos(nanos)
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Runs one tick while playing. Returns `None` when paused or over.
    pub fn step<C>(&mut self, controller: &mut C) -> Option<TickReport>
    where
        C: Controller,
    {
        if !self.session_state.is_playing() {
            return None;
        }
        let report = self.episode.step(slice::from_mut(controller));
        if !self.episode.state().is_running() {
            self.session_state = SessionState::GameOver;
            self.best_score = self.best_score.max(self.episode.score());
            tracing::info!(
                score = self.episode.score(),
                ticks = self.episode.tick(),
                "game over"
            );
        }
        Some(report)
    }

    /// Starts a new attempt on a fresh course, keeping the best score.
    pub fn restart(&mut self, seed: CourseSeed) -> Result<(), EpisodeError> {
        self.best_score = self.best_score();
        self.episode = Episode::new(
            self.episode.config().clone(),
            seed,
            1,
            EpisodeBudget::UNLIMITED,
        )?;
        self.session_state = SessionState::Playing;
        self.attempts += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, ConstantController};

    fn session() -> PlaySession {
        PlaySession::new(GameConfig::default(), CourseSeed::from_u128(99)).unwrap()
    }

    #[test]
    fn test_pause_blocks_steps() {
        let mut session = session();
        let mut controller = ConstantController(Action::Idle);
        session.toggle_pause();
        assert!(session.session_state().is_paused());
        assert!(session.step(&mut controller).is_none());
        assert_eq!(session.episode().tick(), 0);
        session.toggle_pause();
        assert!(session.step(&mut controller).is_some());
        assert_eq!(session.episode().tick(), 1);
    }

    #[test]
    fn test_game_over_and_restart() {
        let mut session = session();
        let mut controller = ConstantController(Action::Jump);
        while session.step(&mut controller).is_some() {}
        assert!(session.session_state().is_game_over());
        session.toggle_pause();
        assert!(session.session_state().is_game_over());

        session.restart(CourseSeed::from_u128(100)).unwrap();
        assert!(session.session_state().is_playing());
        assert_eq!(session.attempts(), 2);
        assert_eq!(session.episode().tick(), 0);
    }

    #[test]
    fn test_duration_follows_tick_rate() {
        let mut session = session();
        let mut controller = ConstantController(Action::Idle);
        for _ in 0..15 {
            session.step(&mut controller);
        }
        assert_eq!(session.duration(), Duration::from_millis(500));
    }
}
