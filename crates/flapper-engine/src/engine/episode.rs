use serde::{Deserialize, Serialize};

use crate::{
    Bird, ConfigError, CourseSeed, GameConfig, Ground, Pipe, PipeCourse, Sprites,
    mask::MaskWidthError,
};

use super::{
    controller::{Action, Controller, Observation},
    telemetry::TelemetryRow,
};

/// Fitness credited to every live bird for each tick it survives.
pub const SURVIVAL_REWARD: f32 = 0.1;
/// Fitness credited to every live bird whenever a pipe is passed.
pub const PASS_BONUS: f32 = 5.0;
/// Fitness deducted from a bird that flies into a pipe.
pub const COLLISION_PENALTY: f32 = 1.0;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EpisodeError {
    #[display("invalid game config: {_0}")]
    InvalidConfig(ConfigError),
    #[display("invalid sprite size: {_0}")]
    SpriteSize(MaskWidthError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum DeathCause {
    #[display("hit a pipe")]
    Pipe,
    #[display("left the screen")]
    OutOfBounds,
}

/// Limits that end an episode even while birds are still alive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeBudget {
    pub max_ticks: Option<u64>,
    pub max_score: Option<u32>,
}

impl EpisodeBudget {
    pub const UNLIMITED: Self = Self {
        max_ticks: None,
        max_score: None,
    };

    #[must_use]
    pub fn is_exhausted(&self, tick: u64, score: u32) -> bool {
        self.max_ticks.is_some_and(|max| tick >= max)
            || self.max_score.is_some_and(|max| score >= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EpisodeState {
    Running,
    AllDead,
    BudgetExhausted,
}

/// A bird together with its fitness accumulator.
#[derive(Debug, Clone)]
pub struct BirdSlot {
    bird: Bird,
    fitness: f32,
    death: Option<DeathCause>,
    survived_ticks: u64,
}

impl BirdSlot {
    fn new(config: &GameConfig) -> Self {
        Self {
            bird: Bird::new(config),
            fitness: 0.0,
            death: None,
            survived_ticks: 0,
        }
    }

    #[must_use]
    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    #[must_use]
    pub fn death(&self) -> Option<DeathCause> {
        self.death
    }

    #[must_use]
    pub fn survived_ticks(&self) -> u64 {
        self.survived_ticks
    }
}

/// What happened during one call to [`Episode::step`].
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: u64,
    /// One row per bird that was alive at the start of the tick, in bird order.
    pub telemetry: Vec<TelemetryRow>,
    pub passed: bool,
    pub deaths: Vec<(usize, DeathCause)>,
}

/// Birds flying the same pipe course at the same time.
///
/// Every bird is driven by its own controller, indexed in parallel with the
/// birds. Birds are never removed from the slot list; a dead bird keeps its
/// final fitness.
///
/// # Example
///
/// ```
/// use flapper_engine::{
///     Action, ConstantController, CourseSeed, Episode, EpisodeBudget, GameConfig,
/// };
///
/// let mut episode = Episode::new(
///     GameConfig::default(),
///     CourseSeed::from_u128(7),
///     2,
///     EpisodeBudget::UNLIMITED,
/// )?;
/// let mut controllers = [ConstantController(Action::Idle); 2];
/// while episode.state().is_running() {
///     episode.step(&mut controllers);
/// }
/// assert!(episode.state().is_all_dead());
/// # Ok::<(), flapper_engine::EpisodeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Episode {
    config: GameConfig,
    sprites: Sprites,
    course: PipeCourse,
    slots: Vec<BirdSlot>,
    pipes: Vec<Pipe>,
    ground: Ground,
    budget: EpisodeBudget,
    score: u32,
    tick: u64,
}

impl Episode {
    pub fn new(
        config: GameConfig,
        seed: CourseSeed,
        bird_count: usize,
        budget: EpisodeBudget,
    ) -> Result<Self, EpisodeError> {
        config.validate()?;
        let sprites = Sprites::new(&config)?;
        let mut course = PipeCourse::new(seed);
        let first_pipe = Pipe::new(config.first_pipe_x, course.next_gap_top(&config));
        let slots = (0..bird_count).map(|_| BirdSlot::new(&config)).collect();
        let ground = Ground::new(&config);
        Ok(Self {
            config,
            sprites,
            course,
            slots,
            pipes: vec![first_pipe],
            ground,
            budget,
            score: 0,
            tick: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Collision masks, also used by renderers to draw the sprites.
    #[must_use]
    pub fn sprites(&self) -> &Sprites {
        &self.sprites
    }

    #[must_use]
    pub fn seed(&self) -> CourseSeed {
        self.course.seed()
    }

    #[must_use]
    pub fn slots(&self) -> &[BirdSlot] {
        &self.slots
    }

    #[must_use]
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    #[must_use]
    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_alive()).count()
    }

    #[must_use]
    pub fn best_fitness(&self) -> Option<f32> {
        self.slots.iter().map(BirdSlot::fitness).reduce(f32::max)
    }

    #[must_use]
    pub fn state(&self) -> EpisodeState {
        if self.alive_count() == 0 {
            EpisodeState::AllDead
        } else if self.budget.is_exhausted(self.tick, self.score) {
            EpisodeState::BudgetExhausted
        } else {
            EpisodeState::Running
        }
    }

    /// Index of the pipe the birds are heading for.
    ///
    /// Normally the first pipe; the second once the lead bird is past the
    /// first pipe's right edge.
    #[must_use]
    pub fn target_pipe_index(&self) -> usize {
        let lead = self.slots.iter().find(|slot| slot.is_alive());
        match (lead, self.pipes.first()) {
            (Some(lead), Some(first))
                if self.pipes.len() > 1 && lead.bird.x() > first.right(&self.config) =>
            {
                1
            }
            _ => 0,
        }
    }

    /// Observation for bird `index` against the current target pipe.
    #[must_use]
    pub fn observe(&self, index: usize) -> Option<Observation> {
        let slot = self.slots.get(index)?;
        let pipe = self.pipes.get(self.target_pipe_index())?;
        Some(observation(&slot.bird, pipe, &self.config))
    }

    /// Advances the world by one tick.
    ///
    /// Does nothing once every bird is dead. The budget is not checked here;
    /// callers stop when [`state`](Self::state) is no longer running.
    ///
    /// # Panics
    ///
    /// Panics if `controllers.len()` differs from the number of birds.
    pub fn step<C>(&mut self, controllers: &mut [C]) -> TickReport
    where
        C: Controller,
    {
        assert_eq!(
            controllers.len(),
            self.slots.len(),
            "one controller per bird is required"
        );
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };
        if self.alive_count() == 0 {
            return report;
        }
        self.tick += 1;
        report.tick = self.tick;

        self.fly_birds(controllers, &mut report);
        self.update_pipes(&mut report);
        self.remove_out_of_bounds(&mut report);
        self.ground.advance(&self.config);

        report
    }

    fn fly_birds<C>(&mut self, controllers: &mut [C], report: &mut TickReport)
    where
        C: Controller,
    {
        let target = self.target_pipe_index();
        let Some(pipe) = self.pipes.get(target) else {
            return;
        };
        for (slot, controller) in self.slots.iter_mut().zip(controllers) {
            if !slot.is_alive() {
                continue;
            }
            slot.bird.advance(&self.config);
            slot.fitness += SURVIVAL_REWARD;
            slot.survived_ticks += 1;

            let observation = observation(&slot.bird, pipe, &self.config);
            let action = controller.decide(&observation);
            if action == Action::Jump {
                slot.bird.jump(&self.config);
            }
            report.telemetry.push(TelemetryRow::new(&observation, action));
        }
    }

    fn update_pipes(&mut self, report: &mut TickReport) {
        let config = &self.config;
        // pipes are ordered by x, so the off-screen ones lead the list
        let retired = self
            .pipes
            .iter()
            .take_while(|pipe| pipe.is_off_screen(config))
            .count();

        let mut passed = false;
        for pipe in &mut self.pipes {
            for (index, slot) in self.slots.iter_mut().enumerate() {
                if !slot.is_alive() {
                    continue;
                }
                if pipe.collides(&slot.bird, &self.sprites, config) {
                    slot.fitness -= COLLISION_PENALTY;
                    slot.death = Some(DeathCause::Pipe);
                    report.deaths.push((index, DeathCause::Pipe));
                    tracing::trace!(bird = index, tick = self.tick, "bird hit a pipe");
                    continue;
                }
                if !pipe.is_passed() && pipe.x() < slot.bird.x() {
                    pipe.mark_passed();
                    passed = true;
                }
            }
            pipe.advance(config);
        }

        if passed {
            self.score += 1;
            for slot in self.slots.iter_mut().filter(|slot| slot.is_alive()) {
                slot.fitness += PASS_BONUS;
            }
            let gap_top = self.course.next_gap_top(config);
            self.pipes.push(Pipe::new(config.spawn_x, gap_top));
            tracing::debug!(score = self.score, tick = self.tick, "pipe passed");
        }
        report.passed = passed;

        self.pipes.drain(..retired);
    }

    fn remove_out_of_bounds(&mut self, report: &mut TickReport) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_alive() && slot.bird.is_out_of_bounds(&self.config) {
                slot.death = Some(DeathCause::OutOfBounds);
                report.deaths.push((index, DeathCause::OutOfBounds));
                tracing::trace!(bird = index, tick = self.tick, "bird left the screen");
            }
        }
    }
}

fn observation(bird: &Bird, pipe: &Pipe, config: &GameConfig) -> Observation {
    Observation {
        bird_y: bird.y(),
        bird_velocity: bird.velocity(),
        pipe_x: pipe.x(),
        gap_top: pipe.gap_top(),
        gap_bottom: pipe.gap_bottom(config),
    }
}
