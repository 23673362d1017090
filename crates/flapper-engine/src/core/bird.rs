use crate::GameConfig;

/// The player sprite's kinematic state.
///
/// The bird never moves horizontally; the world scrolls past it. Vertical
/// motion restarts from the jump velocity on every [`jump`](Self::jump) and
/// gains `gravity` each tick afterwards, up to `max_fall_speed`:
///
/// ```text
/// velocity(k) = min(launch + gravity * k, max_fall_speed)
/// y += velocity(k) - (rise_boost if velocity(k) < 0)
/// ```
///
/// where `k` is the number of ticks since the last jump and `launch` is the
/// jump velocity (zero before the first jump). Velocity, not displacement,
/// grows linearly from the launch, so the rise after a flap is shorter and
/// gentler than in the classic game; raise `jump_velocity` for a higher arc.
///
/// # Example
///
/// ```
/// use flapper_engine::{Bird, GameConfig};
///
/// let config = GameConfig::default();
/// let mut bird = Bird::new(&config);
/// bird.jump(&config);
/// let dy = bird.advance(&config);
/// assert!(dy < 0.0); // moving up right after a jump
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    x: i32,
    y: f32,
    launch_velocity: f32,
    velocity: f32,
    tilt: f32,
    tick_count: u32,
    jump_height: f32,
    image_count: u32,
}

impl Bird {
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self::at(config.bird_start_x, config.bird_start_y)
    }

    #[must_use]
    pub fn at(x: i32, y: f32) -> Self {
        Self {
            x,
            y,
            launch_velocity: 0.0,
            velocity: 0.0,
            tilt: 0.0,
            tick_count: 0,
            jump_height: y,
            image_count: 0,
        }
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Vertical velocity in pixels per tick (negative is upward).
    #[must_use]
    pub const fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Ticks elapsed since the last jump (or since creation).
    #[must_use]
    pub const fn tick_count(&self) -> u32 {
        self.tick_count
    }

    /// Visual rotation in degrees; positive tilts the beak up.
    #[must_use]
    pub const fn tilt(&self) -> f32 {
        self.tilt
    }

    /// Y coordinate rounded to the pixel grid, as used for mask offsets.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn pixel_y(&self) -> i32 {
        self.y.round() as i32
    }

    pub fn jump(&mut self, config: &GameConfig) {
        self.launch_velocity = config.jump_velocity;
        self.velocity = config.jump_velocity;
        self.tick_count = 0;
        self.jump_height = self.y;
    }

    /// Advances one tick and returns the vertical displacement applied.
    #[expect(clippy::cast_precision_loss)]
    pub fn advance(&mut self, config: &GameConfig) -> f32 {
        self.tick_count += 1;
        self.velocity = f32::min(
            self.launch_velocity + config.gravity * self.tick_count as f32,
            config.max_fall_speed,
        );

        let mut displacement = self.velocity;
        if displacement < 0.0 {
            displacement -= config.rise_boost;
        }
        self.y += displacement;

        if displacement < 0.0 || self.y < self.jump_height + config.tilt_hold_band {
            self.tilt = config.max_tilt;
        } else {
            self.tilt = f32::max(self.tilt - config.tilt_step, config.min_tilt);
        }

        self.image_count = self.image_count.wrapping_add(1);
        displacement
    }

    /// Wing animation frame (0, 1 or 2) for the current tick.
    ///
    /// Frames cycle 0, 1, 2, 1 with `animation_ticks` ticks each. A steep dive
    /// holds the wings level on frame 1.
    #[must_use]
    pub fn flap_frame(&self, config: &GameConfig) -> usize {
        const STEEP_DIVE: f32 = -80.0;
        if self.tilt <= STEEP_DIVE {
            return 1;
        }
        let period = config.animation_ticks.max(1);
        match (self.image_count / period) % 4 {
            0 => 0,
            2 => 2,
            _ => 1,
        }
    }

    /// Returns whether the bird touches the floor or has left the top of the screen.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn is_out_of_bounds(&self, config: &GameConfig) -> bool {
        self.y + config.bird_height as f32 >= config.floor_y as f32 || self.y < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn high_ceiling() -> GameConfig {
        GameConfig {
            floor_y: 1_000_000,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_free_fall_displacement_is_non_decreasing_until_clamped() {
        let config = high_ceiling();
        let mut bird = Bird::new(&config);
        let mut previous = f32::NEG_INFINITY;
        for _ in 0..40 {
            let dy = bird.advance(&config);
            assert!(dy >= previous, "displacement decreased: {previous} -> {dy}");
            assert!(dy <= config.max_fall_speed);
            previous = dy;
        }
        assert_eq!(previous, config.max_fall_speed);
    }

    #[test]
    fn test_displacement_after_jump_is_non_decreasing() {
        let config = high_ceiling();
        let mut bird = Bird::new(&config);
        for _ in 0..7 {
            bird.advance(&config);
        }
        bird.jump(&config);
        let mut previous = f32::NEG_INFINITY;
        for _ in 0..30 {
            let dy = bird.advance(&config);
            assert!(dy >= previous);
            previous = dy;
        }
    }

    #[test]
    fn test_jump_resets_tick_count_and_velocity() {
        let config = high_ceiling();
        for warmup in [0, 1, 3, 12, 40] {
            let mut bird = Bird::new(&config);
            for i in 0..warmup {
                if i % 5 == 4 {
                    bird.jump(&config);
                }
                bird.advance(&config);
            }
            bird.jump(&config);
            assert_eq!(bird.tick_count(), 0);
            assert_eq!(bird.velocity(), config.jump_velocity);
        }
    }

    #[test]
    fn test_jump_moves_bird_up() {
        let config = GameConfig::default();
        let mut bird = Bird::new(&config);
        bird.jump(&config);
        let start = bird.y();
        let dy = bird.advance(&config);
        assert_eq!(dy, config.jump_velocity + config.gravity - config.rise_boost);
        assert!(bird.y() < start);
    }

    #[test]
    fn test_tilt_stays_within_bounds() {
        let config = high_ceiling();
        let mut bird = Bird::new(&config);
        for i in 0..100 {
            if i % 17 == 0 {
                bird.jump(&config);
            }
            bird.advance(&config);
            assert!((config.min_tilt..=config.max_tilt).contains(&bird.tilt()));
        }
    }

    #[test]
    fn test_tilt_noses_down_when_diving() {
        let config = high_ceiling();
        let mut bird = Bird::new(&config);
        for _ in 0..30 {
            bird.advance(&config);
        }
        assert_eq!(bird.tilt(), config.min_tilt);
        assert_eq!(bird.flap_frame(&config), 1);
        bird.jump(&config);
        bird.advance(&config);
        assert_eq!(bird.tilt(), config.max_tilt);
    }

    #[test]
    fn test_flap_frames_cycle() {
        let config = GameConfig {
            animation_ticks: 1,
            ..high_ceiling()
        };
        let mut bird = Bird::new(&config);
        let mut frames = vec![];
        for _ in 0..4 {
            bird.jump(&config);
            bird.advance(&config);
            frames.push(bird.flap_frame(&config));
        }
        assert_eq!(frames, vec![1, 2, 1, 0]);
    }

    #[test]
    fn test_out_of_bounds() {
        let config = GameConfig::default();
        assert!(!Bird::new(&config).is_out_of_bounds(&config));
        assert!(Bird::at(0, -1.0).is_out_of_bounds(&config));
        #[expect(clippy::cast_precision_loss)]
        let touching = (config.floor_y - i32::try_from(config.bird_height).unwrap()) as f32;
        assert!(Bird::at(0, touching).is_out_of_bounds(&config));
        assert!(!Bird::at(0, touching - 1.0).is_out_of_bounds(&config));
    }
}
