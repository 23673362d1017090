use serde::{Deserialize, Serialize};

/// World geometry and physics constants.
///
/// Every field has a default matching the classic game tuned for a 600x800
/// window at 30 ticks per second. All distances are in pixels and all
/// velocities in pixels per tick.
///
/// # Example
///
/// ```
/// use flapper_engine::GameConfig;
///
/// let config = GameConfig::default();
/// assert_eq!(config.pipe_gap, 200);
/// assert!(config.jump_velocity < 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_width: i32,
    pub window_height: i32,
    /// Y coordinate of the ground surface; a bird whose bottom reaches it dies.
    pub floor_y: i32,
    pub bird_start_x: i32,
    pub bird_start_y: f32,
    /// Velocity set by a jump (negative is upward).
    pub jump_velocity: f32,
    /// Velocity gained per tick since the last jump.
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Additional upward displacement applied on ticks where the bird rises.
    pub rise_boost: f32,
    pub max_tilt: f32,
    pub tilt_step: f32,
    pub min_tilt: f32,
    /// While the bird is less than this far below its jump height it keeps
    /// its nose up.
    pub tilt_hold_band: f32,
    /// Ticks each flap animation frame stays on screen.
    pub animation_ticks: u32,
    pub pipe_gap: i32,
    pub scroll_speed: i32,
    /// Gap top is drawn uniformly from `gap_top_min..gap_top_max`.
    pub gap_top_min: i32,
    pub gap_top_max: i32,
    pub first_pipe_x: i32,
    pub spawn_x: i32,
    pub tick_rate: u32,
    pub bird_width: u32,
    pub bird_height: u32,
    pub pipe_width: u32,
    pub pipe_height: u32,
    pub ground_width: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 600,
            window_height: 800,
            floor_y: 730,
            bird_start_x: 230,
            bird_start_y: 350.0,
            jump_velocity: -10.5,
            gravity: 1.5,
            max_fall_speed: 16.0,
            rise_boost: 2.0,
            max_tilt: 25.0,
            tilt_step: 20.0,
            min_tilt: -90.0,
            tilt_hold_band: 50.0,
            animation_ticks: 5,
            pipe_gap: 200,
            scroll_speed: 5,
            gap_top_min: 50,
            gap_top_max: 450,
            first_pipe_x: 700,
            spawn_x: 600,
            tick_rate: 30,
            bird_width: 68,
            bird_height: 48,
            pipe_width: 104,
            pipe_height: 640,
            ground_width: 672,
        }
    }
}

impl GameConfig {
    /// Checks relations between fields that the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gap_top_min >= self.gap_top_max {
            return Err(ConfigError::EmptyGapRange);
        }
        if self.gravity <= 0.0 || self.max_fall_speed <= 0.0 {
            return Err(ConfigError::NonPositiveGravity);
        }
        if self.jump_velocity >= 0.0 {
            return Err(ConfigError::DownwardJump);
        }
        if self.scroll_speed <= 0 || self.ground_width <= 0 {
            return Err(ConfigError::NonPositiveScroll);
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("gap top range is empty")]
    EmptyGapRange,
    #[display("gravity and max fall speed must be positive")]
    NonPositiveGravity,
    #[display("jump velocity must be negative (upward)")]
    DownwardJump,
    #[display("scroll speed and ground width must be positive")]
    NonPositiveScroll,
    #[display("tick rate must be non-zero")]
    ZeroTickRate,
}
