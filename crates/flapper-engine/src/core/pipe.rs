use crate::{Bird, GameConfig, mask::Mask};

/// Collision masks for every sprite in the world, built once per episode.
#[derive(Debug, Clone)]
pub struct Sprites {
    pub bird: Mask,
    pub pipe_top: Mask,
    pub pipe_bottom: Mask,
}

impl Sprites {
    pub fn new(config: &GameConfig) -> Result<Self, crate::mask::MaskWidthError> {
        let pipe_bottom = Mask::pipe(config.pipe_width, config.pipe_height)?;
        Ok(Self {
            bird: Mask::bird(config.bird_width, config.bird_height)?,
            pipe_top: pipe_bottom.flipped_vertical(),
            pipe_bottom,
        })
    }
}

/// A pair of pipes with a gap between them.
///
/// `gap_top` is the y coordinate where the top pipe ends; the bottom pipe
/// starts `pipe_gap` pixels lower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipe {
    x: i32,
    gap_top: i32,
    passed: bool,
}

impl Pipe {
    #[must_use]
    pub const fn new(x: i32, gap_top: i32) -> Self {
        Self {
            x,
            gap_top,
            passed: false,
        }
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn gap_top(&self) -> i32 {
        self.gap_top
    }

    #[must_use]
    pub const fn gap_bottom(&self, config: &GameConfig) -> i32 {
        self.gap_top + config.pipe_gap
    }

    /// Y coordinate of the top pipe sprite's upper edge (usually negative).
    #[must_use]
    pub const fn top_sprite_y(&self, config: &GameConfig) -> i32 {
        self.gap_top - config.pipe_height.cast_signed()
    }

    #[must_use]
    pub const fn is_passed(&self) -> bool {
        self.passed
    }

    pub(crate) fn mark_passed(&mut self) {
        self.passed = true;
    }

    /// Right edge in world coordinates.
    #[must_use]
    pub const fn right(&self, config: &GameConfig) -> i32 {
        self.x + config.pipe_width.cast_signed()
    }

    #[must_use]
    pub const fn is_off_screen(&self, config: &GameConfig) -> bool {
        self.right(config) < 0
    }

    pub fn advance(&mut self, config: &GameConfig) {
        self.x -= config.scroll_speed;
    }

    /// Pixel-perfect collision test against either pipe of the pair.
    #[must_use]
    pub fn collides(&self, bird: &Bird, sprites: &Sprites, config: &GameConfig) -> bool {
        let dx = self.x - bird.x();
        let top_offset = (dx, self.top_sprite_y(config) - bird.pixel_y());
        let bottom_offset = (dx, self.gap_bottom(config) - bird.pixel_y());
        sprites.bird.overlaps(&sprites.pipe_bottom, bottom_offset)
            || sprites.bird.overlaps(&sprites.pipe_top, top_offset)
    }
}

/// Two ground segments that leapfrog each other to scroll forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ground {
    x1: i32,
    x2: i32,
}

impl Ground {
    #[must_use]
    pub const fn new(config: &GameConfig) -> Self {
        Self {
            x1: 0,
            x2: config.ground_width,
        }
    }

    /// Left edges of both segments.
    #[must_use]
    pub const fn segments(&self) -> [i32; 2] {
        [self.x1, self.x2]
    }

    pub fn advance(&mut self, config: &GameConfig) {
        let width = config.ground_width;
        self.x1 -= config.scroll_speed;
        self.x2 -= config.scroll_speed;
        if self.x1 + width < 0 {
            self.x1 = self.x2 + width;
        }
        if self.x2 + width < 0 {
            self.x2 = self.x1 + width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bird_at(config: &GameConfig, y: f32) -> Bird {
        Bird::at(config.bird_start_x, y)
    }

    #[test]
    fn test_bird_inside_gap_does_not_collide() {
        let config = GameConfig::default();
        let sprites = Sprites::new(&config).unwrap();
        let pipe = Pipe::new(config.bird_start_x, 300);
        // 200px gap, 48px bird centred in it
        let bird = bird_at(&config, 376.0);
        assert!(!pipe.collides(&bird, &sprites, &config));
    }

    #[test]
    fn test_bird_hits_top_and_bottom_pipe() {
        let config = GameConfig::default();
        let sprites = Sprites::new(&config).unwrap();
        let pipe = Pipe::new(config.bird_start_x, 300);
        assert!(pipe.collides(&bird_at(&config, 280.0), &sprites, &config));
        assert!(pipe.collides(&bird_at(&config, 470.0), &sprites, &config));
    }

    #[test]
    fn test_pipe_far_away_does_not_collide() {
        let config = GameConfig::default();
        let sprites = Sprites::new(&config).unwrap();
        let pipe = Pipe::new(config.bird_start_x + 200, 300);
        assert!(!pipe.collides(&bird_at(&config, 0.0), &sprites, &config));
    }

    #[test]
    fn test_pipe_scrolls_off_screen() {
        let config = GameConfig::default();
        let mut pipe = Pipe::new(0, 100);
        let mut ticks = 0;
        while !pipe.is_off_screen(&config) {
            pipe.advance(&config);
            ticks += 1;
        }
        assert_eq!(pipe.right(&config), -1);
        assert_eq!(ticks, 21);
    }

    #[test]
    fn test_ground_segments_always_tile() {
        let config = GameConfig::default();
        let mut ground = Ground::new(&config);
        for _ in 0..1000 {
            ground.advance(&config);
            let [a, b] = ground.segments();
            assert_eq!((a - b).abs(), config.ground_width);
            let left = a.min(b);
            assert!(left <= 0 && left + 2 * config.ground_width >= config.window_width);
        }
    }
}
