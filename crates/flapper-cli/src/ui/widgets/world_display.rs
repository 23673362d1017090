use flapper_engine::{Episode, GameConfig};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::color;

/// Stripe width of the scrolling ground texture, in world pixels.
const GROUND_STRIPE: i32 = 24;

/// Draws the world with upper-half blocks, two world rows per terminal row.
///
/// The world is sampled at the centre of each half cell, so any terminal
/// size works; a width of 3/2 of the height keeps pixels square.
pub struct WorldDisplay<'a> {
    episode: &'a Episode,
    block: Option<BlockWidget<'a>>,
}

impl<'a> WorldDisplay<'a> {
    pub fn new(episode: &'a Episode) -> Self {
        Self {
            episode,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    /// Width that keeps world pixels square for a given outer height.
    pub fn width_for_height(&self, height: u16) -> u16 {
        let v_margin = super::block_vertical_margin(self.block.as_ref());
        let h_margin = super::block_horizontal_margin(self.block.as_ref());
        let config = self.episode.config();
        let inner_height = u32::from(height.saturating_sub(v_margin));
        let pixels = inner_height * 2;
        let width = pixels * config.window_width.unsigned_abs()
            / config.window_height.unsigned_abs().max(1);
        u16::try_from(width).unwrap_or(u16::MAX).saturating_add(h_margin)
    }

    fn pixel(&self, x: i32, y: i32) -> Color {
        let episode = self.episode;
        let config = episode.config();
        let sprites = episode.sprites();

        for slot in episode.slots().iter().filter(|slot| slot.is_alive()) {
            let bird = slot.bird();
            if let (Ok(dx), Ok(dy)) = (
                u32::try_from(x - bird.x()),
                u32::try_from(y - bird.pixel_y()),
            ) && sprites.bird.get(dx, dy)
            {
                return bird_color(config, bird.flap_frame(config), dy);
            }
        }

        if y >= config.floor_y {
            return ground_color(episode, x);
        }

        for pipe in episode.pipes() {
            let Ok(dx) = u32::try_from(x - pipe.x()) else {
                continue;
            };
            let hit = if y < pipe.gap_top() {
                u32::try_from(y - pipe.top_sprite_y(config))
                    .is_ok_and(|dy| sprites.pipe_top.get(dx, dy))
            } else {
                u32::try_from(y - pipe.gap_bottom(config))
                    .is_ok_and(|dy| sprites.pipe_bottom.get(dx, dy))
            };
            if hit {
                let cap_rows = config.pipe_height / 12;
                let near_gap = (y - pipe.gap_top()).unsigned_abs() < cap_rows
                    || (y - pipe.gap_bottom(config)).unsigned_abs() < cap_rows;
                return if near_gap { color::PIPE_CAP } else { color::PIPE };
            }
        }

        color::SKY
    }
}

fn bird_color(config: &GameConfig, flap_frame: usize, dy: u32) -> Color {
    // the wing band moves up and down with the flap frame
    let band = config.bird_height / 4;
    let wing_top = band + u32::try_from(flap_frame).unwrap_or(0) * band / 2;
    if (wing_top..wing_top + band / 2).contains(&dy) {
        color::BIRD_WING
    } else {
        color::BIRD
    }
}

fn ground_color(episode: &Episode, x: i32) -> Color {
    let [left, _] = episode.ground().segments();
    if (x - left).rem_euclid(2 * GROUND_STRIPE) < GROUND_STRIPE {
        color::GROUND
    } else {
        color::GROUND_STRIPE
    }
}

impl Widget for WorldDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        if area.is_empty() {
            return;
        }

        let config = self.episode.config();
        let pixel_width = i32::from(area.width);
        let pixel_height = i32::from(area.height) * 2;
        // centre of pixel `i` out of `n` spanning `extent` world units
        let sample = |i: i32, n: i32, extent: i32| ((2 * i + 1) * extent) / (2 * n);

        for row in 0..area.height {
            for col in 0..area.width {
                let x = sample(i32::from(col), pixel_width, config.window_width);
                let top_y = sample(i32::from(row) * 2, pixel_height, config.window_height);
                let bottom_y = sample(i32::from(row) * 2 + 1, pixel_height, config.window_height);
                let top = self.pixel(x, top_y);
                let bottom = self.pixel(x, bottom_y);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char('\u{2580}').set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use flapper_engine::{CourseSeed, EpisodeBudget};

    use super::*;

    fn episode() -> Episode {
        Episode::new(
            GameConfig::default(),
            CourseSeed::from_u128(1),
            1,
            EpisodeBudget::UNLIMITED,
        )
        .unwrap()
    }

    #[test]
    fn test_pixel_classification() {
        let episode = episode();
        let display = WorldDisplay::new(&episode);
        let config = episode.config();
        let bird = episode.slots()[0].bird();
        let centre = display.pixel(
            bird.x() + i32::try_from(config.bird_width / 2).unwrap(),
            bird.pixel_y() + i32::try_from(config.bird_height / 2).unwrap(),
        );
        assert!(centre == color::BIRD || centre == color::BIRD_WING);
        assert_eq!(display.pixel(10, 10), color::SKY);
        let ground = display.pixel(10, config.floor_y + 5);
        assert!(ground == color::GROUND || ground == color::GROUND_STRIPE);
    }

    #[test]
    fn test_square_pixels_width() {
        let episode = episode();
        let display = WorldDisplay::new(&episode);
        assert_eq!(display.width_for_height(40), 60);
        let bordered = WorldDisplay::new(&episode).block(BlockWidget::bordered());
        assert_eq!(bordered.width_for_height(42), 62);
    }

    #[test]
    fn test_render_fills_area() {
        let episode = episode();
        let area = Rect::new(0, 0, 30, 20);
        let mut buf = Buffer::empty(area);
        WorldDisplay::new(&episode).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "\u{2580}");
        assert_eq!(buf[(0, 0)].fg, color::SKY);
        assert_eq!(buf[(0, 19)].bg, buf[(0, 19)].fg);
    }
}
