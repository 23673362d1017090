use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{session_display::*, stats_display::*, world_display::*};

mod session_display;
mod stats_display;
mod world_display;

mod color {
    use ratatui::style::Color;

    pub const SKY: Color = Color::Rgb(78, 192, 202);
    pub const PIPE: Color = Color::Rgb(94, 190, 66);
    pub const PIPE_CAP: Color = Color::Rgb(58, 128, 40);
    pub const GROUND: Color = Color::Rgb(222, 216, 149);
    pub const GROUND_STRIPE: Color = Color::Rgb(200, 190, 110);
    pub const BIRD: Color = Color::Rgb(250, 200, 40);
    pub const BIRD_WING: Color = Color::Rgb(240, 130, 30);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::Style;

    use crate::ui::widgets::color;

    pub const DEFAULT: Style = Style::new().fg(color::WHITE).bg(color::BLACK);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
