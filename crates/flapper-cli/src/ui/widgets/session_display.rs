use flapper_engine::{PlaySession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{StatsDisplay, WorldDisplay, color, style};

/// The world next to a stats panel, with a popup when paused or over.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a PlaySession,
    pilot: &'a str,
    turbo: bool,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a PlaySession, pilot: &'a str) -> Self {
        Self {
            session,
            pilot,
            turbo: false,
        }
    }

    pub fn turbo(self, turbo: bool) -> Self {
        Self { turbo, ..self }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = match self.session.session_state() {
            SessionState::Playing if self.turbo => color::MAGENTA,
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };

        let world = WorldDisplay::new(self.session.episode()).block(
            Block::bordered()
                .title(Line::from(self.pilot.to_uppercase()).centered())
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        let stats = StatsDisplay::new(self.session).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(Padding::horizontal(1))
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let world_width = world.width_for_height(area.height);
        let [world_area, stats_area] = Layout::horizontal([
            Constraint::Length(world_width),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);
        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(stats_area);

        world.render(world_area, buf);
        stats.render(stats_area, buf);

        let banner = match self.session.session_state() {
            SessionState::Playing => return,
            SessionState::Paused => Text::from("PAUSED")
                .style(Style::new().fg(color::BLACK).bg(color::YELLOW)),
            SessionState::GameOver => Text::from(vec![
                Line::from("GAME OVER!!"),
                Line::from(format!("score {}", self.session.score())),
            ])
            .style(Style::new().fg(color::WHITE).bg(color::RED)),
        };
        let banner_height = u16::try_from(banner.height()).unwrap_or(1);
        let banner_area = world_area.centered(
            Constraint::Length(world_area.width),
            Constraint::Length(banner_height + 2),
        );
        Clear.render(banner_area, buf);
        Block::new().style(banner.style).render(banner_area, buf);
        banner.centered().render(
            banner_area.centered_vertically(Constraint::Length(banner_height)),
            buf,
        );
    }
}
