use std::iter;

use flapper_engine::PlaySession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

pub struct StatsDisplay<'a> {
    session: &'a PlaySession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(session: &'a PlaySession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        18 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&PlaySession) -> String),
    LabelValue(&'static str, &'static dyn Fn(&PlaySession) -> String),
}

fn bird_field(session: &PlaySession, f: impl Fn(&flapper_engine::Bird) -> String) -> String {
    session
        .episode()
        .slots()
        .first()
        .map_or_else(|| "-".to_owned(), |slot| f(slot.bird()))
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|session| session.score().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|session| {
        let dur = session.duration();
        format!(
            "{:0}:{:0>2}.{:0>2}",
            dur.as_secs() / 60,
            dur.as_secs() % 60,
            dur.subsec_millis() / 10
        )
    }),
    Row::Empty,
    Row::LabelValue("BEST:", &|session| session.best_score().to_string()),
    Row::LabelValue("TRY:", &|session| session.attempts().to_string()),
    Row::LabelValue("TICK:", &|session| session.episode().tick().to_string()),
    Row::Empty,
    Row::LabelValue("Y:", &|session| {
        bird_field(session, |bird| format!("{:.0}", bird.y()))
    }),
    Row::LabelValue("VEL:", &|session| {
        bird_field(session, |bird| format!("{:+.1}", bird.velocity()))
    }),
    Row::LabelValue("TILT:", &|session| {
        bird_field(session, |bird| format!("{:+.0}", bird.tilt()))
    }),
    Row::LabelValue("FIT:", &|session| {
        session
            .episode()
            .slots()
            .first()
            .map_or_else(|| "-".to_owned(), |slot| format!("{:.1}", slot.fitness()))
    }),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
