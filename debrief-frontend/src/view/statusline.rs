use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::model::{Model, Status};

pub fn view(model: &Model, frame: &mut Frame, rect: Rect) {
    let mode = Line::from(Span::styled(
        format!(" {} ", model.mode),
        Style::default().fg(Color::Black).bg(Color::Gray),
    ));
    let status = get_status_content(model);
    let count = get_count_content(model);

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(mode.width() as u16),
            Constraint::Length(1),
            Constraint::Min(status.width() as u16),
            Constraint::Length(count.width() as u16),
        ])
        .split(rect);

    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Black)),
        rect,
    );

    frame.render_widget(Paragraph::new(mode), layout[0]);
    frame.render_widget(Paragraph::new(status), layout[2]);
    frame.render_widget(Paragraph::new(count), layout[3]);
}

fn get_status_content(model: &Model) -> Line {
    match &model.status {
        Some(Status::Error(message)) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red),
        )),
        Some(Status::Info(message)) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Gray),
        )),
        None => Line::from(Span::styled(
            "space toggle, -/0/+ rate, s submit, q quit",
            Style::default().fg(Color::DarkGray),
        )),
    }
}

fn get_count_content(model: &Model) -> Line {
    let total = model.history.unit_count();
    let presented = model.history.enabled_unit_count();

    Line::from(Span::styled(
        format!("{}/{} presented ", presented, total),
        Style::default().fg(Color::Gray),
    ))
}
