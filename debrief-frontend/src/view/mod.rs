use ratatui::{
    prelude::{Constraint, Direction, Layout},
    Frame,
};

use crate::{error::AppError, model::Model, terminal::TerminalWrapper};

mod history;
mod notes;
mod statusline;

pub fn render_model(terminal: &mut TerminalWrapper, model: &Model) -> Result<(), AppError> {
    terminal.draw(|frame| view(model, frame))
}

fn view(model: &Model, frame: &mut Frame) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.area());

    history::view(model, frame, layout[0]);
    notes::view(model, frame, layout[1]);
    statusline::view(model, frame, layout[2]);
}
