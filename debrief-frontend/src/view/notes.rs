use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::model::{Mode, Model};

pub fn view(model: &Model, frame: &mut Frame, rect: Rect) {
    let (title, style) = match model.mode {
        Mode::Insert => (" Notes (esc to leave) ", Style::default().fg(Color::Yellow)),
        Mode::Navigation => (" Notes (i to edit) ", Style::default()),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    let paragraph = Paragraph::new(model.form.notes.as_str())
        .wrap(Wrap { trim: false })
        .block(block);

    frame.render_widget(paragraph, rect);
}
