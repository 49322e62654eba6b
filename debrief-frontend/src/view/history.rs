use debrief_history::model::{HistoryNode, PresentationKind, Rating};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::model::{Model, Row};

const EMPTY_HISTORY: &str = "Nothing was presented. Maybe cancel or resume the call?";

pub fn view(model: &Model, frame: &mut Frame, rect: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title(model)));

    if model.loading {
        let paragraph = Paragraph::new("Loading presentation history").block(block);
        frame.render_widget(paragraph, rect);
        return;
    }

    if model.history.is_empty() {
        let paragraph = Paragraph::new(EMPTY_HISTORY)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(paragraph, rect);
        return;
    }

    let items: Vec<_> = model
        .rows()
        .iter()
        .filter_map(|row| model.node(row).map(|node| ListItem::new(line(row, node))))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default().with_selected(Some(model.cursor));
    frame.render_stateful_widget(list, rect, &mut state);
}

fn title(model: &Model) -> String {
    if model.form.meeting_name.is_empty() {
        "Presented content".to_owned()
    } else {
        model.form.meeting_name.clone()
    }
}

fn line(row: &Row, node: &HistoryNode) -> Line<'static> {
    let style = if node.enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = Vec::new();
    if row.page.is_some() {
        spans.push(Span::raw("    "));
    }

    let marker = if node.enabled { "[x] " } else { "[ ] " };
    spans.push(Span::styled(marker, style));
    spans.push(Span::styled(name(node), style));
    spans.push(Span::styled(
        format!(" {}", node.kind),
        Style::default().fg(Color::DarkGray),
    ));

    if node.thumbnail.is_some() {
        spans.push(Span::styled(" ▣", Style::default().fg(Color::DarkGray)));
    }

    if let Some(content_type) = &node.content_type {
        spans.push(Span::styled(
            format!(" ({})", content_type),
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans.push(Span::raw(" "));
    spans.push(rating(node.rating, node.enabled));

    if let Some(aggregate) = node.aggregate_rating() {
        spans.push(Span::styled(
            format!(" pages {}", glyph(aggregate)),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

fn name(node: &HistoryNode) -> String {
    match (node.kind, node.page_index, &node.name) {
        (PresentationKind::Page, Some(index), Some(name)) => format!("Page {} {}", index + 1, name),
        (PresentationKind::Page, Some(index), None) => format!("Page {}", index + 1),
        _ => node.display_name(),
    }
}

fn rating(rating: Option<Rating>, enabled: bool) -> Span<'static> {
    let rating = match rating {
        Some(it) => it,
        None => return Span::styled("  ", Style::default()),
    };

    let color = match (enabled, rating) {
        (false, _) => Color::DarkGray,
        (true, Rating::Negative) => Color::Red,
        (true, Rating::Neutral) => Color::Yellow,
        (true, Rating::Positive) => Color::Green,
    };

    Span::styled(glyph(rating), Style::default().fg(color))
}

fn glyph(rating: Rating) -> &'static str {
    match rating {
        Rating::Negative => ":(",
        Rating::Neutral => ":|",
        Rating::Positive => ":)",
    }
}
