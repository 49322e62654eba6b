use debrief_history::{
    enrich::{apply_file_metadata, file_ids},
    model::{FileMetadata, History, Rating},
    update::{toggle_enabled, update_rating},
};

use crate::{action::Action, keymap::CursorDirection, model::Model, task::Task};

pub fn loaded(model: &mut Model, history: History) -> Vec<Action> {
    model.history = history;
    model.loading = false;
    model
        .expanded
        .retain(|id| model.history.get(id).is_some_and(|node| node.has_pages()));
    clamp_cursor(model);

    let ids = file_ids(&model.history);
    if ids.is_empty() {
        Vec::new()
    } else {
        vec![Action::Task(Task::ResolveFiles(ids))]
    }
}

/// Metadata is applied to the current history, edits made while the lookup
/// was running stay untouched.
pub fn files_resolved(model: &mut Model, files: Vec<FileMetadata>) -> Vec<Action> {
    model.history = apply_file_metadata(&model.history, files);
    Vec::new()
}

pub fn move_cursor(model: &mut Model, direction: CursorDirection) -> Vec<Action> {
    let count = model.rows().len();
    model.cursor = match direction {
        CursorDirection::Down if model.cursor + 1 < count => model.cursor + 1,
        CursorDirection::Down => model.cursor,
        CursorDirection::Up => model.cursor.saturating_sub(1),
    };

    Vec::new()
}

pub fn expand(model: &mut Model) -> Vec<Action> {
    let row = match model.selected() {
        Some(it) if it.page.is_none() => it,
        _ => return Vec::new(),
    };

    if model
        .history
        .get(&row.id)
        .is_some_and(|node| node.has_pages())
    {
        model.expanded.insert(row.id);
    }

    Vec::new()
}

pub fn collapse(model: &mut Model) -> Vec<Action> {
    let row = match model.selected() {
        Some(it) => it,
        None => return Vec::new(),
    };

    model.expanded.remove(&row.id);
    if let Some(position) = model
        .rows()
        .iter()
        .position(|it| it.id == row.id && it.page.is_none())
    {
        model.cursor = position;
    }

    Vec::new()
}

pub fn toggle(model: &mut Model) -> Vec<Action> {
    let (id, page_index) = match model.selected().and_then(|row| model.target(&row)) {
        Some(it) => it,
        None => return Vec::new(),
    };

    model.history = toggle_enabled(&model.history, &id, page_index);

    Vec::new()
}

pub fn rate(model: &mut Model, rating: Rating) -> Vec<Action> {
    let row = match model.selected() {
        Some(it) => it,
        None => return Vec::new(),
    };

    if !model.node(&row).is_some_and(|node| node.enabled) {
        tracing::debug!("ignoring rating of disabled item {}", row.id);
        return Vec::new();
    }

    let (id, page_index) = match model.target(&row) {
        Some(it) => it,
        None => return Vec::new(),
    };

    let (history, key) = update_rating(&model.history, &id, page_index, rating);
    model.history = history;

    match key {
        Some(key) => vec![Action::Task(Task::PersistRating(key, rating))],
        None => Vec::new(),
    }
}

fn clamp_cursor(model: &mut Model) {
    let count = model.rows().len();
    if model.cursor >= count {
        model.cursor = count.saturating_sub(1);
    }
}
