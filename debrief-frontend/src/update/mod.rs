use crate::{
    action::Action,
    event::{Envelope, Message},
    keymap::{self, KeymapMessage},
    model::{Mode, Model, Status},
};

mod form;
mod history;

#[tracing::instrument(skip(model))]
pub fn update(model: &mut Model, envelope: Envelope) -> Vec<Action> {
    envelope
        .messages
        .into_iter()
        .flat_map(|message| update_with_message(model, message))
        .collect()
}

fn update_with_message(model: &mut Model, message: Message) -> Vec<Action> {
    match message {
        Message::Error(error) => {
            model.status = Some(Status::Error(error));
            Vec::new()
        }
        Message::FilesResolved(files) => history::files_resolved(model, files),
        Message::HistoryLoaded(loaded) => history::loaded(model, loaded),
        Message::Key(event) => match keymap::resolve(&model.mode, &event) {
            Some(message) => update_with_keymap(model, message),
            None => Vec::new(),
        },
        Message::RatingPersisted(key) => {
            tracing::trace!("rating persisted for {}", key);
            Vec::new()
        }
        Message::Resize(_, _) => Vec::new(),
        Message::SubmitFinished(result) => form::submitted(model, result),
    }
}

fn update_with_keymap(model: &mut Model, message: KeymapMessage) -> Vec<Action> {
    match message {
        KeymapMessage::Collapse => history::collapse(model),
        KeymapMessage::DeleteChar => form::delete_char(model),
        KeymapMessage::EnterInsert => form::change_mode(model, Mode::Insert),
        KeymapMessage::Expand => history::expand(model),
        KeymapMessage::InsertChar(c) => form::insert_char(model, c),
        KeymapMessage::LeaveInsert => form::change_mode(model, Mode::Navigation),
        KeymapMessage::MoveCursor(direction) => history::move_cursor(model, direction),
        KeymapMessage::Quit => vec![Action::Quit],
        KeymapMessage::Rate(rating) => history::rate(model, rating),
        KeymapMessage::Submit => form::submit(model),
        KeymapMessage::ToggleEnabled => history::toggle(model),
    }
}
