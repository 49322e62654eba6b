use crate::{
    action::Action,
    model::{Mode, Model, Status, SubmitState},
    task::Task,
};

pub fn change_mode(model: &mut Model, mode: Mode) -> Vec<Action> {
    tracing::trace!("changing mode from {} to {}", model.mode, mode);

    model.mode = mode;
    Vec::new()
}

pub fn insert_char(model: &mut Model, c: char) -> Vec<Action> {
    model.form.notes.push(c);
    Vec::new()
}

pub fn delete_char(model: &mut Model) -> Vec<Action> {
    model.form.notes.pop();
    Vec::new()
}

pub fn submit(model: &mut Model) -> Vec<Action> {
    if model.submit != SubmitState::Idle {
        return Vec::new();
    }

    if let Err(errors) = model.form.validate() {
        let errors: Vec<_> = errors.iter().map(|error| error.to_string()).collect();
        model.status = Some(Status::Error(errors.join("; ")));
        return Vec::new();
    }

    match model.form.payload(&model.history) {
        Ok(payload) => {
            model.submit = SubmitState::Running;
            model.status = Some(Status::Info("Submitting postcall".to_string()));

            vec![Action::Task(Task::Submit(payload))]
        }
        Err(error) => {
            tracing::error!("building submission failed: {:?}", error);
            model.status = Some(Status::Error(error.to_string()));

            Vec::new()
        }
    }
}

pub fn submitted(model: &mut Model, result: Result<(), String>) -> Vec<Action> {
    match result {
        Ok(()) => {
            model.submit = SubmitState::Submitted;
            vec![Action::Quit]
        }
        Err(error) => {
            model.submit = SubmitState::Idle;
            model.status = Some(Status::Error(format!("Submitting postcall failed: {}", error)));

            Vec::new()
        }
    }
}
