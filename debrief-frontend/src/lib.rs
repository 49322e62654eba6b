use action::Action;
use error::AppError;
use event::Emitter;
use model::{Model, SubmitState};
use settings::Settings;
use task::{Task, TaskContext};
use terminal::TerminalWrapper;
use update::update;
use view::render_model;

mod action;
pub mod client;
pub mod error;
mod event;
pub mod form;
pub mod init;
mod keymap;
mod model;
pub mod settings;
mod task;
mod terminal;
mod update;
mod view;

#[derive(Debug)]
pub struct Outcome {
    pub submitted: bool,
}

pub async fn run(settings: Settings) -> Result<Outcome, AppError> {
    let context = TaskContext::from_settings(&settings)?;

    let mut terminal = TerminalWrapper::start()?;
    let mut emitter = Emitter::start(context);
    emitter.run(Task::LoadHistory);

    let mut model = Model::new(settings.form);
    tracing::debug!("starting with model state: {:?}", model);

    let mut result = Vec::new();
    if let Err(error) = render_model(&mut terminal, &model) {
        result.push(error);
    }

    while result.is_empty() {
        let envelope = match emitter.receiver.recv().await {
            Some(it) => it,
            None => break,
        };

        tracing::trace!("received envelope from {:?}", envelope.source);

        let mut quit = false;
        for action in update(&mut model, envelope) {
            match action {
                Action::Quit => quit = true,
                Action::Task(task) => emitter.run(task),
            }
        }

        if quit {
            break;
        }

        if let Err(error) = render_model(&mut terminal, &model) {
            result.push(error);
        }
    }

    if let Err(error) = emitter.shutdown().await {
        result.push(error);
    }

    if let Err(error) = terminal.shutdown() {
        result.push(error);
    }

    if result.is_empty() {
        Ok(Outcome {
            submitted: model.submit == SubmitState::Submitted,
        })
    } else {
        Err(AppError::Aggregate(result))
    }
}
