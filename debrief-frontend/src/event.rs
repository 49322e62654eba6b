use crossterm::event::{KeyEvent, KeyEventKind};
use debrief_history::model::{FileMetadata, History};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc::{self, Receiver};
use tokio_util::sync::CancellationToken;

use crate::{
    error::AppError,
    task::{Task, TaskContext, TaskManager},
};

#[derive(Debug)]
pub struct Envelope {
    pub messages: Vec<Message>,
    pub source: MessageSource,
}

#[derive(Debug, Eq, PartialEq)]
pub enum MessageSource {
    Task,
    User,
}

#[derive(Debug)]
pub enum Message {
    Error(String),
    FilesResolved(Vec<FileMetadata>),
    HistoryLoaded(History),
    Key(KeyEvent),
    RatingPersisted(String),
    Resize(u16, u16),
    SubmitFinished(Result<(), String>),
}

pub struct Emitter {
    cancellation: CancellationToken,
    tasks: TaskManager,
    pub receiver: Receiver<Envelope>,
}

impl Emitter {
    pub fn start(context: TaskContext) -> Self {
        let (sender, receiver) = mpsc::channel(16);
        let cancellation = CancellationToken::new();

        let tasks = TaskManager::new(sender.clone(), context, cancellation.child_token());
        start_crossterm_listener(cancellation.child_token(), sender);

        Self {
            cancellation,
            tasks,
            receiver,
        }
    }

    pub fn run(&mut self, task: Task) {
        self.tasks.run(task);
    }

    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.cancellation.cancel();
        self.tasks.finishing().await
    }
}

fn start_crossterm_listener(cancellation: CancellationToken, sender: mpsc::Sender<Envelope>) {
    tokio::spawn(async move {
        let mut reader = crossterm::event::EventStream::new();

        loop {
            let crossterm_event = reader.next().fuse();

            tokio::select! {
                _ = cancellation.cancelled() => break,
                Some(Ok(event)) = crossterm_event => {
                    if let Some(envelope) = handle_crossterm_event(event) {
                        if let Err(error) = sender.send(envelope).await {
                            tracing::error!("sending user input failed: {:?}", error);
                            break;
                        }
                    }
                }
            }
        }
    });
}

fn handle_crossterm_event(event: crossterm::event::Event) -> Option<Envelope> {
    match event {
        crossterm::event::Event::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return None;
            }

            Some(Envelope {
                messages: vec![Message::Key(key)],
                source: MessageSource::User,
            })
        }
        crossterm::event::Event::Resize(x, y) => Some(Envelope {
            messages: vec![Message::Resize(x, y)],
            source: MessageSource::User,
        }),
        crossterm::event::Event::FocusLost
        | crossterm::event::Event::FocusGained
        | crossterm::event::Event::Paste(_)
        | crossterm::event::Event::Mouse(_) => None,
    }
}
