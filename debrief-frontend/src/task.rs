use std::{fmt::Display, sync::Arc};

use debrief_history::{
    enrich::{resolve_files, FileLookup},
    fetch::ChunkOptions,
    model::{History, Rating},
    record::{load_history, persist_rating, CallRecordStore},
};
use serde_json::Value;
use tokio::{
    sync::mpsc::{self, Sender},
    task::{JoinHandle, JoinSet},
};
use tokio_util::sync::CancellationToken;

use crate::{
    client::{ActionClient, HttpFileLookup},
    error::AppError,
    event::{Envelope, Message, MessageSource},
    init::record::{get_record_path, FileRecordStore},
    settings::Settings,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Task {
    LoadHistory,
    PersistRating(String, Rating),
    ResolveFiles(Vec<String>),
    Submit(Value),
}

impl Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Task::LoadHistory => write!(f, "LoadHistory"),
            Task::PersistRating(key, rating) => write!(f, "PersistRating({}, {:?})", key, rating),
            Task::ResolveFiles(ids) => write!(f, "ResolveFiles({})", ids.len()),
            Task::Submit(_) => write!(f, "Submit"),
        }
    }
}

/// Everything tasks need to reach the outside world.
pub struct TaskContext {
    pub actions: Option<ActionClient>,
    pub chunk: ChunkOptions,
    pub lookup: Option<Arc<dyn FileLookup>>,
    pub store: Arc<dyn CallRecordStore>,
}

impl TaskContext {
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let path = match &settings.record_path {
            Some(path) => path.clone(),
            None => get_record_path()?,
        };

        let token = settings.api_token.as_deref();
        let lookup: Option<Arc<dyn FileLookup>> = match &settings.api_url {
            Some(url) => Some(Arc::new(HttpFileLookup::new(url, token)?)),
            None => None,
        };

        let actions = match &settings.action_url {
            Some(url) => match settings.action_id.as_deref() {
                Some(action_id) if !action_id.is_empty() => {
                    Some(ActionClient::new(url, action_id, token)?)
                }
                _ => return Err(AppError::MissingActionId),
            },
            None => None,
        };

        tracing::info!("using call record at {:?}", path);

        Ok(Self {
            actions,
            chunk: ChunkOptions {
                chunk_size: settings.chunk_size,
            },
            lookup,
            store: Arc::new(FileRecordStore::new(path)),
        })
    }
}

pub struct TaskManager {
    cancellation: CancellationToken,
    handle: Option<JoinHandle<()>>,
    sender: mpsc::UnboundedSender<Task>,
}

impl TaskManager {
    pub fn new(
        sender: Sender<Envelope>,
        context: TaskContext,
        cancellation: CancellationToken,
    ) -> Self {
        let context = Arc::new(context);
        let token = cancellation.clone();

        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<Task>();
        let handle = tokio::spawn(async move {
            let mut running = JoinSet::new();
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    Some(_) = running.join_next(), if !running.is_empty() => {},
                    task = task_receiver.recv() => {
                        let task = match task {
                            Some(it) => it,
                            None => break,
                        };

                        tracing::debug!("handling task: {}", task);

                        let child_token = token.child_token();
                        let context = context.clone();
                        let sender = sender.clone();
                        running.spawn(async move {
                            let name = task.to_string();
                            let messages = tokio::select! {
                                biased;
                                _ = child_token.cancelled() => None,
                                messages = run_task(&context, task) => Some(messages),
                            };

                            let messages = match messages {
                                Some(it) => it,
                                None => {
                                    tracing::debug!("task cancelled: {}", name);
                                    return;
                                }
                            };

                            if messages.is_empty() || child_token.is_cancelled() {
                                return;
                            }

                            let envelope = Envelope {
                                messages,
                                source: MessageSource::Task,
                            };

                            if let Err(error) = sender.send(envelope).await {
                                tracing::error!("sending result of {} failed: {:?}", name, error);
                            }
                        });
                    }
                }
            }

            running.shutdown().await;
        });

        Self {
            cancellation,
            handle: Some(handle),
            sender: task_sender,
        }
    }

    pub fn run(&self, task: Task) {
        if let Err(error) = self.sender.send(task) {
            tracing::error!("queueing task failed: {}", error.0);
        }
    }

    /// Cancels all running tasks and waits until they are dropped. Results
    /// arriving after cancellation are never sent.
    pub async fn finishing(&mut self) -> Result<(), AppError> {
        self.cancellation.cancel();
        if let Some(handle) = self.handle.take() {
            handle.await?;
        }

        Ok(())
    }
}

async fn run_task(context: &TaskContext, task: Task) -> Vec<Message> {
    match task {
        Task::LoadHistory => match load_history(context.store.as_ref(), None, context.chunk).await {
            Ok(history) => vec![Message::HistoryLoaded(history)],
            Err(error) => {
                tracing::error!("loading presentation history failed: {:?}", error);
                vec![
                    Message::HistoryLoaded(History::default()),
                    Message::Error("Failed to load presentation history".to_string()),
                ]
            }
        },
        Task::PersistRating(key, rating) => {
            let store = context.store.clone();
            let store_key = key.clone();
            let result = tokio::task::spawn_blocking(move || {
                persist_rating(store.as_ref(), &store_key, rating)
            })
            .await;

            match result {
                Ok(Ok(())) => vec![Message::RatingPersisted(key)],
                Ok(Err(error)) => {
                    tracing::error!("persisting rating for {} failed: {:?}", key, error);
                    vec![Message::Error(format!("Failed to save rating for {}", key))]
                }
                Err(error) => {
                    tracing::error!("persisting rating for {} panicked: {:?}", key, error);
                    vec![Message::Error(format!("Failed to save rating for {}", key))]
                }
            }
        }
        Task::ResolveFiles(ids) => {
            let lookup = match &context.lookup {
                Some(it) => it,
                None => return Vec::new(),
            };

            match resolve_files(&ids, lookup.as_ref(), context.chunk).await {
                Ok(files) if files.is_empty() => {
                    tracing::warn!("file lookup returned no metadata for {} ids", ids.len());
                    Vec::new()
                }
                Ok(files) => vec![Message::FilesResolved(files)],
                Err(error) => {
                    tracing::warn!("file lookup failed, keeping history as is: {:?}", error);
                    Vec::new()
                }
            }
        }
        Task::Submit(payload) => {
            let actions = match &context.actions {
                Some(it) => it,
                None => {
                    return vec![Message::SubmitFinished(Err(
                        "No action endpoint configured".to_string(),
                    ))]
                }
            };

            match actions.execute(&payload).await {
                Ok(()) => vec![Message::SubmitFinished(Ok(()))],
                Err(error) => {
                    tracing::error!("submitting postcall failed: {:?}", error);
                    vec![Message::SubmitFinished(Err(error.to_string()))]
                }
            }
        }
    }
}
