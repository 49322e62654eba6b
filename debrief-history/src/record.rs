use std::sync::Mutex;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{
    enrich::{enrich, FileLookup},
    error::HistoryError,
    fetch::ChunkOptions,
    model::{History, PresentationEvent, Rating, RatingEntry, RatingTable},
    organize::organize,
};

pub const METADATA_FIELD: &str = "presentationHistoryMetadata";

/// Durable call state shared with the host. Fields besides the presentation
/// history are kept as they are.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub presentation_history: Vec<PresentationEvent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub presentation_history_metadata: RatingTable,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub trait CallRecordStore: Send + Sync {
    /// Returns `None` if no call record exists yet.
    fn load(&self) -> Result<Option<CallRecord>, HistoryError>;

    /// Merges `ratings` into the rating metadata of the record. Other fields
    /// of the record are left untouched.
    fn merge_ratings(&self, ratings: &RatingTable) -> Result<(), HistoryError>;
}

pub fn merge_ratings_into(document: &mut Value, ratings: &RatingTable) -> Result<(), HistoryError> {
    let record = match document.as_object_mut() {
        Some(it) => it,
        None => return Err(HistoryError::InvalidRecord),
    };

    let metadata = record
        .entry(METADATA_FIELD)
        .or_insert_with(|| Value::Object(Map::new()));

    if !metadata.is_object() {
        *metadata = Value::Object(Map::new());
    }

    if let Some(metadata) = metadata.as_object_mut() {
        for (key, entry) in ratings {
            metadata.insert(key.clone(), serde_json::to_value(entry)?);
        }
    }

    Ok(())
}

pub fn persist_rating(
    store: &dyn CallRecordStore,
    key: &str,
    rating: Rating,
) -> Result<(), HistoryError> {
    let mut ratings = RatingTable::new();
    ratings.insert(key.to_owned(), RatingEntry { rating });

    tracing::debug!("persisting rating {:?} for {}", rating, key);

    store.merge_ratings(&ratings)
}

/// Reads the call record, organizes its presentation history and, with a
/// lookup present, enriches the file nodes.
pub async fn load_history(
    store: &dyn CallRecordStore,
    lookup: Option<&dyn FileLookup>,
    options: ChunkOptions,
) -> Result<History, HistoryError> {
    let record = match store.load()? {
        Some(it) => it,
        None => {
            tracing::debug!("no call record found");
            return Ok(History::default());
        }
    };

    let history = organize(
        &record.presentation_history,
        &record.presentation_history_metadata,
    );

    match lookup {
        Some(lookup) => Ok(enrich(history, lookup, options).await),
        None => Ok(history),
    }
}

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    document: Mutex<Option<Value>>,
}

impl MemoryRecordStore {
    pub fn new(document: Value) -> Self {
        Self {
            document: Mutex::new(Some(document)),
        }
    }

    pub fn document(&self) -> Option<Value> {
        self.document.lock().ok().and_then(|document| document.clone())
    }
}

impl CallRecordStore for MemoryRecordStore {
    fn load(&self) -> Result<Option<CallRecord>, HistoryError> {
        let document = self
            .document
            .lock()
            .map_err(|_| HistoryError::RecordPoisoned)?;

        match document.as_ref() {
            Some(document) => Ok(Some(serde_json::from_value(document.clone())?)),
            None => Ok(None),
        }
    }

    fn merge_ratings(&self, ratings: &RatingTable) -> Result<(), HistoryError> {
        let mut document = self
            .document
            .lock()
            .map_err(|_| HistoryError::RecordPoisoned)?;

        let document = document.get_or_insert_with(|| Value::Object(Map::new()));
        merge_ratings_into(document, ratings)
    }
}
