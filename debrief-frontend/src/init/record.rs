use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use debrief_history::{
    error::HistoryError,
    model::RatingTable,
    record::{merge_ratings_into, CallRecord, CallRecordStore},
};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::AppError;

/// Call record kept as json document on disk. Read-modify-write cycles are
/// serialized and the document is replaced atomically by renaming a temp file
/// next to it.
pub struct FileRecordStore {
    lock: Mutex<()>,
    path: PathBuf,
}

impl FileRecordStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            lock: Mutex::new(()),
            path,
        }
    }

    fn read_document(&self) -> Result<Option<Value>, HistoryError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn write_document(&self, document: &Value) -> Result<(), HistoryError> {
        let directory = match self.path.parent() {
            Some(it) if !it.as_os_str().is_empty() => it,
            _ => Path::new("."),
        };
        fs::create_dir_all(directory)?;

        let mut file = NamedTempFile::new_in(directory)?;
        serde_json::to_writer_pretty(&mut file, document)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|error| error.error)?;

        Ok(())
    }
}

impl CallRecordStore for FileRecordStore {
    fn load(&self) -> Result<Option<CallRecord>, HistoryError> {
        let _guard = self.lock.lock().map_err(|_| HistoryError::RecordPoisoned)?;

        match self.read_document()? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    fn merge_ratings(&self, ratings: &RatingTable) -> Result<(), HistoryError> {
        let _guard = self.lock.lock().map_err(|_| HistoryError::RecordPoisoned)?;

        let mut document = self
            .read_document()?
            .unwrap_or_else(|| Value::Object(Map::new()));

        merge_ratings_into(&mut document, ratings)?;

        self.write_document(&document)
    }
}

pub fn get_record_path() -> Result<PathBuf, AppError> {
    match dirs::data_dir() {
        Some(data_dir) => Ok(data_dir.join("debrief").join("call.json")),
        None => Err(AppError::RecordPathNotResolved),
    }
}
