use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;

use crate::{
    error::HistoryError,
    fetch::{fetch_in_chunks, ChunkOptions, ChunkResult},
    model::{FileMetadata, History, HistoryNode, PresentationKind},
};

#[async_trait]
pub trait FileLookup: Send + Sync {
    /// Resolves metadata for a comma separated list of file ids.
    async fn get_files(&self, id_in: &str) -> Result<ChunkResult<FileMetadata>, HistoryError>;
}

pub fn file_ids(history: &History) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for node in &history.nodes {
        if node.kind == PresentationKind::File && seen.insert(node.id.clone()) {
            ids.push(node.id.clone());
        }
    }

    ids
}

pub async fn resolve_files(
    ids: &[String],
    lookup: &dyn FileLookup,
    options: ChunkOptions,
) -> Result<Vec<FileMetadata>, HistoryError> {
    fetch_in_chunks(ids, options, |chunk| async move {
        lookup.get_files(&chunk.join(",")).await
    })
    .await
}

/// Attaches thumbnail and content type to every matching file node and stamps
/// the file metadata on its pages. Nodes without a match are shared as is.
pub fn apply_file_metadata(history: &History, files: Vec<FileMetadata>) -> History {
    let files: HashMap<String, Arc<FileMetadata>> = files
        .into_iter()
        .map(|file| (file.id.clone(), Arc::new(file)))
        .collect();

    let nodes = history
        .nodes
        .iter()
        .map(|node| {
            if node.kind != PresentationKind::File {
                return node.clone();
            }

            match files.get(&node.id) {
                Some(file) => Arc::new(with_file_metadata(node, file)),
                None => node.clone(),
            }
        })
        .collect();

    History { nodes }
}

fn with_file_metadata(node: &HistoryNode, file: &Arc<FileMetadata>) -> HistoryNode {
    let mut node = node.clone();
    node.thumbnail = file.thumbnail_url.clone();
    node.content_type = file.content_type.clone();

    if let Some(pages) = &mut node.pages {
        for page in pages.iter_mut() {
            page.file = Some(file.clone());
        }
    }

    node
}

/// Enriches file nodes with their metadata. Failing or empty lookups leave the
/// history untouched.
pub async fn enrich(history: History, lookup: &dyn FileLookup, options: ChunkOptions) -> History {
    let ids = file_ids(&history);
    if ids.is_empty() {
        return history;
    }

    match resolve_files(&ids, lookup, options).await {
        Ok(files) if files.is_empty() => {
            tracing::warn!("file lookup returned no files for {} ids", ids.len());
            history
        }
        Ok(files) => apply_file_metadata(&history, files),
        Err(error) => {
            tracing::warn!("enriching presentation history failed: {:?}", error);
            history
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use crate::{model::PresentationEvent, model::RatingTable, organize::organize};

    use super::*;

    struct StaticLookup {
        files: Vec<FileMetadata>,
        requests: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FileLookup for StaticLookup {
        async fn get_files(&self, id_in: &str) -> Result<ChunkResult<FileMetadata>, HistoryError> {
            self.requests.lock().expect("lock").push(id_in.to_string());

            let ids: Vec<&str> = id_in.split(',').collect();
            let results = self
                .files
                .iter()
                .filter(|file| ids.contains(&file.id.as_str()))
                .cloned()
                .collect();

            Ok(ChunkResult::Wrapped { results })
        }
    }

    struct FailingLookup;

    #[async_trait]
    impl FileLookup for FailingLookup {
        async fn get_files(&self, _: &str) -> Result<ChunkResult<FileMetadata>, HistoryError> {
            Err(HistoryError::LookupFailed("unavailable".to_string()))
        }
    }

    fn metadata(id: &str) -> FileMetadata {
        FileMetadata {
            id: id.to_string(),
            name: None,
            thumbnail_url: Some(format!("https://cdn.example/{}.png", id)),
            content_type: Some("pdf".to_string()),
        }
    }

    fn history() -> History {
        organize(
            &[
                PresentationEvent::new(PresentationKind::Section, "s1"),
                PresentationEvent::file("f1"),
                PresentationEvent::page("f1", 0),
                PresentationEvent::page("f2", 0),
            ],
            &RatingTable::new(),
        )
    }

    #[test]
    fn file_ids_only_contain_files() {
        assert_eq!(vec!["f1", "f2"], file_ids(&history()));
    }

    #[tokio::test]
    async fn enrich_attaches_metadata_to_files_and_pages() {
        let lookup = StaticLookup {
            files: vec![metadata("f1")],
            requests: Mutex::new(Vec::new()),
        };

        let enriched = enrich(history(), &lookup, ChunkOptions::default()).await;

        assert_eq!(vec!["f1,f2"], *lookup.requests.lock().expect("lock"));

        let file = enriched.get("f1").expect("file");
        assert_eq!(Some("https://cdn.example/f1.png".to_string()), file.thumbnail);
        assert_eq!(Some("pdf".to_string()), file.content_type);

        let page = file.page(0).expect("page");
        assert_eq!(Some("f1"), page.file.as_ref().map(|file| file.id.as_str()));

        let unmatched = enriched.get("f2").expect("file");
        assert_eq!(None, unmatched.thumbnail);
    }

    #[tokio::test]
    async fn enrich_shares_untouched_nodes() {
        let original = history();
        let lookup = StaticLookup {
            files: vec![metadata("f1")],
            requests: Mutex::new(Vec::new()),
        };

        let enriched = enrich(original.clone(), &lookup, ChunkOptions::default()).await;

        assert!(Arc::ptr_eq(&original.nodes[0], &enriched.nodes[0]));
        assert!(!Arc::ptr_eq(&original.nodes[1], &enriched.nodes[1]));
        assert!(Arc::ptr_eq(&original.nodes[2], &enriched.nodes[2]));
    }

    #[tokio::test]
    async fn enrich_chunks_lookups() {
        let lookup = StaticLookup {
            files: Vec::new(),
            requests: Mutex::new(Vec::new()),
        };

        let _ = enrich(history(), &lookup, ChunkOptions { chunk_size: 1 }).await;

        let mut requests = lookup.requests.lock().expect("lock").clone();
        requests.sort();
        assert_eq!(vec!["f1", "f2"], requests);
    }

    #[tokio::test]
    async fn failed_lookup_falls_back_to_organized_history() {
        let original = history();

        let enriched = enrich(original.clone(), &FailingLookup, ChunkOptions::default()).await;

        assert_eq!(original, enriched);
    }
}
