use std::future::Future;

use futures::future::try_join_all;
use serde::Deserialize;

pub const DEFAULT_CHUNK_SIZE: usize = 100;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChunkOptions {
    pub chunk_size: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Lookup endpoints answer either with a bare list or with a paginated object
/// wrapping the list in `results`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChunkResult<T> {
    Bare(Vec<T>),
    Wrapped { results: Vec<T> },
}

impl<T> ChunkResult<T> {
    pub fn into_results(self) -> Vec<T> {
        match self {
            ChunkResult::Bare(results) => results,
            ChunkResult::Wrapped { results } => results,
        }
    }
}

impl<T> From<Vec<T>> for ChunkResult<T> {
    fn from(results: Vec<T>) -> Self {
        ChunkResult::Bare(results)
    }
}

/// Splits `ids` into chunks of at most `chunk_size` and fetches all chunks
/// concurrently. Results are concatenated in chunk order, the first failing
/// chunk fails the whole fetch.
pub async fn fetch_in_chunks<I, T, E, F, Fut>(
    ids: &[I],
    options: ChunkOptions,
    fetch: F,
) -> Result<Vec<T>, E>
where
    I: Clone,
    F: Fn(Vec<I>) -> Fut,
    Fut: Future<Output = Result<ChunkResult<T>, E>>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let chunk_size = options.chunk_size.max(1);
    let requests = ids.chunks(chunk_size).map(|chunk| fetch(chunk.to_vec()));

    tracing::debug!("fetching {} ids in chunks of {}", ids.len(), chunk_size);

    let responses = try_join_all(requests).await?;

    Ok(responses
        .into_iter()
        .flat_map(ChunkResult::into_results)
        .collect())
}
