use std::collections::{HashMap, HashSet};

use crate::model::{
    CompositeKey, History, HistoryNode, PresentationEvent, PresentationKind, Rating, RatingTable,
};

/// Reshapes the flat presentation history into top level nodes and files
/// owning their pages. The first occurrence of a composite key wins, later
/// events with the same key are dropped. Files are emitted after all other
/// nodes, in the order their id was first seen.
#[tracing::instrument(skip_all, fields(events = events.len()))]
pub fn organize(events: &[PresentationEvent], ratings: &RatingTable) -> History {
    let mut processed = HashSet::new();
    let mut files = FileNodes::default();
    let mut nodes = Vec::new();

    for event in events {
        let key = CompositeKey::of(event);
        if !processed.insert(key.clone()) {
            tracing::trace!("skipping already processed event: {}", key);
            continue;
        }

        match event.kind {
            PresentationKind::File => {
                let (file, _) = files.get_or_insert(&event.id, ratings);
                merge_file_event(file, event);
            }
            PresentationKind::Page => {
                let (file, created) = files.get_or_insert(&event.id, ratings);
                if created {
                    file.name = event.name.clone();
                }
                add_page(file, event, &key, ratings);
            }
            PresentationKind::Canvas | PresentationKind::CanvasPage | PresentationKind::Section => {
                nodes.push(create_node(event, &key, ratings));
            }
        }
    }

    nodes.extend(files.into_nodes());

    History::new(nodes)
}

#[derive(Default)]
struct FileNodes {
    nodes: Vec<HistoryNode>,
    positions: HashMap<String, usize>,
}

impl FileNodes {
    fn get_or_insert(&mut self, id: &str, ratings: &RatingTable) -> (&mut HistoryNode, bool) {
        let (position, created) = match self.positions.get(id).copied() {
            Some(position) => (position, false),
            None => {
                let key = CompositeKey::Item(id.to_owned());
                let node = HistoryNode {
                    rating: get_rating(ratings, &key),
                    pages: Some(Vec::new()),
                    ..HistoryNode::new(PresentationKind::File, id.to_owned())
                };

                self.nodes.push(node);
                self.positions.insert(id.to_owned(), self.nodes.len() - 1);

                (self.nodes.len() - 1, true)
            }
        };

        (&mut self.nodes[position], created)
    }

    fn into_nodes(self) -> Vec<HistoryNode> {
        self.nodes
    }
}

fn merge_file_event(file: &mut HistoryNode, event: &PresentationEvent) {
    if file.name.is_none() {
        file.name = event.name.clone();
    }
    if file.duration.is_none() {
        file.duration = event.duration;
    }
    if file.time_started.is_none() {
        file.time_started = event.time_started.clone();
    }
}

fn add_page(
    file: &mut HistoryNode,
    event: &PresentationEvent,
    key: &CompositeKey,
    ratings: &RatingTable,
) {
    let id = key.to_string();
    let pages = file.pages.get_or_insert_with(Vec::new);
    if pages.iter().any(|page| page.id == id) {
        return;
    }

    pages.push(HistoryNode {
        page_index: event.page,
        ..create_node(event, key, ratings)
    });
}

fn create_node(
    event: &PresentationEvent,
    key: &CompositeKey,
    ratings: &RatingTable,
) -> HistoryNode {
    HistoryNode {
        name: event.name.clone(),
        duration: event.duration,
        time_started: event.time_started.clone(),
        component_ids: event.component_ids.clone(),
        rating: get_rating(ratings, key),
        ..HistoryNode::new(event.kind, key.to_string())
    }
}

fn get_rating(ratings: &RatingTable, key: &CompositeKey) -> Option<Rating> {
    ratings.get(&key.to_string()).map(|entry| entry.rating)
}
