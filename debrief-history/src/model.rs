use std::{collections::BTreeMap, fmt::Display, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationKind {
    Canvas,
    CanvasPage,
    File,
    Page,
    Section,
}

impl Display for PresentationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            PresentationKind::Canvas => "canvas",
            PresentationKind::CanvasPage => "canvas_page",
            PresentationKind::File => "file",
            PresentationKind::Page => "page",
            PresentationKind::Section => "section",
        };
        write!(f, "{}", kind)
    }
}

/// A single entry of the presentation history recorded by the host during the
/// call. For page events `id` names the owning file and `page` the page number.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationEvent {
    #[serde(rename = "type")]
    pub kind: PresentationKind,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_content: Option<String>,
    #[serde(
        default,
        rename = "component_ids",
        skip_serializing_if = "Option::is_none"
    )]
    pub component_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl PresentationEvent {
    pub fn new(kind: PresentationKind, id: &str) -> Self {
        Self {
            kind,
            id: id.to_owned(),
            name: None,
            duration: None,
            time_started: None,
            notes_content: None,
            component_ids: None,
            page: None,
        }
    }

    pub fn file(id: &str) -> Self {
        Self::new(PresentationKind::File, id)
    }

    pub fn page(id: &str, page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::new(PresentationKind::Page, id)
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Rating {
    Negative,
    Neutral,
    Positive,
}

impl TryFrom<i8> for Rating {
    type Error = HistoryError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Rating::Negative),
            0 => Ok(Rating::Neutral),
            1 => Ok(Rating::Positive),
            _ => Err(HistoryError::InvalidRating(value)),
        }
    }
}

impl From<Rating> for i8 {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Negative => -1,
            Rating::Neutral => 0,
            Rating::Positive => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RatingEntry {
    pub rating: Rating,
}

/// Ratings keyed by composite key, as stored in the call record.
pub type RatingTable = BTreeMap<String, RatingEntry>;

/// Deduplication key of a presentation event: `id` or `id/page` for pages.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CompositeKey {
    Item(String),
    Page(String, Option<u32>),
}

impl CompositeKey {
    pub fn of(event: &PresentationEvent) -> Self {
        match event.kind {
            PresentationKind::Page => CompositeKey::Page(event.id.clone(), event.page),
            _ => CompositeKey::Item(event.id.clone()),
        }
    }
}

impl Display for CompositeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompositeKey::Item(id) => write!(f, "{}", id),
            CompositeKey::Page(id, Some(page)) => write!(f, "{}/{}", id, page),
            // NOTE: matches the key the host writes for pages without index
            CompositeKey::Page(id, None) => write!(f, "{}/undefined", id),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FileMetadata {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PresentationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_started: Option<String>,
    #[serde(rename = "component_ids", skip_serializing_if = "Option::is_none")]
    pub component_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<HistoryNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(rename = "content_type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<Arc<FileMetadata>>,
}

impl HistoryNode {
    pub fn new(kind: PresentationKind, id: String) -> Self {
        Self {
            id,
            kind,
            name: None,
            duration: None,
            time_started: None,
            component_ids: None,
            rating: None,
            enabled: true,
            page_index: None,
            pages: None,
            thumbnail: None,
            content_type: None,
            file: None,
        }
    }

    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{} item", self.kind),
        }
    }

    pub fn has_pages(&self) -> bool {
        self.pages.as_ref().is_some_and(|pages| !pages.is_empty())
    }

    pub fn page(&self, page_index: u32) -> Option<&HistoryNode> {
        self.pages
            .as_ref()?
            .iter()
            .find(|page| page.page_index == Some(page_index))
    }

    /// Mean rating of all rated pages, rounded half away from zero. Only used
    /// for display and never written back to the call record.
    pub fn aggregate_rating(&self) -> Option<Rating> {
        let ratings: Vec<i8> = self
            .pages
            .as_ref()?
            .iter()
            .filter_map(|page| page.rating)
            .map(i8::from)
            .collect();

        if ratings.is_empty() {
            return None;
        }

        let sum: f64 = ratings.iter().map(|rating| f64::from(*rating)).sum();
        let mean = sum / ratings.len() as f64;

        Rating::try_from(mean.round() as i8).ok()
    }
}

/// Organized presentation history. Top level nodes are shared, mutations hand
/// out a new history that only replaces the nodes on the changed branch.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct History {
    pub nodes: Vec<Arc<HistoryNode>>,
}

impl History {
    pub fn new(nodes: Vec<HistoryNode>) -> Self {
        Self {
            nodes: nodes.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<HistoryNode>> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Count of nodes with every page counted as its own unit.
    pub fn unit_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| 1 + node.pages.as_ref().map_or(0, |pages| pages.len()))
            .sum()
    }

    /// Count of enabled nodes plus the enabled pages of enabled nodes.
    pub fn enabled_unit_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.enabled)
            .map(|node| {
                let pages = node.pages.as_ref().map_or(0, |pages| {
                    pages.iter().filter(|page| page.enabled).count()
                });
                1 + pages
            })
            .sum()
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    pub(crate) fn replace(&self, position: usize, node: HistoryNode) -> History {
        let mut nodes = self.nodes.clone();
        nodes[position] = Arc::new(node);

        History { nodes }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn page(parent: &str, index: u32, rating: Option<Rating>) -> HistoryNode {
        HistoryNode {
            page_index: Some(index),
            rating,
            ..HistoryNode::new(PresentationKind::Page, format!("{}/{}", parent, index))
        }
    }

    #[test]
    fn rating_serializes_as_integer() {
        let json = serde_json::to_string(&RatingEntry {
            rating: Rating::Negative,
        })
        .expect("serialize");

        assert_eq!(r#"{"rating":-1}"#, json);
    }

    #[test]
    fn rating_rejects_values_out_of_range() {
        let result = serde_json::from_str::<RatingEntry>(r#"{"rating":2}"#);

        assert!(result.is_err());
    }

    #[test]
    fn composite_key_of_page_without_index() {
        let mut event = PresentationEvent::page("f1", 0);
        event.page = None;

        assert_eq!("f1/undefined", CompositeKey::of(&event).to_string());
    }

    #[test]
    fn composite_key_of_non_page_ignores_page_field() {
        let mut event = PresentationEvent::file("f1");
        event.page = Some(3);

        assert_eq!("f1", CompositeKey::of(&event).to_string());
    }

    #[test]
    fn event_deserializes_host_fields() {
        let event: PresentationEvent = serde_json::from_str(
            r#"{
                "type": "canvas_page",
                "id": "c1",
                "timeStarted": "2024-05-01T10:00:00Z",
                "component_ids": ["a", "b"]
            }"#,
        )
        .expect("deserialize");

        assert_eq!(PresentationKind::CanvasPage, event.kind);
        assert_eq!(Some(vec!["a".to_string(), "b".to_string()]), event.component_ids);
        assert_eq!(Some("2024-05-01T10:00:00Z".to_string()), event.time_started);
    }

    #[test]
    fn display_name_falls_back_to_kind() {
        let node = HistoryNode::new(PresentationKind::File, "f1".to_string());

        assert_eq!("file item", node.display_name());
    }

    #[test]
    fn aggregate_rating_rounds_mean_of_rated_pages() {
        let node = HistoryNode {
            pages: Some(vec![
                page("f1", 0, Some(Rating::Positive)),
                page("f1", 1, Some(Rating::Neutral)),
                page("f1", 2, None),
            ]),
            ..HistoryNode::new(PresentationKind::File, "f1".to_string())
        };

        assert_eq!(Some(Rating::Positive), node.aggregate_rating());
    }

    #[test]
    fn aggregate_rating_without_rated_pages() {
        let node = HistoryNode {
            pages: Some(vec![page("f1", 0, None)]),
            ..HistoryNode::new(PresentationKind::File, "f1".to_string())
        };

        assert_eq!(None, node.aggregate_rating());
    }

    #[test]
    fn enabled_unit_count_skips_disabled_nodes_and_pages() {
        let mut disabled_page = page("f1", 1, None);
        disabled_page.enabled = false;

        let mut disabled_section = HistoryNode::new(PresentationKind::Section, "s1".to_string());
        disabled_section.enabled = false;

        let history = History::new(vec![
            disabled_section,
            HistoryNode {
                pages: Some(vec![page("f1", 0, None), disabled_page]),
                ..HistoryNode::new(PresentationKind::File, "f1".to_string())
            },
        ]);

        assert_eq!(2, history.enabled_unit_count());
        assert_eq!(4, history.unit_count());
    }
}
