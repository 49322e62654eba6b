use std::collections::HashSet;

use debrief_history::model::{History, HistoryNode};

use crate::form::PostcallForm;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    Insert,
    #[default]
    Navigation,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Insert => write!(f, "insert"),
            Mode::Navigation => write!(f, "navigation"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Status {
    Error(String),
    Info(String),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum SubmitState {
    #[default]
    Idle,
    Running,
    Submitted,
}

/// A visible line of the history list. `page` is the position inside the
/// pages of the node `id`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Row {
    pub id: String,
    pub page: Option<usize>,
}

#[derive(Debug)]
pub struct Model {
    pub cursor: usize,
    pub expanded: HashSet<String>,
    pub form: PostcallForm,
    pub history: History,
    pub loading: bool,
    pub mode: Mode,
    pub status: Option<Status>,
    pub submit: SubmitState,
}

impl Model {
    pub fn new(form: PostcallForm) -> Self {
        Self {
            cursor: 0,
            expanded: HashSet::new(),
            form,
            history: History::default(),
            loading: true,
            mode: Mode::default(),
            status: None,
            submit: SubmitState::default(),
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for node in &self.history.nodes {
            rows.push(Row {
                id: node.id.clone(),
                page: None,
            });

            if !self.expanded.contains(&node.id) {
                continue;
            }

            if let Some(pages) = &node.pages {
                for position in 0..pages.len() {
                    rows.push(Row {
                        id: node.id.clone(),
                        page: Some(position),
                    });
                }
            }
        }

        rows
    }

    pub fn node(&self, row: &Row) -> Option<&HistoryNode> {
        let node = self.history.get(&row.id)?;
        match row.page {
            Some(position) => node.pages.as_ref()?.get(position),
            None => Some(node.as_ref()),
        }
    }

    pub fn selected(&self) -> Option<Row> {
        self.rows().into_iter().nth(self.cursor)
    }

    /// Address of a row as used by history mutations: the id of the top level
    /// node plus the page index for pages. Pages without index are not
    /// addressable.
    pub fn target(&self, row: &Row) -> Option<(String, Option<u32>)> {
        match row.page {
            Some(_) => {
                let page_index = self.node(row)?.page_index?;
                Some((row.id.clone(), Some(page_index)))
            }
            None => Some((row.id.clone(), None)),
        }
    }
}
