use crate::model::{History, HistoryNode, Rating};

// NOTE: pages are addressed by the id of their parent file and their page
// index, never by their own namespaced id.

/// Flips `enabled` of the addressed node. Toggling a file forces all of its
/// pages to the new state, toggling a page leaves parent and siblings as is.
pub fn toggle_enabled(history: &History, id: &str, page_index: Option<u32>) -> History {
    let position = match history.position(id) {
        Some(it) => it,
        None => {
            tracing::debug!("toggle target not found: {} {:?}", id, page_index);
            return history.clone();
        }
    };

    let mut node = HistoryNode::clone(&history.nodes[position]);
    match page_index {
        None => {
            node.enabled = !node.enabled;
            if let Some(pages) = &mut node.pages {
                for page in pages.iter_mut() {
                    page.enabled = node.enabled;
                }
            }
        }
        Some(index) => match get_page_mut(&mut node, index) {
            Some(page) => page.enabled = !page.enabled,
            None => {
                tracing::debug!("toggle target page not found: {} {}", id, index);
                return history.clone();
            }
        },
    }

    history.replace(position, node)
}

/// Sets the rating of the addressed node. Returns the new history and the
/// composite key the rating has to be persisted under.
pub fn update_rating(
    history: &History,
    id: &str,
    page_index: Option<u32>,
    rating: Rating,
) -> (History, Option<String>) {
    let position = match history.position(id) {
        Some(it) => it,
        None => return (history.clone(), None),
    };

    let mut node = HistoryNode::clone(&history.nodes[position]);
    let key = match page_index {
        None => {
            node.rating = Some(rating);
            node.id.clone()
        }
        Some(index) => match get_page_mut(&mut node, index) {
            Some(page) => {
                page.rating = Some(rating);
                page.id.clone()
            }
            None => return (history.clone(), None),
        },
    };

    (history.replace(position, node), Some(key))
}

fn get_page_mut(node: &mut HistoryNode, page_index: u32) -> Option<&mut HistoryNode> {
    node.pages
        .as_mut()?
        .iter_mut()
        .find(|page| page.page_index == Some(page_index))
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::{
        model::{PresentationEvent, PresentationKind, RatingTable},
        organize::organize,
    };

    use super::*;

    fn history() -> History {
        organize(
            &[
                PresentationEvent::new(PresentationKind::Section, "s1"),
                PresentationEvent::file("f1").with_name("Deck"),
                PresentationEvent::page("f1", 0),
                PresentationEvent::page("f1", 1),
                PresentationEvent::page("f1", 2),
            ],
            &RatingTable::new(),
        )
    }

    fn pages_enabled(history: &History, id: &str) -> Vec<bool> {
        history
            .get(id)
            .and_then(|node| node.pages.as_ref())
            .map(|pages| pages.iter().map(|page| page.enabled).collect())
            .unwrap_or_default()
    }

    #[test]
    fn toggling_file_forces_pages_to_new_state() {
        let history = history();
        let history = toggle_enabled(&history, "f1", Some(1));
        assert_eq!(vec![true, false, true], pages_enabled(&history, "f1"));

        let history = toggle_enabled(&history, "f1", None);

        assert!(!history.get("f1").expect("file").enabled);
        assert_eq!(vec![false, false, false], pages_enabled(&history, "f1"));

        let history = toggle_enabled(&history, "f1", None);

        assert!(history.get("f1").expect("file").enabled);
        assert_eq!(vec![true, true, true], pages_enabled(&history, "f1"));
    }

    #[test]
    fn toggling_page_leaves_parent_and_siblings() {
        let history = toggle_enabled(&history(), "f1", Some(2));

        assert!(history.get("f1").expect("file").enabled);
        assert_eq!(vec![true, true, false], pages_enabled(&history, "f1"));
    }

    #[test]
    fn toggling_replaces_only_changed_branch() {
        let original = history();

        let toggled = toggle_enabled(&original, "f1", Some(0));

        assert!(Arc::ptr_eq(&original.nodes[0], &toggled.nodes[0]));
        assert!(!Arc::ptr_eq(&original.nodes[1], &toggled.nodes[1]));
        assert!(original.nodes[1].enabled);
        assert_eq!(vec![true, true, true], pages_enabled(&original, "f1"));
    }

    #[test]
    fn toggling_unknown_target_keeps_history() {
        let original = history();

        for (id, page_index) in [("unknown", None), ("f1", Some(9)), ("s1", Some(0))] {
            let toggled = toggle_enabled(&original, id, page_index);

            assert_eq!(original, toggled);
            assert!(original
                .nodes
                .iter()
                .zip(toggled.nodes.iter())
                .all(|(left, right)| Arc::ptr_eq(left, right)));
        }
    }

    #[test]
    fn toggling_section_flips_it() {
        let history = toggle_enabled(&history(), "s1", None);

        assert!(!history.get("s1").expect("section").enabled);
    }

    #[test]
    fn rating_page_returns_its_composite_key() {
        let (history, key) = update_rating(&history(), "f1", Some(1), Rating::Negative);

        assert_eq!(Some("f1/1".to_string()), key);

        let file = history.get("f1").expect("file");
        assert_eq!(None, file.rating);
        assert_eq!(Some(Rating::Negative), file.page(1).expect("page").rating);
        assert_eq!(None, file.page(0).expect("page").rating);
    }

    #[test]
    fn rating_file_does_not_touch_pages() {
        let (history, key) = update_rating(&history(), "f1", None, Rating::Positive);

        assert_eq!(Some("f1".to_string()), key);

        let file = history.get("f1").expect("file");
        assert_eq!(Some(Rating::Positive), file.rating);
        assert!(file
            .pages
            .iter()
            .flatten()
            .all(|page| page.rating.is_none()));
    }

    #[test]
    fn rating_unknown_target_returns_no_key() {
        let original = history();

        let (history, key) = update_rating(&original, "f1", Some(7), Rating::Neutral);

        assert_eq!(None, key);
        assert_eq!(original, history);
    }
}
