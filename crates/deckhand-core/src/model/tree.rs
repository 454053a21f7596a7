// ── Button tree ──
//
// The loaded configuration tree plus its lookup and mutation primitives.
// Button ids are globally unique (rejected at load otherwise), so every
// id lookup has exactly one answer; buttonNumber is only meaningful
// within a single level and is resolved by the caller against the level
// slice it is displaying.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::CoreError;
use crate::model::button::ButtonNode;

#[derive(Debug, Deserialize)]
struct ButtonDocument {
    buttons: Vec<ButtonNode>,
}

/// The full configuration tree. An empty (never-loaded) tree is valid and
/// makes every navigation and dispatch operation a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonTree {
    root: Vec<ButtonNode>,
}

impl ButtonTree {
    /// Parse a button document. Valid iff it deserializes to an object
    /// with a top-level `buttons` array and contains no duplicate ids.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let doc: ButtonDocument =
            serde_json::from_str(raw).map_err(|err| CoreError::ConfigInvalid {
                reason: format!("button document: {err}"),
            })?;
        Self::from_nodes(doc.buttons)
    }

    /// Build a tree from already-parsed nodes, enforcing id uniqueness
    /// across the whole tree.
    pub fn from_nodes(nodes: Vec<ButtonNode>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        check_unique_ids(&nodes, &mut seen)?;
        Ok(Self { root: nodes })
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// The buttons of a level: the root when `folder_id` is `None`, else
    /// the named folder's children. `None` when the id is unknown or not
    /// a folder.
    pub fn level(&self, folder_id: Option<&str>) -> Option<&[ButtonNode]> {
        match folder_id {
            None => Some(&self.root),
            Some(id) => self.find(id).and_then(|n| n.buttons.as_deref()),
        }
    }

    /// Depth-first lookup by id anywhere in the tree.
    pub fn find(&self, id: &str) -> Option<&ButtonNode> {
        find_in(&self.root, id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut ButtonNode> {
        find_in_mut(&mut self.root, id)
    }

    /// The chain of folder ids containing the named node, root-first and
    /// excluding the node itself. Empty for a top-level node.
    pub fn path_to(&self, id: &str) -> Option<Vec<String>> {
        let mut path = Vec::new();
        path_in(&self.root, id, &mut path).then_some(path)
    }

    /// Set a button's current state. Applies only when the state is
    /// declared on that button; returns `true` if the button was found.
    pub fn set_current_state(&mut self, id: &str, state: &str) -> bool {
        let Some(node) = self.find_mut(id) else {
            return false;
        };
        if node.has_state(state) {
            node.current_button_state_id = Some(state.to_owned());
        }
        true
    }

    /// Reset every member of a button group, wherever it sits in the
    /// tree, back to its default state.
    pub fn reset_group(&mut self, group: &str) {
        reset_group_in(&mut self.root, group);
    }
}

fn check_unique_ids(nodes: &[ButtonNode], seen: &mut HashSet<String>) -> Result<(), CoreError> {
    for node in nodes {
        if !seen.insert(node.id.clone()) {
            return Err(CoreError::ConfigInvalid {
                reason: format!("duplicate button id '{}'", node.id),
            });
        }
        if let Some(children) = &node.buttons {
            check_unique_ids(children, seen)?;
        }
    }
    Ok(())
}

fn find_in<'a>(nodes: &'a [ButtonNode], id: &str) -> Option<&'a ButtonNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = &node.buttons {
            if let Some(hit) = find_in(children, id) {
                return Some(hit);
            }
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [ButtonNode], id: &str) -> Option<&'a mut ButtonNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = &mut node.buttons {
            if let Some(hit) = find_in_mut(children, id) {
                return Some(hit);
            }
        }
    }
    None
}

fn path_in(nodes: &[ButtonNode], id: &str, path: &mut Vec<String>) -> bool {
    for node in nodes {
        if node.id == id {
            return true;
        }
        if let Some(children) = &node.buttons {
            path.push(node.id.clone());
            if path_in(children, id, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}

fn reset_group_in(nodes: &mut [ButtonNode], group: &str) {
    for node in nodes {
        if node.button_group.as_deref() == Some(group) {
            node.current_button_state_id = Some(node.default_state_id());
        }
        if let Some(children) = &mut node.buttons {
            reset_group_in(children, group);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_tree() -> ButtonTree {
        ButtonTree::from_json(
            r#"{
                "buttons": [
                    {"id": "lampA", "buttonNumber": 0, "buttonGroup": "lamps",
                     "buttonStates": [
                        {"buttonStateID": "default", "buttonImage": "a-off.png"},
                        {"buttonStateID": "toggle", "buttonImage": "a-on.png"}
                     ]},
                    {"id": "cams", "buttonNumber": 1, "name": "Cameras", "buttons": [
                        {"id": "cam1", "buttonNumber": 0},
                        {"id": "wide", "buttonNumber": 1, "buttons": [
                            {"id": "lampB", "buttonNumber": 0, "buttonGroup": "lamps",
                             "buttonStates": [
                                {"buttonStateID": "default"},
                                {"buttonStateID": "toggle"}
                             ]}
                        ]}
                    ]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn missing_buttons_array_is_invalid() {
        let err = ButtonTree::from_json(r#"{"devices": []}"#).unwrap_err();
        assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    }

    #[test]
    fn malformed_json_is_invalid() {
        let err = ButtonTree::from_json("{{").unwrap_err();
        assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    }

    #[test]
    fn duplicate_id_is_invalid_even_across_levels() {
        let err = ButtonTree::from_json(
            r#"{
                "buttons": [
                    {"id": "a", "buttonNumber": 0},
                    {"id": "f", "buttonNumber": 1, "buttons": [{"id": "a", "buttonNumber": 0}]}
                ]
            }"#,
        )
        .unwrap_err();

        match err {
            CoreError::ConfigInvalid { reason } => assert!(reason.contains("duplicate")),
        }
    }

    #[test]
    fn find_descends_into_folders() {
        let tree = sample_tree();
        assert!(tree.find("lampB").is_some());
        assert!(tree.find("ghost").is_none());
    }

    #[test]
    fn level_resolves_root_and_folders() {
        let tree = sample_tree();
        assert_eq!(tree.level(None).unwrap().len(), 2);
        assert_eq!(tree.level(Some("cams")).unwrap().len(), 2);
        // A leaf is not a level.
        assert!(tree.level(Some("cam1")).is_none());
        assert!(tree.level(Some("ghost")).is_none());
    }

    #[test]
    fn path_to_returns_ancestor_chain() {
        let tree = sample_tree();
        assert_eq!(tree.path_to("lampA").unwrap(), Vec::<String>::new());
        assert_eq!(tree.path_to("cam1").unwrap(), vec!["cams".to_owned()]);
        assert_eq!(
            tree.path_to("lampB").unwrap(),
            vec!["cams".to_owned(), "wide".to_owned()]
        );
        assert!(tree.path_to("ghost").is_none());
    }

    #[test]
    fn set_current_state_only_applies_declared_states() {
        let mut tree = sample_tree();

        assert!(tree.set_current_state("lampA", "toggle"));
        assert_eq!(
            tree.find("lampA").unwrap().current_button_state_id.as_deref(),
            Some("toggle")
        );

        // Undeclared state: button found, selector untouched.
        assert!(tree.set_current_state("lampA", "purple"));
        assert_eq!(
            tree.find("lampA").unwrap().current_button_state_id.as_deref(),
            Some("toggle")
        );

        assert!(!tree.set_current_state("ghost", "toggle"));
    }

    #[test]
    fn reset_group_reaches_every_level() {
        let mut tree = sample_tree();
        tree.set_current_state("lampA", "toggle");
        tree.set_current_state("lampB", "toggle");

        tree.reset_group("lamps");

        assert_eq!(
            tree.find("lampA").unwrap().current_button_state_id.as_deref(),
            Some("default")
        );
        assert_eq!(
            tree.find("lampB").unwrap().current_button_state_id.as_deref(),
            Some("default")
        );
    }

    #[test]
    fn empty_tree_is_usable() {
        let tree = ButtonTree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.level(None).unwrap().len(), 0);
        assert!(tree.find("anything").is_none());
    }
}
