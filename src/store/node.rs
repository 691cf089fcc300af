//! Key tree shared by the bundled backends

use crate::value::RegValue;
use serde::{Deserialize, Serialize};

/// One key and everything below it
///
/// Children and values are kept in creation order, which is the
/// enumeration order both bundled stores report. Lookups are ASCII
/// case-insensitive and the first spelling used is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct KeyNode {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    keys: Vec<NamedKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values: Vec<NamedValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct NamedKey {
    name: String,
    #[serde(flatten)]
    node: KeyNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct NamedValue {
    name: String,
    value: RegValue,
}

impl KeyNode {
    pub fn find(&self, path: &[String]) -> Option<&KeyNode> {
        path.iter().try_fold(self, |node, segment| node.child(segment))
    }

    pub fn find_mut(&mut self, path: &[String]) -> Option<&mut KeyNode> {
        let mut node = self;
        for segment in path {
            node = node.child_mut(segment)?;
        }
        Some(node)
    }

    /// Walk to `path`, creating missing keys; returns whether anything was created
    pub fn find_or_create(&mut self, path: &[String]) -> (&mut KeyNode, bool) {
        let mut node = self;
        let mut created = false;
        for segment in path {
            let index = match node.keys.iter().position(|k| k.name.eq_ignore_ascii_case(segment)) {
                Some(index) => index,
                None => {
                    node.keys.push(NamedKey {
                        name: segment.clone(),
                        node: KeyNode::default(),
                    });
                    created = true;
                    node.keys.len() - 1
                }
            };
            node = &mut node.keys[index].node;
        }
        (node, created)
    }

    /// Remove the key at `path` with its subtree; `false` if it was not there
    pub fn remove(&mut self, path: &[String]) -> bool {
        let Some((last, parent_path)) = path.split_last() else {
            return false;
        };
        let Some(parent) = self.find_mut(parent_path) else {
            return false;
        };
        let before = parent.keys.len();
        parent.keys.retain(|k| !k.name.eq_ignore_ascii_case(last));
        parent.keys.len() != before
    }

    pub fn subkey_names(&self) -> Vec<String> {
        self.keys.iter().map(|k| k.name.clone()).collect()
    }

    pub fn value_names(&self) -> Vec<String> {
        self.values.iter().map(|v| v.name.clone()).collect()
    }

    pub fn value(&self, name: &str) -> Option<&RegValue> {
        self.values
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .map(|v| &v.value)
    }

    /// Insert or overwrite; an overwritten value keeps its position
    pub fn set_value(&mut self, name: &str, value: RegValue) {
        match self.values.iter_mut().find(|v| v.name.eq_ignore_ascii_case(name)) {
            Some(existing) => existing.value = value,
            None => self.values.push(NamedValue {
                name: name.to_string(),
                value,
            }),
        }
    }

    fn child(&self, name: &str) -> Option<&KeyNode> {
        self.keys
            .iter()
            .find(|k| k.name.eq_ignore_ascii_case(name))
            .map(|k| &k.node)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut KeyNode> {
        self.keys
            .iter_mut()
            .find(|k| k.name.eq_ignore_ascii_case(name))
            .map(|k| &mut k.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_create_and_find() {
        let mut root = KeyNode::default();
        let (_, created) = root.find_or_create(&path(&["Software", "Vendor"]));
        assert!(created);

        let (_, created) = root.find_or_create(&path(&["software", "VENDOR"]));
        assert!(!created);

        assert!(root.find(&path(&["SOFTWARE", "vendor"])).is_some());
        assert!(root.find(&path(&["Software", "Other"])).is_none());
        assert_eq!(root.subkey_names(), vec!["Software"]);
    }

    #[test]
    fn test_enumeration_is_creation_order() {
        let mut root = KeyNode::default();
        for name in ["Zeta", "Alpha", "Mid"] {
            root.find_or_create(&path(&[name]));
            root.set_value(name, RegValue::Dword(1));
        }
        assert_eq!(root.subkey_names(), vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(root.value_names(), vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_overwrite_replaces_type_in_place() {
        let mut node = KeyNode::default();
        node.set_value("A", RegValue::Dword(1));
        node.set_value("B", RegValue::Dword(2));
        node.set_value("a", RegValue::String("one".into()));

        assert_eq!(node.value_names(), vec!["A", "B"]);
        assert_eq!(node.value("A"), Some(&RegValue::String("one".into())));
    }

    #[test]
    fn test_remove_subtree() {
        let mut root = KeyNode::default();
        root.find_or_create(&path(&["a", "b", "c"]));

        assert!(root.remove(&path(&["A", "b"])));
        assert!(root.find(&path(&["a", "b"])).is_none());
        assert!(root.find(&path(&["a"])).is_some());
        assert!(!root.remove(&path(&["a", "b"])));
        assert!(!root.remove(&[]));
    }

    #[test]
    fn test_document_shape() {
        let mut root = KeyNode::default();
        let (key, _) = root.find_or_create(&path(&["Key1"]));
        key.set_value("Value1", RegValue::Dword(1));

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "keys": [
                    {
                        "name": "Key1",
                        "values": [{"name": "Value1", "value": {"type": "dword", "data": 1}}]
                    }
                ]
            })
        );

        let back: KeyNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, root);
    }
}
