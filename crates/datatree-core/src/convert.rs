//! Folding decoded values into nodes.

use serde::{Deserialize, Serialize};

use crate::container::ContainerNode;
use crate::error::TreeError;
use crate::node::{LiteralNode, Node};
use crate::value::Value;

/// Ordered field names used to name sequence elements.
///
/// A single field name converts into a one-element list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimaryKeys(Vec<String>);

impl PrimaryKeys {
    /// No primary keys: sequence elements are named positionally.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label for the sequence element at `index`.
    ///
    /// The first primary key the element (a mapping) directly contains wins;
    /// otherwise the element is named `id{index}`.
    pub fn element_label(
        &self,
        parent: &str,
        index: usize,
        element: &Value,
    ) -> Result<String, TreeError> {
        for field in self.iter() {
            if let Some(value) = element.get(field) {
                return value.as_text().ok_or_else(|| TreeError::InvalidKey {
                    parent: parent.to_string(),
                    reason: format!("primary key {field:?} of element {index} is not a scalar"),
                });
            }
        }
        Ok(format!("id{index}"))
    }
}

impl From<&str> for PrimaryKeys {
    fn from(key: &str) -> Self {
        Self(vec![key.to_string()])
    }
}

impl From<String> for PrimaryKeys {
    fn from(key: String) -> Self {
        Self(vec![key])
    }
}

impl From<Vec<String>> for PrimaryKeys {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

impl From<&[&str]> for PrimaryKeys {
    fn from(keys: &[&str]) -> Self {
        Self(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PrimaryKeys {
    fn from(keys: [&str; N]) -> Self {
        Self(keys.iter().map(|k| k.to_string()).collect())
    }
}

/// Convert a decoded value into a node named after `name`.
///
/// Mappings and sequences become containers, everything else a literal
/// holding the value's textual form (null leaves the literal without data).
/// Sequence elements are named through `primary_keys`.
///
/// # Errors
///
/// Fails on the first label that cannot become a valid, unique name, and on
/// null or non-scalar mapping keys. No partial tree is returned.
pub fn parse_object(
    name: &str,
    value: &Value,
    primary_keys: impl Into<PrimaryKeys>,
) -> Result<Node, TreeError> {
    convert(name, value, &primary_keys.into())
}

fn convert(name: &str, value: &Value, primary_keys: &PrimaryKeys) -> Result<Node, TreeError> {
    match value {
        Value::Mapping(entries) => {
            let root = ContainerNode::new(name)?;
            for (key, child) in entries {
                let label = key.as_text().ok_or_else(|| TreeError::InvalidKey {
                    parent: name.to_string(),
                    reason: match key {
                        Value::Null => "null key".to_string(),
                        _ => "non-scalar key".to_string(),
                    },
                })?;
                root.add_child(convert(&label, child, primary_keys)?)?;
            }
            Ok(root.into())
        }
        Value::Sequence(elements) => {
            let root = ContainerNode::new(name)?;
            for (index, element) in elements.iter().enumerate() {
                let label = primary_keys.element_label(name, index, element)?;
                root.add_child(convert(&label, element, primary_keys)?)?;
            }
            Ok(root.into())
        }
        scalar => {
            let node = LiteralNode::new(name)?;
            if let Some(text) = scalar.as_text() {
                node.set_data(text);
            }
            Ok(node.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Value)]) -> Value {
        Value::mapping(pairs.iter().map(|(k, v)| (*k, v.clone())))
    }

    fn data(node: &Node, path: &[&str]) -> Option<String> {
        let mut current = node.clone();
        for key in path {
            current = current.child(key).unwrap();
        }
        current.data().unwrap()
    }

    #[test]
    fn test_empty_mapping_is_container() {
        let node = parse_object("root", &Value::Mapping(Vec::new()), PrimaryKeys::none()).unwrap();
        assert!(node.is_container());
        assert!(node.is_empty());
    }

    #[test]
    fn test_multiple_layers() {
        let value = record(&[
            ("a", 1.into()),
            ("b", record(&[("c", 2.into()), ("d", 3.into())])),
        ]);
        let root = parse_object("root", &value, PrimaryKeys::none()).unwrap();

        assert_eq!(root.name().as_str(), "root");
        assert!(root.child("a").unwrap().is_literal());
        assert_eq!(data(&root, &["a"]).as_deref(), Some("1"));
        assert_eq!(data(&root, &["b", "c"]).as_deref(), Some("2"));
        assert_eq!(data(&root, &["b", "d"]).as_deref(), Some("3"));
    }

    #[test]
    fn test_positional_names() {
        let root = parse_object("list", &Value::from(vec![1, 2, 3]), PrimaryKeys::none()).unwrap();
        let names: Vec<_> = root
            .as_container()
            .unwrap()
            .iter()
            .map(|n| n.name().to_string())
            .collect();
        assert_eq!(names, ["id0", "id1", "id2"]);
        assert_eq!(data(&root, &["id2"]).as_deref(), Some("3"));
    }

    #[test]
    fn test_primary_key() {
        let value = Value::Sequence(vec![
            record(&[("slug", "s1".into()), ("content", 1.into())]),
            record(&[("slug", "s2".into()), ("content", 2.into())]),
        ]);
        let root = parse_object("root", &value, "slug").unwrap();

        assert_eq!(data(&root, &["s1", "content"]).as_deref(), Some("1"));
        assert_eq!(data(&root, &["s2", "content"]).as_deref(), Some("2"));
        assert!(root.child("id0").is_err());
    }

    #[test]
    fn test_nested_primary_key() {
        let value = Value::Sequence(vec![
            1.into(),
            2.into(),
            Value::Sequence(vec![
                record(&[("slug", "slug1".into()), ("content", 1.into())]),
                record(&[("slug", "slug2".into()), ("content", 2.into())]),
            ]),
        ]);
        let root = parse_object("root", &value, "slug").unwrap();
        assert_eq!(data(&root, &["id2", "slug1", "content"]).as_deref(), Some("1"));
    }

    #[test]
    fn test_multiple_primary_keys() {
        let value = Value::Sequence(vec![
            record(&[("slug", "slug1".into()), ("content", 1.into())]),
            record(&[("name", "slug2".into()), ("content", 2.into())]),
        ]);
        let root = parse_object("root", &value, ["slug", "name"]).unwrap();
        assert_eq!(data(&root, &["slug1", "content"]).as_deref(), Some("1"));
        assert_eq!(data(&root, &["slug2", "content"]).as_deref(), Some("2"));
    }

    #[test]
    fn test_missing_primary_key_falls_back() {
        let root = parse_object("root", &Value::from(vec![1, 2]), "slug").unwrap();
        assert_eq!(data(&root, &["id0"]).as_deref(), Some("1"));
    }

    #[test]
    fn test_primary_key_is_slugified() {
        let value = Value::Sequence(vec![record(&[
            ("slug", "two words".into()),
            ("content", 1.into()),
        ])]);
        let root = parse_object("root", &value, "slug").unwrap();
        assert_eq!(data(&root, &["two_words", "content"]).as_deref(), Some("1"));
    }

    #[test]
    fn test_scalars() {
        let node = parse_object("root", &"test".into(), PrimaryKeys::none()).unwrap();
        assert!(node.is_literal());
        assert_eq!(node.data().unwrap().as_deref(), Some("test"));

        let node = parse_object("root", &5.into(), PrimaryKeys::none()).unwrap();
        assert_eq!(node.data().unwrap().as_deref(), Some("5"));

        let node = parse_object("root", &Value::Null, PrimaryKeys::none()).unwrap();
        assert_eq!(node.data().unwrap(), None);
        assert!(node.is_empty());
    }

    #[test]
    fn test_null_key_rejected() {
        let value = Value::Mapping(vec![(Value::Null, 1.into())]);
        let err = parse_object("root", &value, PrimaryKeys::none()).unwrap_err();
        assert!(matches!(err, TreeError::InvalidKey { .. }));
    }

    #[test]
    fn test_scalar_keys_are_stringified() {
        let value = Value::Mapping(vec![(Value::Integer(2020), "year".into())]);
        let root = parse_object("root", &value, PrimaryKeys::none()).unwrap();
        assert_eq!(data(&root, &["_2020"]).as_deref(), Some("year"));
    }

    #[test]
    fn test_colliding_keys_rejected() {
        let value = record(&[("Title", 1.into()), ("title", 2.into())]);
        let err = parse_object("root", &value, PrimaryKeys::none()).unwrap_err();
        assert!(matches!(err, TreeError::DuplicateChild { .. }));
    }
}
