//! Container nodes: named, ordered children.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use compact_str::CompactString;
use parking_lot::RwLock;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::TreeError;
use crate::node::{Addressable, Metadata, Node, NodeCore};

#[derive(Debug, Default)]
struct Children {
    by_name: HashMap<CompactString, Node>,
    /// Iteration order. Always a permutation of the keys of `by_name`.
    ordering: Vec<CompactString>,
}

#[derive(Debug)]
pub(crate) struct ContainerInner {
    core: NodeCore,
    children: RwLock<Children>,
}

/// A node holding named children and no data of its own.
///
/// Children are addressed by their slug, case-insensitively, and iterated in
/// the order they were added (or the order set by [`set_ordering`]).
///
/// [`set_ordering`]: ContainerNode::set_ordering
#[derive(Debug, Clone)]
pub struct ContainerNode(Arc<ContainerInner>);

impl ContainerNode {
    /// Create a detached, empty container.
    pub fn new(label: &str) -> Result<Self, TreeError> {
        Ok(Self(Arc::new(ContainerInner {
            core: NodeCore::new(label)?,
            children: RwLock::new(Children::default()),
        })))
    }

    pub(crate) fn from_inner(inner: Arc<ContainerInner>) -> Self {
        Self(inner)
    }

    pub(crate) fn core(&self) -> &NodeCore {
        &self.0.core
    }

    /// Normalized name of this node.
    pub fn name(&self) -> &CompactString {
        self.core().name()
    }

    /// Original label this node was created from.
    pub fn verbose_name(&self) -> String {
        self.core().verbose_name()
    }

    /// Read a metadata entry.
    pub fn metadata(&self, key: &str) -> Option<serde_json::Value> {
        self.core().metadata(key)
    }

    /// Snapshot of all metadata entries.
    pub fn metadata_map(&self) -> Metadata {
        self.core().metadata_map()
    }

    /// Add or overwrite a metadata entry.
    pub fn set_metadata(&self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.core().set_metadata(key.into(), value.into());
    }

    /// The owning container, if attached.
    ///
    /// # Errors
    ///
    /// [`TreeError::Detached`] if the owning container has been dropped.
    pub fn parent(&self) -> Result<Option<ContainerNode>, TreeError> {
        self.core().parent()
    }

    /// Attach `node` as the last child of this container.
    ///
    /// This is the only place parent links are created. On failure the tree is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// - [`TreeError::DuplicateChild`] if a child with the same name exists.
    /// - [`TreeError::AlreadyAttached`] if `node` already has a parent, or is
    ///   this container or one of its ancestors.
    pub fn add_child(&self, node: impl Into<Node>) -> Result<(), TreeError> {
        let node = node.into();
        let name = node.name().clone();

        if let Node::Container(candidate) = &node {
            if self.is_self_or_descendant_of(candidate) {
                return Err(TreeError::AlreadyAttached {
                    name,
                    parent: self.core().location(),
                    reason: "node is this container or one of its ancestors",
                });
            }
        }

        let mut children = self.0.children.write();
        if children.by_name.contains_key(&name) {
            return Err(TreeError::DuplicateChild {
                name,
                parent: self.core().location(),
            });
        }
        if node.has_parent() || !node.core().attach(Arc::downgrade(&self.0)) {
            return Err(TreeError::AlreadyAttached {
                name,
                parent: self.core().location(),
                reason: "node already has a parent",
            });
        }
        children.ordering.push(name.clone());
        children.by_name.insert(name, node);
        Ok(())
    }

    fn is_self_or_descendant_of(&self, candidate: &ContainerNode) -> bool {
        let mut current = Some(self.clone());
        while let Some(container) = current {
            if container.ptr_eq(candidate) {
                return true;
            }
            // A dropped ancestor ends the chain.
            current = container.parent().ok().flatten();
        }
        false
    }

    /// Case-insensitive child lookup.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] when no child carries the lower-cased `key`.
    pub fn child(&self, key: &str) -> Result<Node, TreeError> {
        self.get(key)
            .ok_or_else(|| TreeError::not_found(key, self.core().location()))
    }

    /// Case-insensitive child lookup returning `None` on a miss.
    pub fn get(&self, key: &str) -> Option<Node> {
        let key = key.to_lowercase();
        self.0.children.read().by_name.get(key.as_str()).cloned()
    }

    /// Whether a child named `key` (case-insensitive) exists.
    pub fn contains(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.0.children.read().by_name.contains_key(key.as_str())
    }

    /// Whether `node` is a direct child of this container.
    pub fn contains_node(&self, node: &Node) -> bool {
        self.0
            .children
            .read()
            .by_name
            .get(node.name())
            .is_some_and(|child| child == node)
    }

    /// Children in iteration order.
    pub fn children(&self) -> Vec<Node> {
        let children = self.0.children.read();
        children
            .ordering
            .iter()
            .filter_map(|name| children.by_name.get(name).cloned())
            .collect()
    }

    /// Iterate over children in iteration order.
    pub fn iter(&self) -> std::vec::IntoIter<Node> {
        self.children().into_iter()
    }

    /// Name to child mapping.
    pub fn children_as_map(&self) -> HashMap<CompactString, Node> {
        self.0.children.read().by_name.clone()
    }

    /// Child names in iteration order.
    pub fn ordering(&self) -> Vec<CompactString> {
        self.0.children.read().ordering.clone()
    }

    /// Replace the iteration order.
    ///
    /// `names` must list every child exactly once; names are matched
    /// case-insensitively.
    pub fn set_ordering<I, S>(&self, names: I) -> Result<(), TreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ordering: Vec<CompactString> = names
            .into_iter()
            .map(|name| CompactString::from(name.as_ref().to_lowercase()))
            .collect();

        let mut children = self.0.children.write();
        let invalid = |reason: String| TreeError::InvalidOrdering {
            url: self.core().location(),
            reason,
        };
        if ordering.len() != children.by_name.len() {
            return Err(invalid(format!(
                "expected {} names, got {}",
                children.by_name.len(),
                ordering.len()
            )));
        }
        let mut seen = HashSet::with_capacity(ordering.len());
        for name in &ordering {
            if !children.by_name.contains_key(name) {
                return Err(invalid(format!("{name:?} is not a child")));
            }
            if !seen.insert(name) {
                return Err(invalid(format!("{name:?} is listed twice")));
            }
        }
        children.ordering = ordering;
        Ok(())
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.0.children.read().by_name.len()
    }

    /// Whether this container has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dictionary projection: child name to nested mapping or literal data.
    pub fn get_dictionary(&self) -> serde_json::Map<String, serde_json::Value> {
        self.iter()
            .map(|child| (child.name().to_string(), child.to_json()))
            .collect()
    }

    /// Whether `other` is the same node.
    pub fn ptr_eq(&self, other: &ContainerNode) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Addressable for ContainerNode {
    fn absolute_url(&self) -> Result<String, TreeError> {
        self.core().absolute_url()
    }
}

impl PartialEq for ContainerNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ContainerNode {}

impl Hash for ContainerNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl IntoIterator for &ContainerNode {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ContainerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.get_dictionary()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl Serialize for ContainerNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = self.children();
        let mut map = serializer.serialize_map(Some(children.len()))?;
        for child in &children {
            map.serialize_entry(child.name().as_str(), child)?;
        }
        map.end()
    }
}
