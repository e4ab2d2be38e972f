//! Literal and generic node types.
//!
//! Nodes are cheap, clonable handles. A node is created detached, attached to
//! at most one container through [`ContainerNode::add_child`], and never
//! reparented. Parents are held weakly, children strongly, so a tree is owned
//! by its root handle. Once every handle to the root is dropped, nodes still
//! held elsewhere report [`TreeError::Detached`] instead of posing as roots.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::{Arc, OnceLock, Weak};

use compact_str::CompactString;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Serialize, Serializer};

use crate::container::{ContainerInner, ContainerNode};
use crate::error::TreeError;
use crate::slug;

/// Metadata key holding the original, pre-normalization label.
pub const VERBOSE_NAME: &str = "verbose_name";

/// Open annotation store attached to every node.
///
/// Always contains [`VERBOSE_NAME`]; callers may add or overwrite entries.
pub type Metadata = IndexMap<String, serde_json::Value>;

/// State shared by both node variants.
#[derive(Debug)]
pub(crate) struct NodeCore {
    name: CompactString,
    metadata: RwLock<Metadata>,
    parent: OnceLock<Weak<ContainerInner>>,
}

impl NodeCore {
    pub(crate) fn new(label: &str) -> Result<Self, TreeError> {
        let name = slug::node_name(label)?;
        let mut metadata = Metadata::new();
        metadata.insert(VERBOSE_NAME.to_string(), serde_json::Value::from(label));
        Ok(Self {
            name,
            metadata: RwLock::new(metadata),
            parent: OnceLock::new(),
        })
    }

    pub(crate) fn name(&self) -> &CompactString {
        &self.name
    }

    pub(crate) fn verbose_name(&self) -> String {
        match self.metadata.read().get(VERBOSE_NAME) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => self.name.to_string(),
        }
    }

    pub(crate) fn metadata(&self, key: &str) -> Option<serde_json::Value> {
        self.metadata.read().get(key).cloned()
    }

    pub(crate) fn metadata_map(&self) -> Metadata {
        self.metadata.read().clone()
    }

    pub(crate) fn set_metadata(&self, key: String, value: serde_json::Value) {
        self.metadata.write().insert(key, value);
    }

    pub(crate) fn parent(&self) -> Result<Option<ContainerNode>, TreeError> {
        match self.parent.get() {
            None => Ok(None),
            Some(parent) => parent
                .upgrade()
                .map(|inner| Some(ContainerNode::from_inner(inner)))
                .ok_or_else(|| TreeError::Detached {
                    name: self.name.clone(),
                }),
        }
    }

    pub(crate) fn has_parent(&self) -> bool {
        self.parent.get().is_some()
    }

    /// Record the parent link. Fails if one was already set.
    pub(crate) fn attach(&self, parent: Weak<ContainerInner>) -> bool {
        self.parent.set(parent).is_ok()
    }

    pub(crate) fn absolute_url(&self) -> Result<String, TreeError> {
        let mut segments = Vec::new();
        let mut name = self.name.clone();
        let mut parent = self.parent()?;
        while let Some(container) = parent {
            segments.push(name);
            name = container.name().clone();
            parent = container.parent()?;
        }
        segments.reverse();
        Ok(format!("/{}", segments.join("/")))
    }

    /// Where this node sits, for error messages.
    pub(crate) fn location(&self) -> String {
        self.absolute_url().unwrap_or_else(|_| format!("{} (detached)", self.name))
    }
}

/// Addressing capability shared by every node type.
pub trait Addressable {
    /// Slash-delimited path from the tree root to this node. The root is `/`.
    ///
    /// # Errors
    ///
    /// [`TreeError::Detached`] if an ancestor has been dropped.
    fn absolute_url(&self) -> Result<String, TreeError>;

    /// Filesystem-style path leading from `other` to this node.
    ///
    /// Joining the result onto `other`'s absolute URL and normalizing yields
    /// this node's absolute URL. A node relative to itself is `.`.
    fn relative_url(&self, other: &dyn Addressable) -> Result<String, TreeError> {
        let target = self.absolute_url()?;
        let base = other.absolute_url()?;
        let relative = pathdiff::diff_paths(Path::new(&target), Path::new(&base))
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or(target);
        if relative.is_empty() {
            Ok(".".to_string())
        } else {
            Ok(relative)
        }
    }
}

#[derive(Debug)]
pub(crate) struct LiteralInner {
    core: NodeCore,
    data: RwLock<Option<String>>,
}

/// A node holding a single string-coerced scalar.
#[derive(Debug, Clone)]
pub struct LiteralNode(Arc<LiteralInner>);

impl LiteralNode {
    /// Create a detached literal with no data.
    pub fn new(label: &str) -> Result<Self, TreeError> {
        Ok(Self(Arc::new(LiteralInner {
            core: NodeCore::new(label)?,
            data: RwLock::new(None),
        })))
    }

    /// Create a detached literal holding the textual form of `value`.
    pub fn with_data(label: &str, value: impl ToString) -> Result<Self, TreeError> {
        let node = Self::new(label)?;
        node.set_data(value);
        Ok(node)
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

    /// The stored data, if any.
    pub fn data(&self) -> Option<String> {
        self.0.data.read().clone()
    }

    /// Store the textual form of `value`.
    pub fn set_data(&self, value: impl ToString) {
        *self.0.data.write() = Some(value.to_string());
    }

    /// Whether the data is absent or the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.data.read().as_deref().is_none_or(str::is_empty)
    }

    /// Read a metadata entry.
    pub fn metadata(&self, key: &str) -> Option<serde_json::Value> {
        self.core().metadata(key)
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

    /// Whether `other` is the same node.
    pub fn ptr_eq(&self, other: &LiteralNode) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Addressable for LiteralNode {
    fn absolute_url(&self) -> Result<String, TreeError> {
        self.core().absolute_url()
    }
}

impl PartialEq for LiteralNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for LiteralNode {}

impl Hash for LiteralNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Display for LiteralNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.data.read().as_deref().unwrap_or(""))
    }
}

impl Serialize for LiteralNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data().serialize(serializer)
    }
}

/// Either variant of a tree node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Literal(LiteralNode),
    Container(ContainerNode),
}

impl Node {
    pub(crate) fn core(&self) -> &NodeCore {
        match self {
            Node::Literal(literal) => literal.core(),
            Node::Container(container) => container.core(),
        }
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

    /// Check if this is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    /// Check if this is a container.
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Container(_))
    }

    pub fn as_literal(&self) -> Option<&LiteralNode> {
        match self {
            Node::Literal(literal) => Some(literal),
            Node::Container(_) => None,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerNode> {
        match self {
            Node::Container(container) => Some(container),
            Node::Literal(_) => None,
        }
    }

    /// Literal data. Fails on a container.
    pub fn data(&self) -> Result<Option<String>, TreeError> {
        match self {
            Node::Literal(literal) => Ok(literal.data()),
            Node::Container(container) => Err(TreeError::ContainerData {
                url: container.core().location(),
            }),
        }
    }

    /// Store literal data. Fails on a container.
    pub fn set_data(&self, value: impl ToString) -> Result<(), TreeError> {
        match self {
            Node::Literal(literal) => {
                literal.set_data(value);
                Ok(())
            }
            Node::Container(container) => Err(TreeError::ContainerData {
                url: container.core().location(),
            }),
        }
    }

    /// Case-insensitive child lookup. A literal has no children.
    pub fn child(&self, key: &str) -> Result<Node, TreeError> {
        match self {
            Node::Container(container) => container.child(key),
            Node::Literal(literal) => Err(TreeError::not_found(key, literal.core().location())),
        }
    }

    /// Whether this node carries nothing: no children, or no (or empty) data.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Literal(literal) => literal.is_empty(),
            Node::Container(container) => container.is_empty(),
        }
    }

    /// Dictionary projection: a container's nested mapping or a literal's data.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Node::Literal(literal) => literal
                .data()
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null),
            Node::Container(container) => serde_json::Value::Object(container.get_dictionary()),
        }
    }

    pub(crate) fn has_parent(&self) -> bool {
        self.core().has_parent()
    }
}

impl Addressable for Node {
    fn absolute_url(&self) -> Result<String, TreeError> {
        self.core().absolute_url()
    }
}

impl From<LiteralNode> for Node {
    fn from(literal: LiteralNode) -> Self {
        Node::Literal(literal)
    }
}

impl From<ContainerNode> for Node {
    fn from(container: ContainerNode) -> Self {
        Node::Container(container)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(literal) => fmt::Display::fmt(literal, f),
            Node::Container(container) => fmt::Display::fmt(container, f),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Literal(literal) => literal.serialize(serializer),
            Node::Container(container) => container.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_name() {
        let node = LiteralNode::new("árvíztűrő").unwrap();
        assert_eq!(node.name().as_str(), "arvizturo");
        assert_eq!(node.verbose_name(), "árvíztűrő");
        assert_eq!(
            node.metadata(VERBOSE_NAME),
            Some(serde_json::Value::from("árvíztűrő"))
        );
    }

    #[test]
    fn test_data_is_stringified() {
        let node = LiteralNode::new("test").unwrap();
        node.set_data(5);
        assert_eq!(node.data().as_deref(), Some("5"));
        assert_eq!(node.to_string(), "5");
    }

    #[test]
    fn test_literal_emptiness() {
        let node = LiteralNode::new("test").unwrap();
        assert!(node.is_empty());
        node.set_data("");
        assert!(node.is_empty());
        node.set_data("a");
        assert!(!node.is_empty());
    }

    #[test]
    fn test_metadata() {
        let node = LiteralNode::new("test").unwrap();
        node.set_metadata("priority", 5);
        node.set_metadata("language", "hu");
        assert_eq!(node.metadata("priority"), Some(serde_json::Value::from(5)));
        assert_eq!(node.metadata("language"), Some(serde_json::Value::from("hu")));
        assert_eq!(node.metadata("missing"), None);
    }

    #[test]
    fn test_detached_node_is_root() {
        let node = LiteralNode::new("lonely").unwrap();
        assert!(node.parent().unwrap().is_none());
        assert_eq!(node.absolute_url().unwrap(), "/");
    }

    #[test]
    fn test_node_data_on_container_fails() {
        let node = Node::from(ContainerNode::new("test").unwrap());
        let err = node.set_data(5).unwrap_err();
        assert!(matches!(err, TreeError::ContainerData { .. }));
        let err = node.data().unwrap_err();
        assert!(matches!(err, TreeError::ContainerData { .. }));
    }

    #[test]
    fn test_literal_has_no_children() {
        let node = Node::from(LiteralNode::with_data("test", "x").unwrap());
        assert!(node.child("anything").unwrap_err().is_not_found());
    }

    #[test]
    fn test_identity_equality() {
        let a = LiteralNode::new("a").unwrap();
        let b = LiteralNode::new("a").unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
