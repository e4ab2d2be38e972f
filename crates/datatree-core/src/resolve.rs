//! Path resolution against a tree.

use std::path::Component;

use crate::container::ContainerNode;
use crate::error::TreeError;
use crate::node::Node;

/// Split a slash-delimited URL into lookup segments.
///
/// The URL is normalized first, so `.` segments vanish and `..` cancels the
/// preceding segment. Empty segments (leading, trailing, or doubled slashes)
/// are dropped. A `..` that climbs above the start of a relative URL survives
/// as a literal segment, which no child can match.
pub fn url_segments(url: &str) -> Vec<String> {
    path_clean::clean(url)
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::RootDir | Component::CurDir | Component::Prefix(_) => None,
        })
        .collect()
}

/// Resolve `url` against `root` by successive case-insensitive child lookups.
///
/// # Errors
///
/// [`TreeError::NotFound`] at the first segment without a matching child.
pub fn get_by_url(root: &ContainerNode, url: &str) -> Result<Node, TreeError> {
    url_segments(url)
        .iter()
        .try_fold(Node::from(root.clone()), |node, segment| node.child(segment))
}
