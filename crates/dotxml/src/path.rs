//! Dotted element paths
//!
//! A path such as `Settings.network.port` names a descent from an element
//! through its child elements. Each segment must match an element name
//! exactly. When several siblings share a name, the first one in document
//! order is taken and the others cannot be reached.

use crate::xml::Element;

/// Split a path at its first `.` into the leading segment and the rest.
///
/// The rest is empty when the path has no dot.
pub fn split_first(path: &str) -> (&str, &str) {
    path.split_once('.').unwrap_or((path, ""))
}

/// Resolve `path` against the children of `node`.
pub fn resolve<'a>(node: &'a Element, path: &str) -> Option<&'a Element> {
    let (head, tail) = split_first(path);
    let child = node.first_child(head)?;
    if tail.is_empty() {
        Some(child)
    } else {
        resolve(child, tail)
    }
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(node: &'a mut Element, path: &str) -> Option<&'a mut Element> {
    let (head, tail) = split_first(path);
    let child = node.first_child_mut(head)?;
    if tail.is_empty() {
        Some(child)
    } else {
        resolve_mut(child, tail)
    }
}
