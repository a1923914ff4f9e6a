//! Path resolution against the namespace.

use thiserror::Error;

use crate::core::namespace::NamespaceNode;

/// Component that pops one level.
pub const PARENT: &str = "..";

/// The path does not name a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not found")]
pub struct NotFound;

/// Resolve `target` relative to `cwd`, walking from `root`.
///
/// Each element of `cwd` and `target` is one component: `..` pops a level
/// (never above the root) and anything else descends. Missing names and
/// attempts to descend through a document fail closed.
pub fn resolve<'a, S: AsRef<str>, T: AsRef<str>>(
    root: &'a NamespaceNode,
    cwd: &[S],
    target: &[T],
) -> Result<&'a NamespaceNode, NotFound> {
    let mut trail: Vec<&NamespaceNode> = vec![root];
    let components = cwd
        .iter()
        .map(AsRef::as_ref)
        .chain(target.iter().map(AsRef::as_ref));
    for component in components {
        if component == PARENT {
            if trail.len() > 1 {
                trail.pop();
            }
            continue;
        }
        let current = trail.last().copied().ok_or(NotFound)?;
        let next = current.child(component).ok_or(NotFound)?;
        trail.push(next);
    }
    trail.last().copied().ok_or(NotFound)
}

/// Render a cwd as an absolute path: `/` for the root, `/a/b` otherwise.
pub fn display_path<S: AsRef<str>>(cwd: &[S]) -> String {
    let joined: Vec<&str> = cwd.iter().map(AsRef::as_ref).collect();
    format!("/{}", joined.join("/"))
}
