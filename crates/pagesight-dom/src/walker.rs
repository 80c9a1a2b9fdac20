//! Document traversal with explicit shadow boundary steps.

use crate::node::{NodeId, NodeKind};
use crate::page::PageDom;

/// One step of a downward walk. `entered_shadow` marks direct children of
/// a shadow root, the nodes where the walk crossed out of the light tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkStep {
    pub node: NodeId,
    pub entered_shadow: bool,
}

/// Depth-first pre-order over element nodes.
///
/// When shadow descent is on, a host's shadow subtree is visited
/// immediately after the host and before its light children, matching
/// composed render order. Nested documents are never descended.
pub struct DomWalker<'a, D: PageDom + ?Sized> {
    dom: &'a D,
    stack: Vec<WalkStep>,
    include_shadow: bool,
}

impl<'a, D: PageDom + ?Sized> DomWalker<'a, D> {
    /// Walk every element in the document, descending into shadow roots.
    pub fn full_tree(dom: &'a D) -> Self {
        Self::subtree(dom, dom.document(), true)
    }

    /// Walk light-tree elements only, the set a selector query would see.
    pub fn light_tree(dom: &'a D) -> Self {
        Self::subtree(dom, dom.document(), false)
    }

    /// Walk the descendants of `root`. `root` itself is not yielded.
    pub fn subtree(dom: &'a D, root: NodeId, include_shadow: bool) -> Self {
        let mut walker = Self { dom, stack: Vec::new(), include_shadow };
        walker.push_children(root);
        walker
    }

    fn push_children(&mut self, id: NodeId) {
        // Light children first so shadow entries pop ahead of them.
        for &child in self.dom.children(id).iter().rev() {
            self.stack.push(WalkStep { node: child, entered_shadow: false });
        }
        if self.include_shadow {
            if let Some(shadow) = self.dom.shadow_root(id) {
                for &child in self.dom.children(shadow).iter().rev() {
                    self.stack.push(WalkStep { node: child, entered_shadow: true });
                }
            }
        }
    }
}

impl<D: PageDom + ?Sized> Iterator for DomWalker<'_, D> {
    type Item = WalkStep;

    fn next(&mut self) -> Option<WalkStep> {
        let step = self.stack.pop()?;
        self.push_children(step.node);
        Some(step)
    }
}

/// One step of an upward walk. `crossed_shadow` marks a hop from shadow
/// content to its host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AncestorStep {
    pub node: NodeId,
    pub crossed_shadow: bool,
}

/// The element chain from a node up to the document root, starting with
/// the node itself. Shadow boundaries resolve to the host element.
///
/// Callers bound runaway chains with `take(n)`.
pub struct AncestorChain<'a, D: PageDom + ?Sized> {
    dom: &'a D,
    next: Option<AncestorStep>,
}

impl<'a, D: PageDom + ?Sized> AncestorChain<'a, D> {
    pub fn new(dom: &'a D, start: NodeId) -> Self {
        Self { dom, next: Some(AncestorStep { node: start, crossed_shadow: false }) }
    }
}

impl<D: PageDom + ?Sized> Iterator for AncestorChain<'_, D> {
    type Item = AncestorStep;

    fn next(&mut self) -> Option<AncestorStep> {
        let cur = self.next.take()?;
        self.next = self.dom.parent(cur.node).and_then(|p| match self.dom.node(p).kind {
            NodeKind::Element => Some(AncestorStep { node: p, crossed_shadow: false }),
            NodeKind::ShadowRoot => self
                .dom
                .shadow_host(p)
                .map(|host| AncestorStep { node: host, crossed_shadow: true }),
            NodeKind::Document => None,
        });
        Some(cur)
    }
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
