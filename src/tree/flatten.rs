use std::collections::HashMap;

use crate::tree::store::TreeNode;

/// Opaque identity handle for a flat node.
///
/// Selection and expansion state are keyed by `FlatId`, so reusing a handle
/// across re-flattens is what keeps that state alive for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlatId(u64);

/// Rendering-only projection of a nested node.
#[derive(Debug, Clone)]
pub struct FlatNode {
    pub id: String,
    pub name: String,
    /// Depth from root (roots are 0).
    pub level: usize,
    /// True iff the source nested node has a children field.
    pub expandable: bool,
}

/// Converts the nested tree into a flat, level-annotated list and maintains
/// the identity maps between nested and flat representations.
///
/// Maps are keyed by the stable nested `id`, so re-flattening a filtered
/// copy of the tree reuses existing identities instead of growing the maps.
/// A renamed node is given a fresh identity; the orphaned one stays in the
/// node table (and in any selection set holding it) but is never handed out
/// again.
pub struct Flattener {
    nodes: HashMap<FlatId, FlatNode>,
    nested_to_flat: HashMap<String, FlatId>,
    flat_to_nested: HashMap<FlatId, String>,
    next_id: u64,
}

impl Flattener {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            nested_to_flat: HashMap::new(),
            flat_to_nested: HashMap::new(),
            next_id: 0,
        }
    }

    /// Flatten a forest of nested roots into pre-order: each parent is
    /// immediately followed by all of its flattened descendants, siblings in
    /// input order. Updates both identity maps in place.
    pub fn flatten(&mut self, roots: &[TreeNode]) -> Vec<FlatId> {
        let mut out = Vec::new();
        for root in roots {
            self.flatten_node(root, 0, &mut out);
        }
        out
    }

    fn flatten_node(&mut self, node: &TreeNode, level: usize, out: &mut Vec<FlatId>) {
        out.push(self.transform(node, level));
        if let Some(children) = node.children() {
            for child in children {
                self.flatten_node(child, level + 1, out);
            }
        }
    }

    /// Convert one nested node into a flat node at the given level.
    ///
    /// Reuses the existing identity when the node's name is unchanged since
    /// the last flatten; otherwise allocates a fresh one, orphaning the old.
    fn transform(&mut self, node: &TreeNode, level: usize) -> FlatId {
        let existing = self
            .nested_to_flat
            .get(&node.id)
            .copied()
            .filter(|fid| self.nodes[fid].name == node.name);

        let fid = existing.unwrap_or_else(|| {
            let fid = FlatId(self.next_id);
            self.next_id += 1;
            fid
        });

        self.nodes.insert(
            fid,
            FlatNode {
                id: node.id.clone(),
                name: node.name.clone(),
                level,
                expandable: node.is_group(),
            },
        );
        self.nested_to_flat.insert(node.id.clone(), fid);
        self.flat_to_nested.insert(fid, node.id.clone());
        fid
    }

    /// Look up the projection for a flat identity.
    pub fn node(&self, fid: FlatId) -> Option<&FlatNode> {
        self.nodes.get(&fid)
    }

    /// Depth accessor. O(1).
    pub fn level(&self, fid: FlatId) -> usize {
        self.nodes.get(&fid).map(|n| n.level).unwrap_or(0)
    }

    /// Expandability accessor. O(1).
    pub fn is_expandable(&self, fid: FlatId) -> bool {
        self.nodes.get(&fid).map(|n| n.expandable).unwrap_or(false)
    }

    /// Flat identity currently assigned to a nested node id.
    pub fn flat_id(&self, nested_id: &str) -> Option<FlatId> {
        self.nested_to_flat.get(nested_id).copied()
    }

    /// Nested node id behind a flat identity.
    pub fn nested_id(&self, fid: FlatId) -> Option<&str> {
        self.flat_to_nested.get(&fid).map(String::as_str)
    }

    /// Descendants of `of` within a flattened list: the contiguous run of
    /// entries following it whose level is greater than its own. Does not
    /// include `of` itself.
    pub fn descendants(&self, list: &[FlatId], of: FlatId) -> Vec<FlatId> {
        let Some(pos) = list.iter().position(|&fid| fid == of) else {
            return Vec::new();
        };
        let base = self.level(of);
        list[pos + 1..]
            .iter()
            .take_while(|&&fid| self.level(fid) > base)
            .copied()
            .collect()
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new()
    }
}
