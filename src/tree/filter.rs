use crate::tree::store::TreeNode;

/// Substring rule applied to leaf names.
///
/// Group names always match on plain containment. `Contains` (the default)
/// applies the same rule to leaves; `InteriorOnly` excludes leaf matches at
/// position 0, for callers that need that legacy asymmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafMatchPolicy {
    #[default]
    Contains,
    InteriorOnly,
}

impl LeafMatchPolicy {
    fn matches(self, name: &str, term: &str) -> bool {
        match self {
            LeafMatchPolicy::Contains => name.contains(term),
            LeafMatchPolicy::InteriorOnly => name.find(term).is_some_and(|pos| pos > 0),
        }
    }
}

/// Default minimum term length; shorter terms fall through to a filter clear.
pub const MIN_TERM_CHARS: usize = 2;

/// Whether a term is long enough to trigger filtering, counted in characters.
pub fn term_is_searchable(term: &str, min_chars: usize) -> bool {
    term.chars().count() >= min_chars
}

/// Prune a deep copy of the tree down to nodes matching `term` and their
/// ancestor chains. The input tree is never mutated; clearing a filter is
/// just re-rendering the untouched original.
///
/// Case-sensitive substring matching, top-down:
/// - a group whose own name contains the term keeps its entire subtree;
/// - any other group keeps its matching children, and is dropped when none
///   remain and its own name does not match;
/// - a leaf is kept iff its name matches under `policy`.
pub fn filter(term: &str, roots: &[TreeNode], policy: LeafMatchPolicy) -> Vec<TreeNode> {
    roots
        .iter()
        .filter_map(|node| filter_node(term, node, policy))
        .collect()
}

fn filter_node(term: &str, node: &TreeNode, policy: LeafMatchPolicy) -> Option<TreeNode> {
    match node.children() {
        Some(_) if node.name.contains(term) => Some(node.clone()),
        Some(children) => {
            let kept = filter(term, children, policy);
            if kept.is_empty() && !node.name.contains(term) {
                None
            } else {
                Some(TreeNode {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    children: Some(kept),
                })
            }
        }
        None => policy.matches(&node.name, term).then(|| node.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::store::{count_nodes, sample_raw, TreeStore};

    fn sample_tree() -> Vec<TreeNode> {
        let mut store = TreeStore::new();
        store.initialize(&sample_raw());
        store.data().to_vec()
    }

    #[test]
    fn group_name_match_keeps_subtree_untouched() {
        let tree = sample_tree();
        let pruned = filter("分组一", &tree, LeafMatchPolicy::Contains);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0], tree[0]);
        assert_eq!(pruned[0].children().unwrap().len(), 3);
    }

    #[test]
    fn leaf_prefix_match_kept_under_contains_policy() {
        // "1-00" matches "1-001".."1-003" at position 0; 分组二 has no match
        // at any level and must be absent.
        let tree = sample_tree();
        let pruned = filter("1-00", &tree, LeafMatchPolicy::Contains);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].name, "分组一");
        let names: Vec<&str> = pruned[0]
            .children()
            .unwrap()
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["1-001", "1-002", "1-003"]);
    }

    #[test]
    fn leaf_prefix_match_dropped_under_interior_only_policy() {
        // Position-0 matches are excluded, the group keeps no children and
        // its own name does not match, so the whole branch disappears.
        let tree = sample_tree();
        let pruned = filter("1-00", &tree, LeafMatchPolicy::InteriorOnly);
        assert!(pruned.is_empty());
    }

    #[test]
    fn interior_leaf_match_kept_under_both_policies() {
        let tree = sample_tree();
        for policy in [LeafMatchPolicy::Contains, LeafMatchPolicy::InteriorOnly] {
            let pruned = filter("-002", &tree, policy);
            assert_eq!(pruned.len(), 2);
            assert_eq!(pruned[0].children().unwrap().len(), 1);
            assert_eq!(pruned[0].children().unwrap()[0].name, "1-002");
            assert_eq!(pruned[1].children().unwrap()[0].name, "2-002");
        }
    }

    #[test]
    fn matching_is_case_sensitive() {
        let raw: Vec<serde_json::Value> = serde_json::from_str(
            r#"[{"id": "g", "name": "Group", "children": [{"id": "l", "name": "Leaf"}]}]"#,
        )
        .unwrap();
        let mut store = TreeStore::new();
        store.initialize(&raw);
        assert!(filter("group", store.data(), LeafMatchPolicy::Contains).is_empty());
        assert_eq!(
            filter("Group", store.data(), LeafMatchPolicy::Contains).len(),
            1
        );
    }

    #[test]
    fn no_match_anywhere_returns_empty_forest() {
        let tree = sample_tree();
        assert!(filter("zzz", &tree, LeafMatchPolicy::Contains).is_empty());
    }

    #[test]
    fn filtering_does_not_mutate_the_input() {
        let tree = sample_tree();
        let before = tree.clone();
        let _ = filter("1-00", &tree, LeafMatchPolicy::Contains);
        let _ = filter("分组二", &tree, LeafMatchPolicy::Contains);
        assert_eq!(tree, before);
        assert_eq!(count_nodes(&tree), 8);
    }

    #[test]
    fn repeated_filtering_is_stable() {
        // Identical results every time, no state carried between calls.
        let tree = sample_tree();
        let first = filter("2-0", &tree, LeafMatchPolicy::Contains);
        let second = filter("2-0", &tree, LeafMatchPolicy::Contains);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_group_without_match_is_dropped() {
        let raw: Vec<serde_json::Value> =
            serde_json::from_str(r#"[{"id": "g", "name": "empty", "children": []}]"#).unwrap();
        let mut store = TreeStore::new();
        store.initialize(&raw);
        assert!(filter("xx", store.data(), LeafMatchPolicy::Contains).is_empty());
        assert_eq!(
            filter("emp", store.data(), LeafMatchPolicy::Contains).len(),
            1
        );
    }

    #[test]
    fn min_length_gate() {
        assert!(!term_is_searchable("", MIN_TERM_CHARS));
        assert!(!term_is_searchable("a", MIN_TERM_CHARS));
        assert!(!term_is_searchable("分", MIN_TERM_CHARS));
        assert!(term_is_searchable("ab", MIN_TERM_CHARS));
        assert!(term_is_searchable("分组", MIN_TERM_CHARS));
        assert!(!term_is_searchable("ab", 3));
    }
}
