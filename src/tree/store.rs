use serde_json::Value;

/// A node in the checklist tree.
///
/// `children: Some(_)` — even an empty vector — marks a group;
/// `None` marks a leaf. `id` is unique across the whole tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    /// Whether this node is a group (has a children field, even if empty).
    pub fn is_group(&self) -> bool {
        self.children.is_some()
    }

    /// Borrow the children sequence, if this node is a group.
    pub fn children(&self) -> Option<&[TreeNode]> {
        self.children.as_deref()
    }

    /// Total node count of this subtree, including the node itself.
    pub fn count(&self) -> usize {
        1 + self
            .children()
            .map(|c| c.iter().map(TreeNode::count).sum())
            .unwrap_or(0)
    }
}

/// Total node count across a forest of root nodes.
pub fn count_nodes(roots: &[TreeNode]) -> usize {
    roots.iter().map(TreeNode::count).sum()
}

type Subscriber = Box<dyn FnMut(&[TreeNode])>;

/// Owns the canonical nested tree and notifies subscribers on change.
///
/// Single writer (only the store mutates the data), multiple readers.
/// Subscriber callbacks fire synchronously in subscription order.
pub struct TreeStore {
    data: Vec<TreeNode>,
    subscribers: Vec<Subscriber>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Latest published snapshot.
    pub fn data(&self) -> &[TreeNode] {
        &self.data
    }

    /// Register a callback invoked with the tree on every publish.
    pub fn subscribe(&mut self, f: impl FnMut(&[TreeNode]) + 'static) {
        self.subscribers.push(Box::new(f));
    }

    /// Build the canonical tree from arbitrary nested JSON values and
    /// publish it to subscribers.
    ///
    /// A value with a `children` field is a group; anything else is a leaf.
    /// Missing `id`/`name` fields default to empty strings — malformed input
    /// is not validated, downstream rendering reflects whatever is present.
    pub fn initialize(&mut self, raw: &[Value]) {
        self.data = build_tree(raw);
        self.publish();
    }

    fn publish(&mut self) {
        let data = &self.data;
        for subscriber in self.subscribers.iter_mut() {
            subscriber(data);
        }
    }
}

/// Convert raw nested JSON objects into `TreeNode`s, recursively.
fn build_tree(items: &[Value]) -> Vec<TreeNode> {
    items
        .iter()
        .map(|item| {
            let children = item.get("children").map(|c| {
                c.as_array()
                    .map(|arr| build_tree(arr))
                    .unwrap_or_default()
            });
            TreeNode {
                id: item
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                name: item
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                children,
            }
        })
        .collect()
}

/// Built-in sample: two groups of three leaves each.
pub const SAMPLE_DATA: &str = r#"[
  { "id": "15305130530", "name": "分组一", "children":
      [ { "id": "1@DEFAULT", "name": "1-001" },
        { "id": "2@DEFAULT", "name": "1-002" },
        { "id": "5@DEFAULT", "name": "1-003" }
      ]},
  { "id": "15305130801", "name": "分组二", "children":
      [ { "id": "0@DEFAULT", "name": "2-001" },
        { "id": "3@DEFAULT", "name": "2-002" },
        { "id": "4@DEFAULT", "name": "2-003" }
      ]}
]"#;

/// Parse the built-in sample into raw JSON values.
pub fn sample_raw() -> Vec<Value> {
    serde_json::from_str(SAMPLE_DATA).expect("built-in sample data is valid JSON")
}
