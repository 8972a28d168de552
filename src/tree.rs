//! Ordered labeled trees
//!
//! Arena-indexed tree structure consumed by the tree edit engine: each
//! node holds an opaque payload and an ordered child list, addressed by
//! [`NodeId`]. `Tree::new()` is the distinguished empty tree. The arena
//! layout keeps trees read-only and freely shareable once built.

use rustc_hash::FxHashMap;

/// Unique identifier for a node within its tree's arena
pub type NodeId = usize;

#[derive(Debug, Clone)]
pub(crate) struct TreeNode<T> {
    pub(crate) payload: T,
    pub(crate) children: Vec<NodeId>,
}

/// An ordered tree over payloads of type `T`
#[derive(Debug, Clone)]
pub struct Tree<T> {
    pub(crate) nodes: Vec<TreeNode<T>>,
    root: Option<NodeId>,
}

impl<T> Tree<T> {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Set the root payload
    ///
    /// # Panics
    ///
    /// Panics if the tree already has a root; a tree is built once,
    /// top down, from a single root.
    pub fn add_root(&mut self, payload: T) -> NodeId {
        assert!(self.root.is_none(), "tree already has a root");
        self.nodes.push(TreeNode {
            payload,
            children: Vec::new(),
        });
        self.root = Some(0);
        0
    }

    /// Append a child under `parent`; children keep insertion order
    pub fn add_child(&mut self, parent: NodeId, payload: T) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            payload,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for the distinguished empty tree
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node, if the tree is non-empty
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Get a node's payload
    pub fn payload(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id).map(|n| &n.payload)
    }

    /// Get a node's children in order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Post-order annotation of a tree, the preprocessing step of the tree
/// edit engine
///
/// `post[p]` is the arena id of the node at post-order position `p`,
/// `lld[p]` the post-order position of that node's leftmost-leaf
/// descendant, and `keyroots` the ascending post-order positions of
/// nodes that are either the root or have a left sibling.
#[derive(Debug)]
pub(crate) struct Annotation {
    pub(crate) post: Vec<NodeId>,
    pub(crate) lld: Vec<usize>,
    pub(crate) keyroots: Vec<usize>,
}

/// Linearize a tree into post-order with an explicit stack
pub(crate) fn annotate<T>(tree: &Tree<T>) -> Annotation {
    let len = tree.len();
    let mut post = Vec::with_capacity(len);
    let mut post_index = vec![0usize; len];

    if let Some(root) = tree.root() {
        // (node, next child to visit)
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
        loop {
            let (id, next) = match stack.last_mut() {
                Some(top) => {
                    let pair = (top.0, top.1);
                    top.1 += 1;
                    pair
                }
                None => break,
            };
            let children = tree.nodes[id].children.as_slice();
            if next < children.len() {
                stack.push((children[next], 0));
            } else {
                post_index[id] = post.len();
                post.push(id);
                stack.pop();
            }
        }
    }

    let mut lld = vec![0usize; len];
    for p in 0..len {
        let children = tree.nodes[post[p]].children.as_slice();
        lld[p] = match children.first() {
            // children precede their parent in post-order
            Some(&first) => lld[post_index[first]],
            None => p,
        };
    }

    // A node is a keyroot iff it is the highest post-order position
    // sharing its leftmost-leaf descendant.
    let mut highest: FxHashMap<usize, usize> = FxHashMap::default();
    for p in 0..len {
        highest.insert(lld[p], p);
    }
    let mut keyroots: Vec<usize> = highest.into_values().collect();
    keyroots.sort_unstable();

    Annotation {
        post,
        lld,
        keyroots,
    }
}
