//! Line-size index
//!
//! An implicit-key treap over the document's lines. Each node stores the byte size of one line
//! (its length plus one for the newline, except on the last line); a node's position in the
//! document is its in-order rank, derived from subtree counts. Every node also caches the
//! line count and byte total of its subtree, which gives O(log n) expected time for
//! row → byte-offset and byte-offset → row conversion and for single-line updates.
//!
//! Nodes are owned through `Option<Box<Node>>`; rotations move ownership instead of patching
//! parent pointers, and every structural operation returns the new subtree root to its caller.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    line_size: usize,
    priority: u64,
    subtree_count: usize,
    subtree_total_bytes: usize,
    left: Link,
    right: Link,
}

impl Node {
    fn new(line_size: usize, priority: u64) -> Box<Self> {
        Box::new(Self {
            line_size,
            priority,
            subtree_count: 1,
            subtree_total_bytes: line_size,
            left: None,
            right: None,
        })
    }

    fn recompute(&mut self) {
        self.subtree_count = 1 + count(&self.left) + count(&self.right);
        self.subtree_total_bytes = self.line_size + total(&self.left) + total(&self.right);
    }
}

fn count(link: &Link) -> usize {
    link.as_ref().map_or(0, |n| n.subtree_count)
}

fn total(link: &Link) -> usize {
    link.as_ref().map_or(0, |n| n.subtree_total_bytes)
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    match node.left.take() {
        Some(mut pivot) => {
            node.left = pivot.right.take();
            node.recompute();
            pivot.right = Some(node);
            pivot.recompute();
            pivot
        }
        None => node,
    }
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    match node.right.take() {
        Some(mut pivot) => {
            node.right = pivot.left.take();
            node.recompute();
            pivot.left = Some(node);
            pivot.recompute();
            pivot
        }
        None => node,
    }
}

fn insert(link: Link, row: usize, new_node: Box<Node>) -> Box<Node> {
    let Some(mut node) = link else {
        return new_node;
    };

    let left_count = count(&node.left);
    if row <= left_count {
        let child = insert(node.left.take(), row, new_node);
        let lift = child.priority > node.priority;
        node.left = Some(child);
        node.recompute();
        if lift { rotate_right(node) } else { node }
    } else {
        let child = insert(node.right.take(), row - left_count - 1, new_node);
        let lift = child.priority > node.priority;
        node.right = Some(child);
        node.recompute();
        if lift { rotate_left(node) } else { node }
    }
}

/// Rotates `node` down below its higher-priority child until it is a leaf, then drops it.
fn remove_root(mut node: Box<Node>) -> Link {
    match (node.left.take(), node.right.take()) {
        (None, None) => None,
        (Some(child), None) | (None, Some(child)) => Some(child),
        (Some(mut left), Some(right)) if left.priority > right.priority => {
            node.left = left.right.take();
            node.right = Some(right);
            left.right = remove_root(node);
            left.recompute();
            Some(left)
        }
        (Some(left), Some(mut right)) => {
            node.right = right.left.take();
            node.left = Some(left);
            right.left = remove_root(node);
            right.recompute();
            Some(right)
        }
    }
}

fn remove(mut node: Box<Node>, row: usize) -> Link {
    let left_count = count(&node.left);
    if row < left_count {
        node.left = node.left.take().and_then(|left| remove(left, row));
    } else if row > left_count {
        node.right = node
            .right
            .take()
            .and_then(|right| remove(right, row - left_count - 1));
    } else {
        return remove_root(node);
    }
    node.recompute();
    Some(node)
}

fn set_size(node: &mut Node, row: usize, line_size: usize) {
    let left_count = count(&node.left);
    if row < left_count {
        if let Some(left) = node.left.as_deref_mut() {
            set_size(left, row, line_size);
        }
    } else if row > left_count {
        if let Some(right) = node.right.as_deref_mut() {
            set_size(right, row - left_count - 1, line_size);
        }
    } else {
        node.line_size = line_size;
    }
    node.recompute();
}

/// Randomized balanced index mapping line positions to cumulative byte offsets.
pub struct LineSizeIndex {
    root: Link,
    rng: StdRng,
}

impl LineSizeIndex {
    /// Create an empty index with entropy-seeded priorities.
    pub fn new() -> Self {
        Self {
            root: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an empty index whose priorities come from a fixed seed (reproducible shapes).
    pub fn with_seed(seed: u64) -> Self {
        Self {
            root: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Number of lines indexed.
    pub fn size(&self) -> usize {
        count(&self.root)
    }

    /// Returns `true` if no line is indexed.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Sum of all line sizes (the document's byte length).
    pub fn total_bytes(&self) -> usize {
        total(&self.root)
    }

    /// Byte offset at which line `row` starts.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.size()`.
    pub fn byte_offset_at(&self, row: usize) -> usize {
        assert!(
            row < self.size(),
            "row {row} out of range for index of {} lines",
            self.size()
        );

        let mut link = &self.root;
        let mut row = row;
        let mut offset = 0usize;
        while let Some(node) = link.as_deref() {
            let left_count = count(&node.left);
            if row < left_count {
                link = &node.left;
            } else if row == left_count {
                return offset + total(&node.left);
            } else {
                offset += total(&node.left) + node.line_size;
                row -= left_count + 1;
                link = &node.right;
            }
        }
        unreachable!("rank descent ran past a leaf for an in-range row")
    }

    /// Size recorded for line `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.size()`.
    pub fn line_size_at(&self, row: usize) -> usize {
        assert!(
            row < self.size(),
            "row {row} out of range for index of {} lines",
            self.size()
        );

        let mut link = &self.root;
        let mut row = row;
        while let Some(node) = link.as_deref() {
            let left_count = count(&node.left);
            if row < left_count {
                link = &node.left;
            } else if row == left_count {
                return node.line_size;
            } else {
                row -= left_count + 1;
                link = &node.right;
            }
        }
        unreachable!("rank descent ran past a leaf for an in-range row")
    }

    /// Row of the line that contains `byte_offset`.
    ///
    /// Offsets at or past the end of the document map to the last line; an empty index maps
    /// everything to row 0.
    pub fn line_containing_offset(&self, byte_offset: usize) -> usize {
        let mut link = &self.root;
        let mut offset = byte_offset;
        let mut rank = 0usize;
        while let Some(node) = link.as_deref() {
            let left_total = total(&node.left);
            if offset < left_total {
                link = &node.left;
                continue;
            }
            offset -= left_total;
            if offset < node.line_size {
                return rank + count(&node.left);
            }
            offset -= node.line_size;
            rank += count(&node.left) + 1;
            link = &node.right;
        }
        self.size().saturating_sub(1)
    }

    /// Insert a new line of `line_size` bytes so that it becomes line `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row > self.size()`.
    pub fn insert_before_position(&mut self, row: usize, line_size: usize) {
        assert!(
            row <= self.size(),
            "insert row {row} out of range for index of {} lines",
            self.size()
        );
        let node = Node::new(line_size, self.rng.r#gen());
        self.root = Some(insert(self.root.take(), row, node));
    }

    /// Remove line `row` from the index.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.size()`.
    pub fn remove_position(&mut self, row: usize) {
        assert!(
            row < self.size(),
            "remove row {row} out of range for index of {} lines",
            self.size()
        );
        self.root = self.root.take().and_then(|root| remove(root, row));
    }

    /// Overwrite the size of line `row`; `row == self.size()` appends a new line instead.
    ///
    /// # Panics
    ///
    /// Panics if `row > self.size()`.
    pub fn update_position_value(&mut self, row: usize, line_size: usize) {
        if row == self.size() {
            self.insert_before_position(row, line_size);
            return;
        }
        assert!(
            row < self.size(),
            "update row {row} out of range for index of {} lines",
            self.size()
        );
        if let Some(root) = self.root.as_deref_mut() {
            set_size(root, row, line_size);
        }
    }

    /// Alias of [`update_position_value`](Self::update_position_value).
    pub fn set_position_size(&mut self, row: usize, line_size: usize) {
        self.update_position_value(row, line_size);
    }

    /// Drop every indexed line.
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Line sizes in document order (O(n); for diagnostics and tests).
    pub fn sizes(&self) -> Vec<usize> {
        fn walk(link: &Link, out: &mut Vec<usize>) {
            if let Some(node) = link.as_deref() {
                walk(&node.left, out);
                out.push(node.line_size);
                walk(&node.right, out);
            }
        }

        let mut out = Vec::with_capacity(self.size());
        walk(&self.root, &mut out);
        out
    }

    /// Verify the heap order on priorities and the cached aggregates of every node.
    pub fn check_structure(&self) -> bool {
        fn valid(link: &Link, parent_priority: u64) -> bool {
            let Some(node) = link.as_deref() else {
                return true;
            };
            node.priority <= parent_priority
                && node.subtree_count == 1 + count(&node.left) + count(&node.right)
                && node.subtree_total_bytes
                    == node.line_size + total(&node.left) + total(&node.right)
                && valid(&node.left, node.priority)
                && valid(&node.right, node.priority)
        }

        valid(&self.root, u64::MAX)
    }
}

impl Default for LineSizeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LineSizeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSizeIndex")
            .field("size", &self.size())
            .field("total_bytes", &self.total_bytes())
            .finish()
    }
}
