//! Huffman merge tree construction.
//!
//! # Historical Context
//!
//! David Huffman (1952) developed this algorithm as a term paper at MIT.
//! Repeatedly merging the two lightest subtrees yields leaf depths that
//! minimize the expected code length for the given weights.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;

/// Merge tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeNode {
    /// A symbol weighted by its frequency.
    Leaf {
        /// The symbol.
        symbol: char,
        /// Occurrence count.
        weight: u64,
    },
    /// The merge of two subtrees.
    Internal {
        /// Sum of both children's weights.
        weight: u64,
        /// First node removed from the queue.
        left: Box<MergeNode>,
        /// Second node removed from the queue.
        right: Box<MergeNode>,
    },
}

impl MergeNode {
    /// Weight of the subtree.
    pub fn weight(&self) -> u64 {
        match self {
            MergeNode::Leaf { weight, .. } => *weight,
            MergeNode::Internal { weight, .. } => *weight,
        }
    }

    /// True for a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, MergeNode::Leaf { .. })
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            MergeNode::Leaf { .. } => 1,
            MergeNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Length of the longest root-to-leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            MergeNode::Leaf { .. } => 0,
            MergeNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn merge(left: MergeNode, right: MergeNode) -> Result<MergeNode> {
        let weight = left.weight().checked_add(right.weight()).ok_or_else(|| {
            Error::InvalidInput(format!(
                "merged weight {} + {} overflows u64",
                left.weight(),
                right.weight()
            ))
        })?;
        Ok(MergeNode::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

/// Priority queue entry. `seq` is the insertion counter used to break weight ties.
#[derive(Debug)]
struct Queued {
    seq: u64,
    node: MergeNode,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-priority queue: lighter first, then earlier insertion.
        (other.node.weight(), other.seq).cmp(&(self.node.weight(), self.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the merge tree for `frequencies`.
///
/// Leaves enter the queue in ascending symbol order. Equal weights leave the
/// queue in insertion order, and each merged node is inserted after every node
/// that already exists, so the tree is fully determined by the input.
///
/// # Errors
/// Returns `Error::InvalidInput` if `frequencies` is empty or the total
/// weight does not fit in a `u64`.
pub fn build_tree(frequencies: &FrequencyTable) -> Result<MergeNode> {
    if frequencies.is_empty() {
        return Err(Error::InvalidInput(
            "cannot build a merge tree without symbols".into(),
        ));
    }

    let mut pq = BinaryHeap::with_capacity(frequencies.len());
    let mut seq = 0u64;
    for (symbol, weight) in frequencies.iter() {
        pq.push(Queued {
            seq,
            node: MergeNode::Leaf { symbol, weight },
        });
        seq += 1;
    }

    while pq.len() > 1 {
        let (Some(first), Some(second)) = (pq.pop(), pq.pop()) else {
            break;
        };
        trace!(
            left = first.node.weight(),
            right = second.node.weight(),
            "merging nodes"
        );
        pq.push(Queued {
            seq,
            node: MergeNode::merge(first.node, second.node)?,
        });
        seq += 1;
    }

    pq.pop()
        .map(|q| q.node)
        .ok_or_else(|| Error::InvalidTree("priority queue drained before a root remained".into()))
}
