//! Measuring how well a key set separated.

use std::fmt;

use crate::{
    Node,
    Slot,
};

/// The post-order accounting of a built structure: total and empty slot
/// counts, and the worst-case lookup depth.
///
/// Produced by [`Tree::report`](crate::Tree::report) and
/// [`CharTable::report`](crate::CharTable::report). The numbers are cheap
/// to compute and make good regression signals: a jump in `max_depth` or a
/// drop in `slot_efficiency` on a known key set means the separation got
/// worse.
///
/// # Examples
/// ```
/// use acph::Tree;
///
/// let tree = Tree::from_entries([("AA", 0), ("AB", 1), ("BA", 2), ("BB", 3)])
///     .expect("distinct keys");
/// let report = tree.report();
/// assert_eq!(6, report.slots());
/// assert_eq!(0, report.empty_slots());
/// assert_eq!(100, report.slot_efficiency());
/// assert_eq!(2, report.max_depth());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    slots: usize,
    empty_slots: usize,
    max_depth: usize,
}

impl Report {
    pub(crate) fn empty() -> Self {
        Self {
            slots: 0,
            empty_slots: 0,
            max_depth: 0,
        }
    }

    pub(crate) fn for_single_node(slots: usize, empty_slots: usize) -> Self {
        Self {
            slots,
            empty_slots,
            max_depth: usize::from(slots > 0),
        }
    }

    pub(crate) fn for_node<P>(node: &Node<P>) -> Self {
        let mut slots = node.slots.len();
        let mut empty_slots = 0;
        let mut deepest_child = 0;
        for slot in &node.slots {
            match slot {
                Slot::Empty => empty_slots += 1,
                Slot::Leaf {
                    ..
                } => {}
                Slot::Branch {
                    child, ..
                } => {
                    let child_report = Self::for_node(child);
                    slots += child_report.slots;
                    empty_slots += child_report.empty_slots;
                    deepest_child = deepest_child.max(child_report.max_depth);
                }
            }
        }
        Self {
            slots,
            empty_slots,
            max_depth: deepest_child + 1,
        }
    }

    /// Returns the total slot count over all nodes.
    #[must_use]
    #[inline]
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Returns the number of empty slots over all nodes.
    #[must_use]
    #[inline]
    pub fn empty_slots(&self) -> usize {
        self.empty_slots
    }

    /// Returns the number of occupied slots over all nodes.
    #[must_use]
    #[inline]
    pub fn occupied_slots(&self) -> usize {
        self.slots - self.empty_slots
    }

    /// Returns the maximum number of nodes on any root-to-leaf path, which
    /// is the worst-case number of node visits a lookup can make.
    #[must_use]
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the share of occupied slots as an integer percentage,
    /// `occupied * 100 / total`; 0 for an empty structure.
    #[must_use]
    pub fn slot_efficiency(&self) -> usize {
        if self.slots == 0 {
            0
        } else {
            self.occupied_slots() * 100 / self.slots
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "slots used: {}, slot efficiency: {}%, max comparisons: {}",
            self.slots,
            self.slot_efficiency(),
            self.max_depth,
        ))
    }
}
