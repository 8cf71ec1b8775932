//! An adaptive columnar perfect-hash map over immutable byte-string keys.
//!
//! The map is built once from a set of distinct keys with attached payloads
//! and is read-only afterwards. Every node of the built tree resolves one
//! byte of the key through a collision-free hash table, so a lookup walks a
//! short chain of nodes and compares the full key at most once, at the leaf
//! it lands on. There is no collision chaining.
//!
//! Construction works column by column. For the keys routed into a node the
//! builder picks the byte offset (the *column*) that separates them best,
//! then searches for the smallest hash table in which all distinct bytes at
//! that column land in distinct slots. Keys that share a byte at the chosen
//! column are pushed down into a child node built over the remaining
//! columns, until every key sits alone in its slot. Keys shorter than a
//! node's column contribute a synthetic `0` byte, so variable-length keys
//! (including the empty key) are fully supported; key equality is length
//! plus bytes.
//!
//! # Usage and examples
//! Build a tree from anything yielding `(key, payload)` pairs where the key
//! is viewable as bytes:
//! ```
//! use acph::Tree;
//!
//! let tree = Tree::from_entries([
//!     ("Mr Smith", 0_i64),
//!     ("Mr Jones", 1),
//!     ("Ms Leonard", 2),
//!     ("Ms James", 3),
//! ])
//! .expect("all keys are distinct");
//!
//! assert_eq!(Some(&1), tree.get("Mr Jones"));
//! assert!(tree.get("Mr Smythe").is_none());
//! ```
//!
//! Fixed-width keys are adapted by taking their in-memory byte
//! representation:
//! ```
//! use acph::{
//!     integer_key,
//!     Tree,
//! };
//!
//! let tree = Tree::from_entries([
//!     (integer_key(9000), "nine thousand"),
//!     (integer_key(100_000), "one hundred thousand"),
//! ])
//! .expect("all keys are distinct");
//!
//! assert_eq!(Some(&"nine thousand"), tree.get(integer_key(9000)));
//! assert!(tree.get(integer_key(0)).is_none());
//! ```
//!
//! Duplicate keys are a construction error, not a silent overwrite:
//! ```
//! use acph::Tree;
//!
//! let err = Tree::from_entries([("AB", 0), ("AB", 1)]).unwrap_err();
//! assert_eq!(b"AB", err.key());
//! ```
//!
//! # The per-node hash function
//! Every node hashes one byte `c` with a single-byte multiplier `a` (its
//! *prime*) into a table of `m + 1` slots, where `m` is the node's
//! zero-based width:
//!
//! + `m == 255` (256 slots): identity, the byte is its own slot index;
//! + otherwise: `(((a - 1) XOR c) * a) mod (m + 1)`, with the XOR on 8-bit
//!   values and the product widened to 16 bits before the modulus.
//!
//! The exact expression, and the fixed table of candidate primes the
//! builder probes, are part of this crate's contract: building the same
//! input twice, or rebuilding it elsewhere, yields structurally identical
//! trees. [`hash_byte`] exposes the function.
//!
//! # What this crate is not
//! The structure is static: there is no insert, update, or delete after
//! construction, and no persistence format. Lookups and reports are pure
//! reads and can be shared freely across threads. The hash function has no
//! cryptographic properties whatsoever.

use std::fmt;

pub mod char_table;
mod format;
pub mod report;
mod search;

pub use char_table::CharTable;
pub use format::DisplayWith;
pub use report::Report;

/// Calculates the slot index of `byte` in a node with the given `prime` and
/// zero-based `width`.
///
/// For `width == 255` (a 256-slot node) this is the identity function.
/// Otherwise it is `(((prime - 1) XOR byte) * prime) mod (width + 1)`, with
/// the XOR performed on 8-bit values and the multiplication widened to 16
/// bits before the modulus is taken. Narrowing the product to 8 bits first
/// would discard the high bits and produce a different (and much worse)
/// distribution.
///
/// This exact expression is contractual: a built tree can only be walked by
/// the function that built it.
///
/// # Examples
/// ```
/// use acph::hash_byte;
///
/// // A 256-slot node addresses bytes directly.
/// assert_eq!(0x41, hash_byte(0x41, 7, 255));
///
/// // Everything else goes through the multiplicative mix.
/// assert_eq!(8, hash_byte(200, 13, 9));
/// ```
#[must_use]
pub fn hash_byte(byte: u8, prime: u8, width: u8) -> u8 {
    if width == 255 {
        return byte;
    }
    let mixed = prime.wrapping_sub(1) ^ byte;
    let product = u16::from(mixed) * u16::from(prime);
    (product % (u16::from(width) + 1)) as u8
}

/// Returns the key bytes of a 64-bit integer: its native-endian in-memory
/// representation.
///
/// Build and lookup must both go through this adapter (or agree on the
/// encoding some other way); the tree itself only ever sees the bytes.
///
/// # Examples
/// ```
/// use acph::{
///     integer_key,
///     Tree,
/// };
///
/// let tree = Tree::from_entries((1..=5).map(|i| (integer_key(i), i))).expect("distinct keys");
/// assert_eq!(Some(&3), tree.get(integer_key(3)));
/// ```
#[must_use]
pub fn integer_key(value: i64) -> [u8; 8] {
    value.to_ne_bytes()
}

/// Returns the key bytes of an IEEE-754 double: its native-endian in-memory
/// representation.
///
/// Two doubles are the same key exactly if their bit patterns are equal;
/// `0.0` and `-0.0` are therefore distinct keys, and a NaN only matches the
/// identical NaN bit pattern.
#[must_use]
pub fn real_key(value: f64) -> [u8; 8] {
    value.to_ne_bytes()
}

/// The error returned when the build input contains keys that cannot be
/// told apart.
///
/// Two keys collide if they are byte-for-byte identical, or if they differ
/// only by trailing zero bytes: a key shorter than an inspected column
/// projects a synthetic `0` there, so `b"AB"` and `b"AB\0"` look the same
/// in every column the builder can inspect.
#[derive(Debug)]
pub struct DuplicateKey {
    key: Box<[u8]>,
}

impl DuplicateKey {
    fn new(key: &[u8]) -> Self {
        Self {
            key: key.into(),
        }
    }

    /// Returns one of the keys of the colliding group.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "input keys are not distinct; key 0x{} is identical to (or differs only by trailing \
             zero bytes from) another input key",
            format::key_preview(&self.key),
        ))
    }
}

impl std::error::Error for DuplicateKey {}

/// One slot of a node: empty, a single resolved key, or a subtree of keys
/// that still share a byte at this node's column.
pub(crate) enum Slot<P> {
    Empty,
    Leaf {
        byte: u8,
        key: Box<[u8]>,
        payload: P,
    },
    Branch {
        byte: u8,
        child: Box<Node<P>>,
    },
}

/// A node of the built tree: a collision-free hash table over the bytes the
/// node's population carries at `column`.
pub(crate) struct Node<P> {
    pub(crate) column: usize,
    pub(crate) prime: u8,
    pub(crate) slots: Box<[Slot<P>]>,
}

impl<P> Node<P> {
    /// The zero-based width of this node's slot table.
    pub(crate) fn width(&self) -> u8 {
        (self.slots.len() - 1) as u8
    }

    /// The byte `key` carries at this node's column, or the synthetic `0`
    /// if the key is too short to reach it.
    pub(crate) fn discriminant(&self, key: &[u8]) -> u8 {
        key.get(self.column).copied().unwrap_or(0)
    }

    pub(crate) fn slot_of(&self, byte: u8) -> &Slot<P> {
        &self.slots[usize::from(hash_byte(byte, self.prime, self.width()))]
    }
}

/// An immutable perfect-hash map from byte-string keys to payloads.
///
/// Built once with [`Tree::from_entries`]; see the [crate documentation]
/// for the construction scheme. Lookups never mutate the tree, so a shared
/// reference can be used from any number of threads.
///
/// [crate documentation]: crate
pub struct Tree<P> {
    root: Option<Box<Node<P>>>,
    len: usize,
}

impl<P> Tree<P> {
    /// Builds a tree from an iterator of `(key, payload)` pairs.
    ///
    /// Keys are borrowed for the duration of the call and deep-copied into
    /// the leaves, so the tree is independent of the caller's buffers.
    /// Payloads are moved in as-is. An empty input builds an empty tree on
    /// which every lookup misses.
    ///
    /// # Errors
    /// Returns [`DuplicateKey`] if two input keys are byte-identical, or
    /// differ only by trailing zero bytes (such keys project the same byte
    /// in every column and cannot be separated). Nothing is retained from a
    /// failed build.
    ///
    /// # Examples
    /// ```
    /// use acph::Tree;
    ///
    /// let tree = Tree::from_entries([("AB", 1), ("ABC", 2)]).expect("distinct keys");
    /// assert_eq!(2, tree.len());
    /// assert_eq!(Some(&1), tree.get("AB"));
    /// // Equality includes the length: a prefix of a stored key is a miss.
    /// assert!(tree.get("A").is_none());
    /// ```
    pub fn from_entries<I, K>(entries: I) -> Result<Self, DuplicateKey>
    where
        I: IntoIterator<Item = (K, P)>,
        K: AsRef<[u8]>,
    {
        let (keys, payloads): (Vec<K>, Vec<P>) = entries.into_iter().unzip();
        let len = keys.len();
        if len == 0 {
            return Ok(Self {
                root: None,
                len: 0,
            });
        }
        let population: Vec<(&[u8], P)> = keys.iter().map(AsRef::as_ref).zip(payloads).collect();
        let root = build_node(population)?;
        Ok(Self {
            root: Some(root),
            len,
        })
    }

    /// Looks up `key`, returning a reference to its payload on a hit.
    ///
    /// The walk touches one node per resolved byte and performs at most one
    /// full-key comparison, at the leaf the key hashes to.
    ///
    /// # Examples
    /// ```
    /// use acph::Tree;
    ///
    /// let tree = Tree::from_entries([("one", 1), ("two", 2)]).expect("distinct keys");
    /// assert_eq!(Some(&2), tree.get("two"));
    /// assert_eq!(None, tree.get("three"));
    /// ```
    #[must_use]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&P> {
        let key = key.as_ref();
        let mut node = self.root.as_deref()?;
        loop {
            match node.slot_of(node.discriminant(key)) {
                Slot::Empty => return None,
                Slot::Leaf {
                    key: stored,
                    payload,
                    ..
                } => return (**stored == *key).then_some(payload),
                Slot::Branch {
                    child, ..
                } => node = child,
            }
        }
    }

    /// Returns if `key` is in the tree.
    #[must_use]
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// Returns the number of keys in the tree.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Runs the post-order slot and depth accounting over the tree.
    ///
    /// See [`Report`] for what is measured. The traversal is a pure read.
    ///
    /// # Examples
    /// ```
    /// use acph::Tree;
    ///
    /// let tree = Tree::from_entries([("A", 0)]).expect("distinct keys");
    /// let report = tree.report();
    /// assert_eq!(1, report.slots());
    /// assert_eq!(100, report.slot_efficiency());
    /// assert_eq!(1, report.max_depth());
    /// ```
    #[must_use]
    pub fn report(&self) -> Report {
        self.root
            .as_deref()
            .map_or_else(Report::empty, Report::for_node)
    }

    /// Renders the tree structure with a caller-supplied leaf formatter.
    ///
    /// The adapter prints one line per node (slot count, column, prime) and
    /// one line per slot, indented by depth; `leaf` is invoked with the
    /// stored key bytes and payload of every leaf. Useful for diagnosing
    /// how a key set was separated.
    ///
    /// # Examples
    /// ```
    /// use acph::Tree;
    ///
    /// let tree = Tree::from_entries([("AB", 1), ("ABC", 2)]).expect("distinct keys");
    /// let rendered = tree
    ///     .display_with(|f, key, payload| {
    ///         write!(f, "{}={payload}", String::from_utf8_lossy(key))
    ///     })
    ///     .to_string();
    /// assert!(rendered.contains("column: 2"));
    /// assert!(rendered.contains("AB=1"));
    /// ```
    pub fn display_with<F>(&self, leaf: F) -> DisplayWith<'_, P, F>
    where
        F: Fn(&mut fmt::Formatter<'_>, &[u8], &P) -> fmt::Result,
    {
        DisplayWith::new(self, leaf)
    }
}

/// Recursively builds the node separating `population`.
///
/// The population is non-empty and every `(key, payload)` pair is moved
/// into exactly one leaf or one child population. On a duplicate-key
/// failure everything built so far is dropped on unwind of the `?` chain,
/// so the caller never observes a partial tree.
fn build_node<P>(population: Vec<(&[u8], P)>) -> Result<Box<Node<P>>, DuplicateKey> {
    let len = population.len();
    debug_assert!(len > 0, "the builder is never invoked on an empty population");

    let (column, projection, distribution) = select_column(&population);

    if distribution.unique == 1 && len > 1 {
        // Every key carries the same byte in every inspectable column, so
        // at least two of them can never be separated.
        return Err(DuplicateKey::new(population[0].0));
    }

    let table = search::find_table(&projection, distribution);
    let width = (table.slots.len() - 1) as u8;

    // Route every entry to its slot, preserving input order per slot.
    let mut buckets: Vec<Vec<(&[u8], P)>> = table.slots.iter().map(|_| Vec::new()).collect();
    for (key, payload) in population {
        let byte = key.get(column).copied().unwrap_or(0);
        let slot = usize::from(hash_byte(byte, table.prime, width));
        buckets[slot].push((key, payload));
    }

    let mut slots = Vec::with_capacity(table.slots.len());
    for (shape, bucket) in table.slots.iter().zip(buckets) {
        let slot = match shape.count {
            0 => Slot::Empty,
            1 => {
                let (key, payload) = bucket
                    .into_iter()
                    .next()
                    .expect("a slot occupied by exactly one key has a matching input key");
                Slot::Leaf {
                    byte: shape.byte,
                    key: key.into(),
                    payload,
                }
            }
            _ => Slot::Branch {
                byte: shape.byte,
                child: build_node(bucket)?,
            },
        };
        slots.push(slot);
    }

    Ok(Box::new(Node {
        column,
        prime: table.prime,
        slots: slots.into_boxed_slice(),
    }))
}

/// Scans columns left to right and returns the most discriminating one:
/// the column whose most frequent projected byte is least frequent.
///
/// Keys shorter than the column project the synthetic byte `0`. The scan
/// stops at the first column no key reaches; that column is still analyzed
/// (for a population of one key it can be the winner). Earlier columns win
/// ties.
fn select_column<P>(population: &[(&[u8], P)]) -> (usize, Vec<u8>, search::Distribution) {
    let len = population.len();
    let mut projection = Vec::with_capacity(len);
    let mut best_column = 0;
    let mut best_projection = Vec::new();
    let mut best_distribution = search::Distribution {
        unique: 0,
        peak: len + 1,
    };

    let mut column = 0;
    loop {
        projection.clear();
        let mut exhausted = true;
        for (key, _) in population {
            let byte = match key.get(column) {
                Some(&byte) => {
                    exhausted = false;
                    byte
                }
                None => 0,
            };
            projection.push(byte);
        }
        let distribution = search::analyze(&projection);
        if distribution.peak < best_distribution.peak {
            best_column = column;
            best_distribution = distribution;
            best_projection.clone_from(&projection);
        }
        if exhausted {
            break;
        }
        column += 1;
    }

    (best_column, best_projection, best_distribution)
}
