//! Rendering the tree structure for diagnostics.

use std::fmt;

use crate::{
    Node,
    Slot,
    Tree,
};

/// How many key bytes are rendered before a preview is truncated.
const PREVIEW_BYTES: usize = 20;

/// Renders a byte as `0x41 ('A')`, dropping the character part when it is
/// not printable ASCII.
pub(crate) struct FmtByte(pub(crate) u8);

impl fmt::Display for FmtByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(byte) = *self;
        if (32..=126).contains(&byte) {
            f.write_fmt(format_args!("0x{byte:02x} ('{}')", char::from(byte)))
        } else {
            f.write_fmt(format_args!("0x{byte:02x}"))
        }
    }
}

/// Returns the hex preview of `key`, truncated to its first
/// [`PREVIEW_BYTES`] bytes.
pub(crate) fn key_preview(key: &[u8]) -> String {
    if key.len() > PREVIEW_BYTES {
        format!("{}...", hex::encode(&key[..PREVIEW_BYTES]))
    } else {
        hex::encode(key)
    }
}

/// The [`Display`](fmt::Display) adapter returned by
/// [`Tree::display_with`].
///
/// Walks the tree and prints one line per node and per slot, indenting by
/// depth; leaves are rendered by the caller-supplied closure.
pub struct DisplayWith<'a, P, F> {
    tree: &'a Tree<P>,
    leaf: F,
}

impl<'a, P, F> DisplayWith<'a, P, F>
where
    F: Fn(&mut fmt::Formatter<'_>, &[u8], &P) -> fmt::Result,
{
    pub(crate) fn new(tree: &'a Tree<P>, leaf: F) -> Self {
        Self {
            tree,
            leaf,
        }
    }
}

impl<P, F> fmt::Display for DisplayWith<'_, P, F>
where
    F: Fn(&mut fmt::Formatter<'_>, &[u8], &P) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tree.root.as_deref() {
            None => writeln!(f, "empty tree"),
            Some(root) => fmt_node(f, root, 0, &self.leaf),
        }
    }
}

fn indent(f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
    for _ in 0..level {
        f.write_str("   ")?;
    }
    Ok(())
}

fn fmt_node<P, F>(f: &mut fmt::Formatter<'_>, node: &Node<P>, level: usize, leaf: &F) -> fmt::Result
where
    F: Fn(&mut fmt::Formatter<'_>, &[u8], &P) -> fmt::Result,
{
    indent(f, level)?;
    writeln!(
        f,
        "slots: {}, column: {}, prime: {}",
        node.slots.len(),
        node.column,
        node.prime,
    )?;
    for (index, slot) in node.slots.iter().enumerate() {
        indent(f, level)?;
        match slot {
            Slot::Empty => writeln!(f, "slot {index}: empty")?,
            Slot::Leaf {
                byte,
                key,
                payload,
            } => {
                write!(f, "slot {index}: {} -> ", FmtByte(*byte))?;
                leaf(f, key, payload)?;
                writeln!(f)?;
            }
            Slot::Branch {
                byte,
                child,
            } => {
                writeln!(f, "slot {index}: {} ->", FmtByte(*byte))?;
                fmt_node(f, child, level + 1, leaf)?;
            }
        }
    }
    Ok(())
}

impl<P: fmt::Debug> fmt::Debug for Tree<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let adapter = self.display_with(|f, key, payload| {
            f.write_fmt(format_args!("0x{} -> {payload:?}", key_preview(key)))
        });
        fmt::Display::fmt(&adapter, f)
    }
}
