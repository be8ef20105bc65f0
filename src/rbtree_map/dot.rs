use core::fmt::{self, Display, Write};

use alloc::string::{String, ToString};
use smallvec::SmallVec;

use super::RBTreeMap;
use crate::raw::Handle;

/// Depth-first work list. Red-black height stays small, so this rarely spills.
type Stack = SmallVec<[Handle; 32]>;

impl<K: Display, V> RBTreeMap<K, V> {
    /// Renders the tree shape as a Graphviz `graph`.
    ///
    /// Every entry becomes a circle labelled with its key; red nodes are drawn in
    /// red. Empty child slots are drawn as small squares so the black-height of
    /// each path can be counted by eye.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, ()), (1, ()), (3, ())]);
    /// let dot = map.to_dot();
    /// assert!(dot.starts_with("graph \"\" {"));
    /// assert!(dot.contains("[label=\"2\"]"));
    /// assert!(dot.contains("[label=\"1\",color=\"#ff0000\"]"));
    /// ```
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        // Writing into a String never fails.
        let _ = self.write_dot(&mut out);
        out
    }

    /// Writes the output of [`to_dot`](RBTreeMap::to_dot) into `out`.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `out`.
    pub fn write_dot<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("graph \"\" {\n")?;
        out.write_str("\tnode [fontsize=8,width=\".2\",height=\".2\",margin=0,shape=circle];\n")?;

        let mut leaves = 0usize;
        let mut stack = Stack::new();
        stack.extend(self.raw.root());

        while let Some(handle) = stack.pop() {
            let node = self.raw.node(handle);
            let id = handle.to_index();

            write!(out, "\tn{id} [label=\"")?;
            write_escaped(out, &node.key().to_string())?;
            out.write_char('"')?;
            if node.is_red() {
                out.write_str(",color=\"#ff0000\"")?;
            }
            out.write_str("];\n")?;

            if let Some(parent) = node.parent {
                writeln!(out, "\tn{} -- n{id};", parent.to_index())?;
            }

            // Right first so the left subtree is written first.
            for child in [node.right, node.left] {
                match child {
                    Some(child) => stack.push(child),
                    None => {
                        writeln!(out, "\tnull{leaves} [label=\"\",shape=square,width=\".1\",height=\".1\"];")?;
                        writeln!(out, "\tn{id} -- null{leaves};")?;
                        leaves += 1;
                    }
                }
            }
        }

        out.write_str("}\n")
    }
}

fn write_escaped<W: Write>(out: &mut W, label: &str) -> fmt::Result {
    for c in label.chars() {
        if matches!(c, '"' | '\\') {
            out.write_char('\\')?;
        }
        out.write_char(c)?;
    }
    Ok(())
}
