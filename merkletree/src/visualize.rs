//! Human-readable renderings of trees and proofs: an indented text dump via
//! [`Visualize`] and a Graphviz export via [`MerkleTree::to_dot`].

use std::{
    collections::HashSet,
    fmt::Write as _,
    io::{Result, Write},
};

use merkletree_visualize::{ByteFormatter, Drawer, TruncatedHexFormatter, Visualize};

use crate::{MerkleProof, MerkleTree};

const PROVED_VALUE_COLOR: &str = "#00FFFF";
const SIBLING_COLOR: &str = "#FFFF00";
const PATH_COLOR: &str = "#C0C0C0";

/// Label formatting for [`MerkleTree::to_dot`].
pub struct DotOptions {
    /// Formats the raw leaf values.
    pub leaf_formatter: Box<dyn ByteFormatter>,
    /// Formats node digests.
    pub node_formatter: Box<dyn ByteFormatter>,
}

impl Default for DotOptions {
    fn default() -> Self {
        DotOptions {
            leaf_formatter: Box::new(TruncatedHexFormatter),
            node_formatter: Box::new(TruncatedHexFormatter),
        }
    }
}

impl DotOptions {
    pub fn with_leaf_formatter(mut self, formatter: impl ByteFormatter + 'static) -> Self {
        self.leaf_formatter = Box::new(formatter);
        self
    }

    pub fn with_node_formatter(mut self, formatter: impl ByteFormatter + 'static) -> Self {
        self.node_formatter = Box::new(formatter);
        self
    }
}

/// Positions touched by a proof: the siblings it carries and the path from
/// the proved leaf to the root.
struct ProofHighlight {
    value_index: usize,
    siblings: HashSet<usize>,
    path: HashSet<usize>,
}

impl ProofHighlight {
    fn new(tree: &MerkleTree, proof: &MerkleProof) -> Option<Self> {
        let value_index = usize::try_from(proof.index)
            .ok()
            .filter(|index| *index < tree.leaf_count())?;
        let mut siblings = HashSet::new();
        let mut path = HashSet::new();
        let mut position = value_index + tree.branches();
        path.insert(position);
        for _ in &proof.siblings {
            if position <= 1 {
                break;
            }
            siblings.insert(position ^ 1);
            position /= 2;
            path.insert(position);
        }
        Some(ProofHighlight {
            value_index,
            siblings,
            path,
        })
    }

    fn fill_for(&self, position: usize) -> Option<&'static str> {
        if self.siblings.contains(&position) {
            Some(SIBLING_COLOR)
        } else if self.path.contains(&position) {
            Some(PATH_COLOR)
        } else {
            None
        }
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

fn fill_attr(color: Option<&str>) -> String {
    color
        .map(|c| format!(" style=filled fillcolor=\"{}\"", c))
        .unwrap_or_default()
}

impl MerkleTree {
    /// Render the tree as a Graphviz `digraph`.
    ///
    /// Each leaf value is drawn as an oval pointing at its leaf digest, and
    /// every node points at its parent. With a proof, the proved value is
    /// filled cyan, the carried siblings yellow and the path to the root
    /// grey.
    pub fn to_dot(&self, proof: Option<&MerkleProof>, options: &DotOptions) -> String {
        let highlight = proof.and_then(|proof| ProofHighlight::new(self, proof));
        let fill = |position: usize| highlight.as_ref().and_then(|h| h.fill_for(position));
        let branches = self.branches();

        let mut out = String::new();
        out.push_str("digraph MerkleTree {\n");
        out.push_str("  rankdir = TB;\n");
        out.push_str("  node [shape=rectangle margin=\"0.2,0.2\"];\n");

        let mut bottom_rank = String::from("  {rank=same");
        for slot in 0..branches {
            let position = branches + slot;
            let digest = self.node(position).unwrap_or_default();
            if let Some(leaf) = self.leaves().get(slot) {
                let proved = highlight.as_ref().is_some_and(|h| h.value_index == slot);
                let _ = writeln!(
                    out,
                    "  data{} [shape=oval label=\"{}\"{}];",
                    slot,
                    escape(&options.leaf_formatter.format(leaf)),
                    fill_attr(proved.then_some(PROVED_VALUE_COLOR)),
                );
                let _ = writeln!(out, "  data{} -> {};", slot, position);
            }
            let _ = writeln!(
                out,
                "  {} [label=\"{}\"{}];",
                position,
                escape(&options.node_formatter.format(digest)),
                fill_attr(fill(position)),
            );
            if slot > 0 {
                let _ = writeln!(
                    out,
                    "  {} -> {} [style=invis arrowhead=none];",
                    position - 1,
                    position
                );
            }
            if branches > 1 {
                let _ = writeln!(out, "  {} -> {};", position, position / 2);
            }
            let _ = write!(bottom_rank, "; {}", position);
        }
        bottom_rank.push_str("};\n");
        out.push_str(&bottom_rank);

        for position in (1..branches).rev() {
            let digest = self.node(position).unwrap_or_default();
            let _ = writeln!(
                out,
                "  {} [label=\"{}\"{}];",
                position,
                escape(&options.node_formatter.format(digest)),
                fill_attr(fill(position)),
            );
            if position > 1 {
                let _ = writeln!(out, "  {} -> {};", position, position / 2);
            }
        }

        out.push_str("}\n");
        out
    }
}

impl Visualize for MerkleTree {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        drawer.write(
            format!(
                "merkle tree ({} leaves, {} branches)\nroot: ",
                self.leaf_count(),
                self.branches()
            )
            .as_bytes(),
        )?;
        drawer = self.root().visualize(drawer)?;
        drawer.down();
        for (index, leaf) in self.leaves().iter().enumerate() {
            drawer.write(format!("\nleaf {}: ", index).as_bytes())?;
            drawer = leaf.visualize(drawer)?;
        }
        let padding = self.branches() - self.leaf_count();
        if padding > 0 {
            drawer.write(format!("\n{} padding slots", padding).as_bytes())?;
        }
        drawer.up();
        Ok(drawer)
    }
}

impl Visualize for MerkleProof {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        drawer.write(format!("proof for leaf {}", self.index).as_bytes())?;
        drawer.down();
        for (level, sibling) in self.siblings.iter().enumerate() {
            drawer.write(format!("\nlevel {}: ", level).as_bytes())?;
            drawer = sibling.visualize(drawer)?;
        }
        drawer.up();
        Ok(drawer)
    }
}
