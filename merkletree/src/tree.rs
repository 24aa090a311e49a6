use std::{fmt, sync::Arc};

use log::{debug, trace};
use merkletree_costs::{CostResult, CostsExt, OperationCost};
use merkletree_visualize::DebugBytes;

use crate::{
    Error,
    config::HashAlgorithm,
    hash::{Digest, HashProvider, zero_digest},
};

/// A binary Merkle tree packed into a flat array of digests.
///
/// Positions are one-indexed: the root lives at 1 and the children of `i`
/// are `2i` and `2i+1`. With `branches` the smallest power of two holding
/// every leaf, leaf digests occupy `[branches, branches + leaf_count)` and
/// the remaining slots up to `2 * branches - 1` hold zero digests. Position 0
/// is never read.
///
/// The shape is fixed at construction; [`update`](Self::update) only rewrites
/// digests along one leaf-to-root path.
#[derive(Clone)]
pub struct MerkleTree {
    hasher: Arc<dyn HashProvider>,
    leaves: Vec<Vec<u8>>,
    nodes: Vec<Digest>,
    branches: usize,
}

/// Collects the inputs of a [`MerkleTree`].
#[derive(Default, Clone)]
pub struct TreeBuilder {
    leaves: Vec<Vec<u8>>,
    hasher: Option<Arc<dyn HashProvider>>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append leaves in order.
    pub fn leaves<I, L>(mut self, leaves: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        self.leaves.extend(leaves.into_iter().map(Into::into));
        self
    }

    /// Append a single leaf.
    pub fn leaf(mut self, leaf: impl Into<Vec<u8>>) -> Self {
        self.leaves.push(leaf.into());
        self
    }

    pub fn hasher(mut self, hasher: Arc<dyn HashProvider>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn hash_algorithm(self, algorithm: HashAlgorithm) -> Self {
        self.hasher(algorithm.provider())
    }

    /// Build the tree.
    ///
    /// Fails with [`Error::EmptyLeaves`] when no leaf was given and with
    /// [`Error::MissingHashProvider`] when no hasher was set. On success the
    /// cost holds one byte hash per leaf and `branches - 1` node hashes.
    pub fn build(self) -> CostResult<MerkleTree, Error> {
        let mut cost = OperationCost::default();

        if self.leaves.is_empty() {
            return Err(Error::EmptyLeaves).wrap_with_cost(cost);
        }
        let Some(hasher) = self.hasher else {
            return Err(Error::MissingHashProvider).wrap_with_cost(cost);
        };

        let leaf_count = self.leaves.len();
        let branches = leaf_count.next_power_of_two();
        let digest_length = hasher.digest_length();

        let mut nodes: Vec<Digest> = vec![Digest::new(); 2 * branches];
        for (i, leaf) in self.leaves.iter().enumerate() {
            nodes[branches + i] = hasher.digest(&[leaf.as_slice()]);
            cost.hash_byte_calls += 1;
        }
        for padding in &mut nodes[branches + leaf_count..] {
            *padding = zero_digest(digest_length);
        }

        // With a single leaf there is nothing to merge: position 1 is the
        // leaf digest and therefore the root.
        for i in (1..branches).rev() {
            let parent = hasher.digest(&[nodes[2 * i].as_slice(), nodes[2 * i + 1].as_slice()]);
            nodes[i] = parent;
            cost.hash_node_calls += 1;
        }
        debug_assert_eq!(nodes[1].len(), digest_length);

        debug!(
            "built merkle tree: {} leaves, {} branches, {}-byte digests",
            leaf_count, branches, digest_length
        );

        Ok(MerkleTree {
            hasher,
            leaves: self.leaves,
            nodes,
            branches,
        })
        .wrap_with_cost(cost)
    }
}

impl MerkleTree {
    /// Build a tree from `leaves` hashed with `hasher`.
    pub fn new<I, L>(leaves: I, hasher: Arc<dyn HashProvider>) -> Result<Self, Error>
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        Self::builder().leaves(leaves).hasher(hasher).build().unwrap()
    }

    pub fn builder() -> TreeBuilder {
        TreeBuilder::new()
    }

    /// The root digest.
    pub fn root(&self) -> &[u8] {
        &self.nodes[1]
    }

    /// Number of real (non-padding) leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Leaf slots on the bottom level, padding included. Always a power of
    /// two.
    pub fn branches(&self) -> usize {
        self.branches
    }

    /// Number of levels above the leaves, which is also the proof length.
    pub fn height(&self) -> u32 {
        self.branches.trailing_zeros()
    }

    pub fn hasher(&self) -> &dyn HashProvider {
        self.hasher.as_ref()
    }

    pub fn leaves(&self) -> &[Vec<u8>] {
        &self.leaves
    }

    /// The raw data stored at leaf `index`.
    pub fn leaf(&self, index: u64) -> Option<&[u8]> {
        let index = usize::try_from(index).ok()?;
        self.leaves.get(index).map(Vec::as_slice)
    }

    /// The digest at an absolute array position (`1..2 * branches`).
    pub fn node(&self, position: usize) -> Option<&[u8]> {
        if position == 0 {
            return None;
        }
        self.nodes.get(position).map(Vec::as_slice)
    }

    /// The digest at `position`, for positions derived from a leaf index.
    ///
    /// Every position in `1..2 * branches` is filled at build time.
    pub(crate) fn node_at(&self, position: usize) -> &[u8] {
        debug_assert!(position >= 1 && position < 2 * self.branches);
        &self.nodes[position]
    }

    /// Whether `position` is a padding slot on the bottom level.
    pub fn is_padding(&self, position: usize) -> bool {
        position >= self.branches + self.leaves.len() && position < 2 * self.branches
    }

    /// Ordinal index of the first leaf equal to `data`.
    ///
    /// This is a linear scan over the stored leaves.
    pub fn leaf_index(&self, data: &[u8]) -> Option<u64> {
        self.leaves
            .iter()
            .position(|leaf| leaf.as_slice() == data)
            .map(|index| index as u64)
    }

    /// Replace the leaf at `index` and recompute every digest on its path to
    /// the root.
    ///
    /// Fails with [`Error::IndexOutOfBounds`] and leaves the tree untouched
    /// if `index >= leaf_count`. The cost is one byte hash plus one node hash
    /// per level.
    pub fn update(&mut self, index: u64, new_data: impl Into<Vec<u8>>) -> CostResult<(), Error> {
        let mut cost = OperationCost::default();

        let leaf_count = self.leaves.len();
        let leaf_position = match usize::try_from(index) {
            Ok(position) if position < leaf_count => position,
            _ => {
                return Err(Error::IndexOutOfBounds {
                    index,
                    leaf_count: leaf_count as u64,
                })
                .wrap_with_cost(cost);
            }
        };

        let new_data = new_data.into();
        let mut node_index = leaf_position + self.branches;
        self.nodes[node_index] = self.hasher.digest(&[new_data.as_slice()]);
        cost.hash_byte_calls += 1;
        self.leaves[leaf_position] = new_data;

        while node_index > 1 {
            let sibling_index = node_index ^ 1;
            let parent_index = node_index / 2;
            let (left, right) = if node_index % 2 == 0 {
                (node_index, sibling_index)
            } else {
                (sibling_index, node_index)
            };
            let parent = self
                .hasher
                .digest(&[self.nodes[left].as_slice(), self.nodes[right].as_slice()]);
            self.nodes[parent_index] = parent;
            cost.hash_node_calls += 1;
            node_index = parent_index;
        }

        trace!(
            "updated leaf {} of {}, new root {}",
            index,
            leaf_count,
            hex::encode(self.root())
        );

        Ok(()).wrap_with_cost(cost)
    }
}

impl fmt::Debug for MerkleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTree")
            .field("leaf_count", &self.leaves.len())
            .field("branches", &self.branches)
            .field("root", &DebugBytes(self.root().to_vec()))
            .finish()
    }
}
