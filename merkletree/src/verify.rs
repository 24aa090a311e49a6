//! Proof verification.
//!
//! Pure functions: no tree is needed, only the proved data, the proof, the
//! expected root and the hash provider the tree was built with. This allows
//! checking against historical roots without instantiating their trees.

use merkletree_costs::{CostContext, CostsExt, OperationCost};

use crate::{
    hash::{Digest, HashProvider},
    proof::{MAX_PROOF_SIBLINGS, MerkleProof},
};

impl MerkleProof {
    /// Recompute the root committed to by this proof for `data`.
    ///
    /// Returns `None` when the proof cannot describe any tree: more than 63
    /// siblings, or an index outside the `2^siblings.len()` leaf slots.
    pub fn calculate_root<H>(&self, data: &[u8], hasher: &H) -> CostContext<Option<Digest>>
    where
        H: HashProvider + ?Sized,
    {
        let mut cost = OperationCost::default();

        if self.siblings.len() > MAX_PROOF_SIBLINGS {
            return None.wrap_with_cost(cost);
        }
        let branches = 1u64 << self.siblings.len();
        if self.index >= branches {
            return None.wrap_with_cost(cost);
        }

        let mut candidate = hasher.digest(&[data]);
        cost.hash_byte_calls += 1;

        let mut position = self.index + branches;
        for sibling in &self.siblings {
            candidate = if position % 2 == 0 {
                hasher.digest(&[candidate.as_slice(), sibling.as_slice()])
            } else {
                hasher.digest(&[sibling.as_slice(), candidate.as_slice()])
            };
            cost.hash_node_calls += 1;
            position >>= 1;
        }

        Some(candidate).wrap_with_cost(cost)
    }

    /// Check that `data` is committed to by `root`.
    ///
    /// A mismatch is an ordinary `false`, never an error.
    #[must_use = "Must use the result of the proof verification"]
    pub fn verify<H>(&self, data: &[u8], root: &[u8], hasher: &H) -> bool
    where
        H: HashProvider + ?Sized,
    {
        self.calculate_root(data, hasher)
            .unwrap()
            .is_some_and(|computed| computed.as_slice() == root)
    }
}

/// Check that `data` is committed to by `root` through `proof`.
#[must_use = "Must use the result of the proof verification"]
pub fn verify_proof<H>(data: &[u8], proof: &MerkleProof, root: &[u8], hasher: &H) -> bool
where
    H: HashProvider + ?Sized,
{
    proof.verify(data, root, hasher)
}
