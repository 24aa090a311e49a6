//! Inclusion proofs for a [`MerkleTree`].
//!
//! A `MerkleProof` carries the sibling digests met on the way from one leaf
//! to the root (leaf level first) and the leaf's ordinal index. The parity of
//! `index + 2^siblings.len()` at each level tells the verifier on which side
//! the sibling sits, so the order of `siblings` is significant.

use bincode::{Decode, Encode};

use crate::{Error, MerkleTree, hash::Digest};


/// Largest proof accepted by the verifier and the decoder. Positions are
/// `u64`, so a longer sibling path cannot describe a real tree.
pub(crate) const MAX_PROOF_SIBLINGS: usize = 63;

/// Upper bound on the size of an encoded proof accepted by
/// [`MerkleProof::decode_from_slice`].
const MAX_ENCODED_PROOF_BYTES: usize = 1024 * 1024;

/// An inclusion proof for a single leaf.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct MerkleProof {
    /// Sibling digests from the leaf level up to the level below the root.
    pub siblings: Vec<Digest>,
    /// Ordinal position of the proved leaf in the tree input.
    pub index: u64,
}

impl MerkleProof {
    pub fn new(siblings: Vec<Digest>, index: u64) -> Self {
        MerkleProof { siblings, index }
    }

    /// Generate a proof for the first leaf equal to `data`.
    ///
    /// Fails with [`Error::DataNotFound`] if no leaf matches.
    pub fn generate(tree: &MerkleTree, data: &[u8]) -> Result<Self, Error> {
        let index = tree.leaf_index(data).ok_or(Error::DataNotFound)?;
        Self::generate_at(tree, index)
    }

    /// Generate a proof for the leaf at ordinal `index` without scanning leaf
    /// values.
    ///
    /// The only failure is [`Error::IndexOutOfBounds`].
    pub fn generate_at(tree: &MerkleTree, index: u64) -> Result<Self, Error> {
        let leaf_count = tree.leaf_count();
        let leaf_position = match usize::try_from(index) {
            Ok(position) if position < leaf_count => position,
            _ => {
                return Err(Error::IndexOutOfBounds {
                    index,
                    leaf_count: leaf_count as u64,
                });
            }
        };

        let mut siblings = Vec::with_capacity(tree.height() as usize);
        let mut position = leaf_position + tree.branches();
        while position > 1 {
            siblings.push(tree.node_at(position ^ 1).to_vec());
            position /= 2;
        }

        Ok(MerkleProof { siblings, index })
    }

    /// Number of levels the proof climbs.
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    /// `true` for the proof of a single-leaf tree.
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, Error> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| Error::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    ///
    /// Rejects trailing bytes, over-long sibling paths and siblings of
    /// differing lengths.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<MAX_ENCODED_PROOF_BYTES>();
        let (proof, read): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| Error::InvalidProof(format!("decode error: {}", e)))?;
        if read != bytes.len() {
            return Err(Error::InvalidProof(format!(
                "{} trailing bytes after proof",
                bytes.len() - read
            )));
        }
        if proof.siblings.len() > MAX_PROOF_SIBLINGS {
            return Err(Error::InvalidProof(format!(
                "proof has {} siblings (max {})",
                proof.siblings.len(),
                MAX_PROOF_SIBLINGS
            )));
        }
        if let Some(first) = proof.siblings.first() {
            if proof.siblings.iter().any(|s| s.len() != first.len()) {
                return Err(Error::InvalidProof(
                    "sibling digests differ in length".into(),
                ));
            }
        }
        Ok(proof)
    }
}

impl MerkleTree {
    /// Generate a proof for the first leaf equal to `data`.
    pub fn generate_proof(&self, data: &[u8]) -> Result<MerkleProof, Error> {
        MerkleProof::generate(self, data)
    }

    /// Generate a proof for the leaf at ordinal `index`.
    pub fn generate_proof_at(&self, index: u64) -> Result<MerkleProof, Error> {
        MerkleProof::generate_at(self, index)
    }
}
