//! Binary Merkle tree packed into a flat array.
//!
//! Leaves are hashed into the bottom level of a complete binary tree whose
//! width is the next power of two; unused bottom slots hold zero digests and
//! are hashed like any other node. Internal nodes are
//! `H(left || right)` with a pluggable [`HashProvider`].
//!
//! # Core types
//!
//! - [`MerkleTree`] / [`TreeBuilder`]: construction, root, in-place update.
//! - [`MerkleProof`]: sibling path for one leaf; verification needs only
//!   the proof, the data, a root and the hash provider.
//! - [`TreeRegistry`]: named trees behind per-tree locks.
//!
//! Operations that hash report their work as a [`CostResult`].

#![warn(missing_docs)]

mod config;
mod error;
/// Hash providers.
pub mod hash;
mod proof;
mod registry;
mod tree;
mod verify;
/// Text and Graphviz renderings.
pub mod visualize;


pub use config::{HashAlgorithm, RegistryConfig};
pub use error::Error;
pub use hash::{Blake2bHasher, Blake3Hasher, Digest, HashProvider, Sha256Hasher};
pub use merkletree_costs::{CostContext, CostResult, CostsExt, OperationCost};
pub use proof::MerkleProof;
pub use registry::TreeRegistry;
pub use tree::{MerkleTree, TreeBuilder};
pub use verify::verify_proof;
pub use visualize::DotOptions;
