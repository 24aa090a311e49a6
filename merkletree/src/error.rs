use thiserror::Error;

/// Errors from Merkle tree operations.
///
/// Validation failures (`EmptyLeaves`, `MissingHashProvider`) mean no tree
/// was built. A mismatching proof is never an error; verification reports it
/// as `false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("the merkle tree should contain at least 1 piece of input")]
    EmptyLeaves,
    #[error("no hash provider was specified")]
    MissingHashProvider,
    #[error("data not found")]
    DataNotFound,
    #[error("index {index} out of bounds (leaf count {leaf_count})")]
    IndexOutOfBounds { index: u64, leaf_count: u64 },
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    #[error("no tree found named {0}")]
    UnknownTree(String),
    #[error("registry is full (capacity {capacity})")]
    RegistryFull { capacity: usize },
    #[error("unknown hash algorithm: {0}")]
    UnknownHashAlgorithm(String),
}

impl Error {
    /// Returns `true` for failures that prevented a tree from being built.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::EmptyLeaves | Error::MissingHashProvider)
    }
}
