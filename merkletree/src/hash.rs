//! Pluggable hashing for tree nodes.
//!
//! A [`HashProvider`] hashes the in-order concatenation of one or more byte
//! slices into a digest of fixed length. Leaves are hashed as
//! `digest(&[leaf])`, internal nodes as `digest(&[left, right])`.

use blake2::{
    Blake2b,
    digest::{OutputSizeUser, consts::U32},
};
use sha2::{Digest as _, Sha256};

/// A digest produced by a [`HashProvider`]. Always `digest_length()` bytes.
pub type Digest = Vec<u8>;

type Blake2b256 = Blake2b<U32>;

/// Deterministic digest over the concatenation of its inputs.
pub trait HashProvider: Send + Sync {
    /// Hash the concatenation of `parts`, in the given order.
    fn digest(&self, parts: &[&[u8]]) -> Digest;

    /// Length in bytes of every digest this provider returns.
    fn digest_length(&self) -> usize;
}

/// BLAKE3 with 32-byte output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3Hasher;

impl HashProvider for Blake3Hasher {
    fn digest(&self, parts: &[&[u8]]) -> Digest {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().as_bytes().to_vec()
    }

    fn digest_length(&self) -> usize {
        blake3::OUT_LEN
    }
}

/// SHA-256.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl HashProvider for Sha256Hasher {
    fn digest(&self, parts: &[&[u8]]) -> Digest {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().to_vec()
    }

    fn digest_length(&self) -> usize {
        <Sha256 as OutputSizeUser>::output_size()
    }
}

/// BLAKE2b with 32-byte output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake2bHasher;

impl HashProvider for Blake2bHasher {
    fn digest(&self, parts: &[&[u8]]) -> Digest {
        let mut hasher = Blake2b256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().to_vec()
    }

    fn digest_length(&self) -> usize {
        <Blake2b256 as OutputSizeUser>::output_size()
    }
}

/// The digest stored in padding slots.
pub fn zero_digest(length: usize) -> Digest {
    vec![0u8; length]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake3_known_digest() {
        let digest = Blake3Hasher.digest(&[b"Consensys"]);
        assert_eq!(
            hex::encode(digest),
            "37d279155d7afba864451532eb236103d43b8d410806322ea36be2b8f7731dfd"
        );
    }

    #[test]
    fn test_multi_part_digest_hashes_concatenation() {
        for provider in [
            &Blake3Hasher as &dyn HashProvider,
            &Sha256Hasher,
            &Blake2bHasher,
        ] {
            let parts = provider.digest(&[b"Merle-tree", b"Blake3", b"Consensys"]);
            let joined = provider.digest(&[b"Merle-treeBlake3Consensys"]);
            assert_eq!(parts, joined);
            assert_eq!(parts.len(), provider.digest_length());
        }
    }

    #[test]
    fn test_blake3_concatenated_known_digest() {
        let digest = Blake3Hasher.digest(&[b"Merle-tree", b"Blake3", b"Consensys"]);
        assert_eq!(
            hex::encode(digest),
            "fdb68f8b8859b0ab239ad58606e1d316d007a83e867dc0842af4cd9962147651"
        );
    }

    #[test]
    fn test_sha256_known_digest() {
        assert_eq!(
            hex::encode(Sha256Hasher.digest(&[b"Consensys"])),
            "407eb30a82ee43a0e8e6dfde12402f544e034e4a6b0361301fdea3fa44162000"
        );
    }

    #[test]
    fn test_blake2b_known_digest() {
        assert_eq!(
            hex::encode(Blake2bHasher.digest(&[b"Consensys"])),
            "fe2888a327492f4fcb15db5872b18ebd03e0503f8938dd2f1c59854f2545a546"
        );
    }

    #[test]
    fn test_digest_length_matches_output() {
        let providers: [&dyn HashProvider; 3] = [&Blake3Hasher, &Sha256Hasher, &Blake2bHasher];
        for provider in providers {
            assert_eq!(provider.digest(&[b"Foo"]).len(), provider.digest_length());
            assert_eq!(provider.digest_length(), 32);
        }
    }

    #[test]
    fn test_zero_digest() {
        assert_eq!(zero_digest(4), vec![0, 0, 0, 0]);
    }
}
