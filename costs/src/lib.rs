#![deny(missing_docs)]
//! Interface crate to unify how the hashing work done by tree operations is
//! passed back to callers.

pub mod context;

use std::ops::{Add, AddAssign};

pub use context::{CostContext, CostResult, CostsExt};

/// Hashing work performed by an operation.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct OperationCost {
    /// How many times raw data (a leaf payload) was hashed.
    pub hash_byte_calls: u32,
    /// How many times two child digests were merged into a parent digest.
    pub hash_node_calls: u32,
}

impl OperationCost {
    /// Helper function to build default `OperationCost` with different
    /// `hash_byte_calls`.
    pub fn with_hash_byte_calls(hash_byte_calls: u32) -> Self {
        OperationCost {
            hash_byte_calls,
            ..Default::default()
        }
    }

    /// Helper function to build default `OperationCost` with different
    /// `hash_node_calls`.
    pub fn with_hash_node_calls(hash_node_calls: u32) -> Self {
        OperationCost {
            hash_node_calls,
            ..Default::default()
        }
    }

    /// Total number of hash provider invocations.
    pub fn hash_calls(&self) -> u32 {
        self.hash_byte_calls + self.hash_node_calls
    }

    /// Returns `true` if no hashing was performed.
    pub fn is_nothing(&self) -> bool {
        self.hash_calls() == 0
    }
}

impl Add for OperationCost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        OperationCost {
            hash_byte_calls: self.hash_byte_calls + rhs.hash_byte_calls,
            hash_node_calls: self.hash_node_calls + rhs.hash_node_calls,
        }
    }
}

impl AddAssign for OperationCost {
    fn add_assign(&mut self, rhs: Self) {
        self.hash_byte_calls += rhs.hash_byte_calls;
        self.hash_node_calls += rhs.hash_node_calls;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_costs() {
        let a = OperationCost::with_hash_byte_calls(3);
        let b = OperationCost::with_hash_node_calls(2);
        assert_eq!(
            a + b,
            OperationCost {
                hash_byte_calls: 3,
                hash_node_calls: 2,
            }
        );
    }

    #[test]
    fn test_add_assign_and_totals() {
        let mut cost = OperationCost::default();
        assert!(cost.is_nothing());
        cost += OperationCost::with_hash_node_calls(4);
        cost += OperationCost::with_hash_byte_calls(1);
        assert_eq!(cost.hash_calls(), 5);
        assert!(!cost.is_nothing());
    }
}
