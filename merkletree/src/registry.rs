//! Named trees shared between callers.
//!
//! The map of names is behind a [`RwLock`] that is only held long enough to
//! look a tree up or swap it in; each tree sits behind its own [`Mutex`], so
//! operations on one name are serialized while different names proceed
//! independently.

use std::{collections::HashMap, sync::Arc};

use log::{debug, warn};
use merkletree_costs::{
    CostResult, CostsExt, OperationCost, cost_return_on_error, cost_return_on_error_no_add,
};
use parking_lot::{Mutex, RwLock};

use crate::{
    Error, MerkleProof, MerkleTree,
    config::RegistryConfig,
    hash::{Digest, HashProvider},
    visualize::DotOptions,
};

type SharedTree = Arc<Mutex<MerkleTree>>;

/// A `name -> tree` registry with per-tree locking.
pub struct TreeRegistry {
    config: RegistryConfig,
    hasher: Arc<dyn HashProvider>,
    trees: RwLock<HashMap<String, SharedTree>>,
}

impl Default for TreeRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl TreeRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        let hasher = config.hash_algorithm.provider();
        TreeRegistry {
            config,
            hasher,
            trees: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The provider every tree in this registry is built with.
    pub fn hasher(&self) -> &dyn HashProvider {
        self.hasher.as_ref()
    }

    /// Build a tree from `leaves` and register it under `name`, replacing any
    /// tree already registered there. Returns the new root.
    pub fn create<I, L>(&self, name: &str, leaves: I) -> Result<Digest, Error>
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        let tree = MerkleTree::new(leaves, Arc::clone(&self.hasher))?;
        let root = tree.root().to_vec();

        let mut trees = self.trees.write();
        if let Some(capacity) = self.config.max_trees {
            if !trees.contains_key(name) && trees.len() >= capacity {
                warn!("refusing to register tree {}: registry is full", name);
                return Err(Error::RegistryFull { capacity });
            }
        }
        if trees
            .insert(name.to_string(), Arc::new(Mutex::new(tree)))
            .is_some()
        {
            debug!("replaced tree {}", name);
        } else {
            debug!("registered tree {}", name);
        }
        Ok(root)
    }

    fn get(&self, name: &str) -> Result<SharedTree, Error> {
        self.trees
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownTree(name.to_string()))
    }

    /// Run `f` with exclusive access to the tree registered as `name`.
    pub fn with_tree<T>(&self, name: &str, f: impl FnOnce(&mut MerkleTree) -> T) -> Result<T, Error> {
        let tree = self.get(name)?;
        let mut guard = tree.lock();
        Ok(f(&mut guard))
    }

    pub fn root(&self, name: &str) -> Result<Digest, Error> {
        self.with_tree(name, |tree| tree.root().to_vec())
    }

    pub fn prove(&self, name: &str, data: &[u8]) -> Result<MerkleProof, Error> {
        self.with_tree(name, |tree| tree.generate_proof(data))?
    }

    /// Prove `data` against the current root of `name`.
    ///
    /// Data that is not in the tree verifies as `false`.
    pub fn verify(&self, name: &str, data: &[u8]) -> Result<bool, Error> {
        self.with_tree(name, |tree| match tree.generate_proof(data) {
            Ok(proof) => Ok(proof.verify(data, tree.root(), tree.hasher())),
            Err(Error::DataNotFound) => Ok(false),
            Err(e) => Err(e),
        })?
    }

    /// Replace leaf `index` of `name`. Returns the new root together with
    /// the hashing done by the update.
    pub fn update(
        &self,
        name: &str,
        index: u64,
        data: impl Into<Vec<u8>>,
    ) -> CostResult<Digest, Error> {
        let mut cost = OperationCost::default();
        let shared = cost_return_on_error_no_add!(&cost, self.get(name));
        let mut tree = shared.lock();
        cost_return_on_error!(&mut cost, tree.update(index, data));
        debug!("updated leaf {} of tree {}", index, name);
        Ok(tree.root().to_vec()).wrap_with_cost(cost)
    }

    /// Render `name` as a Graphviz graph highlighting the proof of `data`.
    pub fn visualize_proof(&self, name: &str, data: &[u8]) -> Result<String, Error> {
        self.with_tree(name, |tree| {
            let proof = tree.generate_proof(data)?;
            Ok(tree.to_dot(Some(&proof), &DotOptions::default()))
        })?
    }

    /// Unregister `name`, returning its tree if it was present.
    pub fn remove(&self, name: &str) -> Option<MerkleTree> {
        let tree = self.trees.write().remove(name)?;
        debug!("removed tree {}", name);
        Some(match Arc::try_unwrap(tree) {
            Ok(mutex) => mutex.into_inner(),
            Err(shared) => shared.lock().clone(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.trees.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.trees.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.trees.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{HashAlgorithm, hash::Sha256Hasher};

    #[test]
    fn test_create_prove_verify() {
        let registry = TreeRegistry::default();
        let root = registry
            .create("names", ["Foo", "Bar", "Baz"])
            .expect("create");
        assert_eq!(registry.root("names"), Ok(root.clone()));

        let proof = registry.prove("names", b"Bar").expect("prove");
        assert_eq!(proof.index, 1);
        assert!(proof.verify(b"Bar", &root, registry.hasher()));

        assert_eq!(registry.verify("names", b"Baz"), Ok(true));
        assert_eq!(registry.verify("names", b"Qux"), Ok(false));
        assert_matches!(registry.prove("names", b"Qux"), Err(Error::DataNotFound));
    }

    #[test]
    fn test_unknown_tree() {
        let registry = TreeRegistry::default();
        assert_matches!(registry.root("missing"), Err(Error::UnknownTree(name)) if name == "missing");
        assert_matches!(registry.verify("missing", b"Foo"), Err(Error::UnknownTree(_)));
        let ctx = registry.update("missing", 0, "Foo");
        assert!(ctx.cost.is_nothing());
        assert_matches!(ctx.value, Err(Error::UnknownTree(_)));
        assert!(registry.remove("missing").is_none());
    }

    #[test]
    fn test_update_through_registry() {
        let registry = TreeRegistry::default();
        let before = registry.create("t", ["Foo", "Bar", "Baz"]).expect("create");
        let old_proof = registry.prove("t", b"Baz").expect("prove");

        let ctx = registry.update("t", 2, "Qux");
        assert_eq!(
            ctx.cost,
            OperationCost {
                hash_byte_calls: 1,
                hash_node_calls: 2,
            }
        );
        let after = ctx.value.expect("update");
        assert_ne!(before, after);
        assert_eq!(registry.root("t"), Ok(after.clone()));
        assert!(!old_proof.verify(b"Baz", &after, registry.hasher()));
        assert!(old_proof.verify(b"Baz", &before, registry.hasher()));
        assert_eq!(registry.verify("t", b"Qux"), Ok(true));

        let ctx = registry.update("t", 3, "Quux");
        assert!(ctx.cost.is_nothing());
        assert_matches!(
            ctx.value,
            Err(Error::IndexOutOfBounds { index: 3, leaf_count: 3 })
        );
        assert_eq!(registry.root("t"), Ok(after));
    }

    #[test]
    fn test_create_replaces_existing_tree() {
        let registry = TreeRegistry::default();
        let first = registry.create("t", ["a", "b"]).expect("create");
        let second = registry.create("t", ["c"]).expect("replace");
        assert_ne!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.with_tree("t", |tree| tree.leaf_count()), Ok(1));
    }

    #[test]
    fn test_create_rejects_empty_leaves() {
        let registry = TreeRegistry::default();
        assert_matches!(
            registry.create("t", Vec::<Vec<u8>>::new()),
            Err(Error::EmptyLeaves)
        );
        assert!(!registry.contains("t"));
    }

    #[test]
    fn test_max_trees() {
        let registry = TreeRegistry::new(RegistryConfig {
            max_trees: Some(2),
            ..Default::default()
        });
        registry.create("a", ["1"]).expect("a");
        registry.create("b", ["2"]).expect("b");
        assert_matches!(
            registry.create("c", ["3"]),
            Err(Error::RegistryFull { capacity: 2 })
        );
        // Replacing an existing name does not need a free slot.
        registry.create("a", ["4"]).expect("replace a");
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);

        let removed = registry.remove("b").expect("b was registered");
        assert_eq!(removed.leaf(0), Some(b"2".as_slice()));
        registry.create("c", ["3"]).expect("slot freed");
        assert_eq!(registry.names(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_registry_uses_configured_algorithm() {
        let registry = TreeRegistry::new(RegistryConfig::with_hash_algorithm(HashAlgorithm::Sha256));
        let root = registry.create("t", ["Foo"]).expect("create");
        assert_eq!(root, Sha256Hasher.digest(&[b"Foo"]));
        assert_eq!(registry.config().hash_algorithm, HashAlgorithm::Sha256);
    }

    #[test]
    fn test_visualize_proof() {
        let registry = TreeRegistry::default();
        registry.create("t", ["Foo", "Bar", "Baz"]).expect("create");
        let dot = registry.visualize_proof("t", b"Foo").expect("dot");
        assert!(dot.starts_with("digraph MerkleTree {"));
        assert!(dot.contains("#00FFFF"));
        assert_matches!(registry.visualize_proof("t", b"Qux"), Err(Error::DataNotFound));
    }

    #[test]
    fn test_concurrent_updates_on_distinct_trees() {
        let registry = TreeRegistry::default();
        let names: Vec<String> = (0..4).map(|i| format!("tree-{}", i)).collect();
        for name in &names {
            registry
                .create(name, (0..8u8).map(|i| vec![i]))
                .expect("create");
        }

        std::thread::scope(|scope| {
            for name in &names {
                let registry = &registry;
                scope.spawn(move || {
                    for i in 0..8u8 {
                        registry
                            .update(name, u64::from(i), vec![i, 0xff])
                            .unwrap()
                            .expect("update");
                    }
                });
            }
        });

        let expected = MerkleTree::new(
            (0..8u8).map(|i| vec![i, 0xff]),
            registry.config().hash_algorithm.provider(),
        )
        .expect("tree");
        for name in &names {
            assert_eq!(registry.root(name), Ok(expected.root().to_vec()));
        }
        assert!(registry.verify("tree-3", &[7, 0xff]).expect("verify"));
    }

    #[test]
    fn test_concurrent_updates_on_one_tree() {
        let registry = TreeRegistry::default();
        registry
            .create("shared", (0..16u8).map(|i| vec![i]))
            .expect("create");

        std::thread::scope(|scope| {
            for worker in 0..4u8 {
                let registry = &registry;
                scope.spawn(move || {
                    for i in (worker..16).step_by(4) {
                        registry
                            .update("shared", u64::from(i), vec![i, worker])
                            .unwrap()
                            .expect("update");
                        assert!(registry.verify("shared", &[i, worker]).expect("verify"));
                    }
                });
            }
        });

        let expected = MerkleTree::new(
            (0..16u8).map(|i| vec![i, i % 4]),
            registry.config().hash_algorithm.provider(),
        )
        .expect("tree");
        assert_eq!(registry.root("shared"), Ok(expected.root().to_vec()));
    }
}
