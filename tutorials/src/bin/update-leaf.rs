use std::sync::Arc;

use merkletree::{Blake3Hasher, MerkleTree};

fn main() {
    env_logger::init();

    let mut tree =
        MerkleTree::new(["hello", "world", "merkle"], Arc::new(Blake3Hasher)).expect("build");
    let old_root = tree.root().to_vec();
    let old_proof = tree.generate_proof(b"merkle").expect("merkle is in the tree");
    println!("before update, root: {}", hex::encode(&old_root));

    // Replace leaf 2 in place. Only the digests on its path are rehashed,
    // and the cost says how many.
    let ctx = tree.update(old_proof.index, "newleaf");
    println!(
        "update hashed {} leaf and {} nodes",
        ctx.cost.hash_byte_calls, ctx.cost.hash_node_calls
    );
    ctx.value.expect("index is in bounds");
    println!("after update, root: {}", hex::encode(tree.root()));

    // The old proof still matches the old root, but not the new one.
    println!(
        "old proof against old root: {}",
        old_proof.verify(b"merkle", &old_root, tree.hasher())
    );
    println!(
        "old proof against new root: {}",
        old_proof.verify(b"merkle", tree.root(), tree.hasher())
    );

    let new_proof = tree.generate_proof(b"newleaf").expect("newleaf is in the tree");
    println!(
        "new proof against new root: {}",
        new_proof.verify(b"newleaf", tree.root(), tree.hasher())
    );

    // Out-of-range updates are rejected and change nothing.
    let result = tree.update(3, "nope").unwrap();
    println!("update at index 3: {:?}", result);
}
