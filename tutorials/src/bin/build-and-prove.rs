use log::info;
use merkletree::{HashAlgorithm, MerkleTree, verify_proof};

fn main() {
    env_logger::init();

    // Build a tree over three leaves. Three is not a power of two, so the
    // bottom level gets one zero-digest padding slot.
    let leaves = ["Foo", "Bar", "Baz"];
    let tree = MerkleTree::builder()
        .leaves(leaves)
        .hash_algorithm(HashAlgorithm::Blake3)
        .build()
        .unwrap()
        .expect("successful build");
    println!("root: {}", hex::encode(tree.root()));
    println!(
        "{} leaves, {} branches, height {}",
        tree.leaf_count(),
        tree.branches(),
        tree.height()
    );

    // Prove every leaf and check the proofs against the root only.
    for leaf in leaves {
        let proof = tree
            .generate_proof(leaf.as_bytes())
            .expect("leaf is in the tree");
        let valid = verify_proof(leaf.as_bytes(), &proof, tree.root(), tree.hasher());
        info!("proved {} at index {}", leaf, proof.index);
        println!(
            "{} -> index {}, {} siblings, valid: {}",
            leaf,
            proof.index,
            proof.len(),
            valid
        );
    }

    // A proof can be shipped as bytes and checked elsewhere.
    let proof = tree.generate_proof(b"Bar").expect("Bar is in the tree");
    let bytes = proof.encode_to_vec().expect("encode proof");
    println!("encoded proof for Bar: {}", hex::encode(&bytes));

    let decoded = merkletree::MerkleProof::decode_from_slice(&bytes).expect("decode proof");
    println!(
        "decoded proof verifies Bar: {}, verifies Qux: {}",
        decoded.verify(b"Bar", tree.root(), tree.hasher()),
        decoded.verify(b"Qux", tree.root(), tree.hasher())
    );

    // Data that was never inserted cannot be proved.
    match tree.generate_proof(b"Qux") {
        Ok(_) => println!("unexpected proof for Qux"),
        Err(e) => println!("Qux: {}", e),
    }
}
