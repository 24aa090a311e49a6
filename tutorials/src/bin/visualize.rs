use std::sync::Arc;

use merkletree::{Blake3Hasher, DotOptions, MerkleTree};
use merkletree_visualize::{Utf8Formatter, visualize_stdout};

fn main() {
    env_logger::init();

    let tree = MerkleTree::new(["Foo", "Bar", "Baz"], Arc::new(Blake3Hasher)).expect("build");

    // Indented text dump of the tree and of one proof.
    visualize_stdout(&tree);
    println!();
    let proof = tree.generate_proof(b"Baz").expect("Baz is in the tree");
    visualize_stdout(&proof);
    println!();

    // Graphviz output, e.g. `cargo run --bin visualize | dot -Tsvg > tree.svg`.
    let options = DotOptions::default().with_leaf_formatter(Utf8Formatter);
    print!("{}", tree.to_dot(Some(&proof), &options));
}
