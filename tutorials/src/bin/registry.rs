use log::info;
use merkletree::{RegistryConfig, TreeRegistry};

fn main() {
    env_logger::init();

    // The registry configuration is plain serde data.
    let config: RegistryConfig =
        serde_json::from_str(r#"{ "hash_algorithm": "sha256", "max_trees": 2 }"#)
            .expect("valid config");
    let registry = TreeRegistry::new(config);

    let root = registry
        .create("fruits", ["apple", "banana", "cherry"])
        .expect("create fruits");
    info!("created fruits with root {}", hex::encode(&root));
    registry
        .create("colors", ["red", "green"])
        .expect("create colors");

    // The registry is full; a third name is refused.
    match registry.create("shapes", ["circle"]) {
        Ok(_) => println!("unexpected: shapes registered"),
        Err(e) => println!("shapes: {}", e),
    }

    println!("trees: {:?}", registry.names());
    println!(
        "banana in fruits: {}",
        registry.verify("fruits", b"banana").expect("fruits exists")
    );

    let ctx = registry.update("fruits", 1, "blueberry");
    info!(
        "update rehashed {} leaf and {} nodes",
        ctx.cost.hash_byte_calls, ctx.cost.hash_node_calls
    );
    let new_root = ctx.value.expect("update fruits");
    println!("fruits root after update: {}", hex::encode(&new_root));
    println!(
        "banana in fruits: {}, blueberry in fruits: {}",
        registry.verify("fruits", b"banana").expect("fruits exists"),
        registry.verify("fruits", b"blueberry").expect("fruits exists")
    );

    if let Some(tree) = registry.remove("colors") {
        println!("removed colors with {} leaves", tree.leaf_count());
    }
    println!("trees: {:?}", registry.names());
}
