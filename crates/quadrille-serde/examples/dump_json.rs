//! Builds a small quadtree and prints its JSON representation.
//!
//! Run with: `cargo run -p quadrille-serde --example dump_json`

use glam::Vec2;
use quadrille::{OutOfBoundsPolicy, QuadTree};
use quadrille_serde::{to_json_pretty, tree_to_serial_value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Quadtree JSON Dump ===\n");

    let mut tree = QuadTree::new(100.0, 100.0, 2)?.with_policy(OutOfBoundsPolicy::EXPAND);

    tree.insert_all([
        (Vec2::new(10.0, 10.0), "station-a"),
        (Vec2::new(20.0, 20.0), "station-b"),
        (Vec2::new(30.0, 30.0), "station-c"),
        (Vec2::new(80.0, 75.0), "station-d"),
    ])?;

    // Out of bounds: the expanding policy grows the tree to cover it
    tree.insert(Vec2::new(150.0, 40.0), "station-e")?;

    println!(
        "{} points indexed over {}x{}",
        tree.len(),
        tree.width(),
        tree.height()
    );

    let nearby: Vec<_> = tree
        .query_radius(Vec2::new(25.0, 25.0), 10.0)
        .map(|(_, label)| *label)
        .collect();
    println!("Within 10 units of (25, 25): {nearby:?}\n");

    let serial = tree_to_serial_value(&tree)?;
    println!("{}", to_json_pretty(&serial)?);

    Ok(())
}
