#![no_main]

use glam::Vec2;
use libfuzzer_sys::fuzz_target;
use quadrille::{OutOfBoundsPolicy, QuadTree};

fuzz_target!(|points: Vec<(f32, f32)>| {
    // Insertion and querying should never panic on any input, and every
    // accepted point must remain queryable.
    let Ok(mut tree) = QuadTree::new(256.0, 256.0, 4) else {
        return;
    };
    tree.set_policy(OutOfBoundsPolicy::NONE);

    let mut stored = 0usize;
    for (i, (x, y)) in points.iter().copied().enumerate() {
        if tree.insert(Vec2::new(x, y), i).unwrap_or(false) {
            stored += 1;
        }
    }

    assert_eq!(tree.len(), stored);
    assert_eq!(tree.query_region(&tree.bounds()).count(), stored);
});
