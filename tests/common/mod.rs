use rayportal_engine::{Portal, World};
use std::sync::Arc;

pub const SIZE: usize = 15;

/// A SIZE x SIZE grid with solid border rows/columns and an empty interior.
pub fn bordered_rows() -> Vec<Vec<u8>> {
    (0..SIZE)
        .map(|y| {
            (0..SIZE)
                .map(|x| (x == 0 || y == 0 || x == SIZE - 1 || y == SIZE - 1) as u8)
                .collect()
        })
        .collect()
}

/// Bordered world with the given portal pairs registered as-is.
pub fn bordered_world(pairs: &[(Portal, Portal)]) -> Arc<World> {
    let mut builder = World::builder();
    builder.load_grid(&bordered_rows()).expect("bordered grid");
    for (a, b) in pairs {
        builder.register_portal(*a, *b).expect("portal pair");
    }
    Arc::new(builder.build().expect("world"))
}
