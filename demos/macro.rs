//! Building trees with the tree! macro and encoding them.
//!
//! Run with: cargo run --example macro

use serde_grid::{decode, encode, tree};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let inventory = tree!({
        "warehouse": "north",
        "bins": [
            {"sku": "A-100", "count": 12},
            {"sku": "B-200", "count": 0}
        ],
        "audited": true
    });

    let grid = encode(&inventory)?;
    for (address, cell) in &grid {
        println!("{:<4} [{}] {}", address.to_string(), cell.cell_type().as_str(), cell.key_text());
    }

    let back = decode(&grid)?;
    assert_eq!(back, inventory);
    println!("\nDecoded: {}", back);

    Ok(())
}
