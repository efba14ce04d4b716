//! Basic struct → grid → struct round trip.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_grid::{from_grid, to_grid};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
        },
        User {
            id: 43,
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
        },
    ];

    let grid = to_grid(&users)?;
    println!("Cells in reading order:");
    for (address, cell) in &grid {
        println!("  {:<4} {}", address.to_string(), cell.key_text());
    }
    if let Some(range) = grid.range() {
        println!("Used range: {}\n", range);
    }

    let users_back: Vec<User> = from_grid(&grid)?;
    assert_eq!(users, users_back);
    println!("✓ Round-trip successful");

    Ok(())
}
