//! Persisting grids through a SheetContainer and FsStorage.
//!
//! Run with: cargo run --example file_roundtrip

use serde_grid::container::{read_file, write_file, FsStorage, SheetContainer};
use serde_grid::{tree, Grid, GridOptions};
use std::error::Error;

/// Stores grids as pretty-printed JSON.
struct JsonSheet;

impl SheetContainer for JsonSheet {
    type Error = serde_json::Error;

    fn read_grid(&self, bytes: &[u8]) -> Result<Grid, Self::Error> {
        serde_json::from_slice(bytes)
    }

    fn write_grid(&self, grid: &Grid) -> Result<Vec<u8>, Self::Error> {
        serde_json::to_vec_pretty(grid)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let data = tree!({
        "project": "atlas",
        "milestones": [
            {"name": "alpha", "done": true},
            {"name": "beta", "done": false}
        ]
    });

    let path = std::env::temp_dir().join("serde_grid_file_roundtrip.json");
    write_file(&JsonSheet, &FsStorage, &path, &data, GridOptions::default())?;
    println!("Wrote {}", path.display());

    let back = read_file(&JsonSheet, &FsStorage, &path)?;
    assert_eq!(back, data);
    println!("✓ Read back {}", back);

    std::fs::remove_file(&path)?;
    Ok(())
}
