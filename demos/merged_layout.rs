//! How nesting turns into merged key cells.
//!
//! Run with: cargo run --example merged_layout

use serde_grid::{encode, tree, CellAddress, Grid};
use std::error::Error;

/// Renders the used range as a plain text table.
fn render(grid: &Grid) -> Result<String, Box<dyn Error>> {
    let Some(range) = grid.range() else {
        return Ok(String::from("(empty)"));
    };

    let mut out = String::from("     ");
    for column in 1..=range.end.column {
        out.push_str(&format!("{:<10}", serde_grid::address::number_to_letter(column)?));
    }
    out.push('\n');

    for row in 0..=range.end.row {
        out.push_str(&format!("{:<5}", row + 1));
        for column in 1..=range.end.column {
            let address = CellAddress::new(column, row);
            let text = grid
                .get(&address)
                .map(|cell| cell.key_text().into_owned())
                .unwrap_or_default();
            out.push_str(&format!("{:<10}", text));
        }
        out.push('\n');
    }
    Ok(out)
}

fn main() -> Result<(), Box<dyn Error>> {
    let data = tree!({
        "server": {
            "host": "10.0.0.5",
            "ports": [80, 443]
        },
        "owner": "ops"
    });

    let grid = encode(&data)?;
    println!("{}", render(&grid)?);

    println!("Merged key cells:");
    for merge in grid.merges() {
        println!("  {} ({} rows)", merge, merge.rows());
    }

    Ok(())
}
