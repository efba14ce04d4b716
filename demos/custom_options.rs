//! Customizing encoding with GridOptions.
//!
//! Run with: cargo run --example custom_options

use chrono::{TimeZone, Utc};
use serde_grid::{decode, encode_with_options, CellAddress, DateSystem, GridOptions, Value, ValueMap};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let released = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).single().ok_or("invalid date")?;

    let mut release = ValueMap::new();
    release.insert("version".to_string(), Value::from("1.0.0"));
    release.insert("released".to_string(), Value::Date(released));
    let mut root = ValueMap::new();
    root.insert("release".to_string(), Value::Object(release));
    let data = Value::Object(root);

    for (label, options) in [
        ("Default", GridOptions::default()),
        (
            "1904 dates, ISO format, no merges",
            GridOptions::new()
                .with_date_system(DateSystem::Excel1904)
                .with_date_format("yyyy-mm-dd hh:mm")
                .with_sheet_name("Releases")
                .with_merge_cells(false),
        ),
    ] {
        let grid = encode_with_options(&data, options)?;
        println!("{label}:");
        println!("  sheet:  {}", grid.sheet_name());
        println!("  merges: {}", grid.merges().len());

        let cell = grid.get(&CellAddress::parse("C2")?).ok_or("no date cell")?;
        println!(
            "  date:   {} (format {:?})",
            cell.key_text(),
            cell.number_format.as_deref().unwrap_or("General")
        );

        // Dates come back as plain day serials.
        println!("  decoded: {}\n", decode(&grid)?);
    }

    Ok(())
}
