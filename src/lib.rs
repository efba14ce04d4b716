//! # serde_grid
//!
//! A positional codec between nested JSON-like trees and flat spreadsheet cell
//! grids.
//!
//! ## How a tree becomes a grid
//!
//! Each object entry takes one row: the key in one column, the value in the
//! next. A nested object or array starts one column further right, on the
//! same row as its key, and the key's cell is merged down across every row
//! the nested block uses. Arrays are written as objects keyed `"0"`, `"1"`, ….
//!
//! ```text
//! {"user": {"name": "Ada", "langs": ["en", "fr"]}, "active": true}
//!
//!     A        B       C     D
//! 1   user     name    Ada
//! 2            langs   0     en
//! 3                    1     fr
//! 4   active   TRUE
//! ```
//!
//! There is no schema and no type marker beyond each cell's own value type.
//! Decoding walks the same layout back, inferring an array wherever the first
//! key of a block is a non-negative integer.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_grid::{from_grid, to_grid};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     tags: vec!["admin".to_string(), "ops".to_string()],
//! };
//!
//! let grid = to_grid(&user).unwrap();
//! assert_eq!(grid.range().unwrap().to_string(), "A1:C4");
//!
//! let back: User = from_grid(&grid).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! ### Dynamic Values with tree! Macro
//!
//! ```rust
//! use serde_grid::{decode, encode, tree};
//!
//! let data = tree!({
//!     "name": "Alice",
//!     "scores": [90, 85],
//!     "active": true
//! });
//!
//! let grid = encode(&data).unwrap();
//! assert_eq!(decode(&grid).unwrap(), data);
//! ```
//!
//! ## What does not round-trip
//!
//! - `null` is encoded as a missing value cell; decoding such a grid fails
//!   with [`Error::MissingValue`]
//! - empty objects and arrays leave no trace in the grid
//! - dates are stored as day serials and come back as numbers
//! - an object whose first key looks like an index comes back as an array
//!
//! ## Persistence
//!
//! Reading and writing actual spreadsheet files is left to a
//! [`SheetContainer`] implementation; see the [`container`] module.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - struct to grid and back
//! - **`macro.rs`** - building trees with the tree! macro
//! - **`merged_layout.rs`** - how nesting turns into merged key cells
//! - **`dynamic_values.rs`** - walking decoded values
//! - **`custom_options.rs`** - date systems, sheet names and merges
//! - **`file_roundtrip.rs`** - persisting grids through a container
//!
//! Run any example with: `cargo run --example <name>`

pub mod address;
pub mod cell;
pub mod container;
pub mod de;
pub mod error;
pub mod grid;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod value;

pub use address::CellAddress;
pub use cell::{Cell, CellType, CellValue};
pub use container::{read_file, write_file, ByteStorage, FsStorage, SheetContainer};
pub use de::{GridDeserializer, ValueDeserializer};
pub use error::{Error, Result, SharedError};
pub use grid::{CellRange, Grid, GridBuilder, MergeRegion};
pub use map::ValueMap;
pub use options::{DateSystem, GridOptions};
pub use ser::{GridSerializer, ValueSerializer};
pub use value::{Number, Value};

use serde::{Deserialize, Serialize};

/// Encode a tree into a grid with default options.
///
/// # Examples
///
/// ```rust
/// use serde_grid::{encode, tree};
///
/// let grid = encode(&tree!({"a": 1, "b": 2})).unwrap();
/// assert_eq!(grid.len(), 4);
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if the root is not an object or array.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(value: &Value) -> Result<Grid> {
    encode_with_options(value, GridOptions::default())
}

/// Encode a tree into a grid with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_grid::{encode_with_options, tree, GridOptions};
///
/// let options = GridOptions::new().with_sheet_name("Report");
/// let grid = encode_with_options(&tree!([1, 2, 3]), options).unwrap();
/// assert_eq!(grid.sheet_name(), "Report");
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if the root is not an object or array.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_with_options(value: &Value, options: GridOptions) -> Result<Grid> {
    GridSerializer::new(options).encode(value)
}

/// Decode a grid back into a tree.
///
/// # Examples
///
/// ```rust
/// use serde_grid::{decode, Cell, Grid, tree};
///
/// let grid = Grid::builder()
///     .cell("A1", Cell::string("name"))
///     .unwrap()
///     .cell("B1", Cell::string("Alice"))
///     .unwrap()
///     .build();
///
/// assert_eq!(decode(&grid).unwrap(), tree!({"name": "Alice"}));
/// ```
///
/// # Errors
///
/// Returns an error naming the offending cell if the grid does not follow
/// the key/value layout, see [`GridDeserializer::decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(grid: &Grid) -> Result<Value> {
    GridDeserializer::new(grid).decode()
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_grid::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Convert a [`Value`] into any `T: Deserialize`.
///
/// # Examples
///
/// ```rust
/// use serde_grid::{from_value, tree};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_value(tree!({"x": 1, "y": 2})).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the tree does not have the shape `T` expects.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Serialize any `T: Serialize` straight into a grid.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or does not serialize
/// to an object or sequence.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_grid<T>(value: &T) -> Result<Grid>
where
    T: ?Sized + Serialize,
{
    to_grid_with_options(value, GridOptions::default())
}

/// Serialize any `T: Serialize` into a grid with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or does not serialize
/// to an object or sequence.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_grid_with_options<T>(value: &T, options: GridOptions) -> Result<Grid>
where
    T: ?Sized + Serialize,
{
    encode_with_options(&to_value(value)?, options)
}

/// Deserialize an instance of type `T` from a grid.
///
/// # Errors
///
/// Returns a layout error if the grid cannot be decoded, or a custom error if
/// the decoded tree does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_grid<T>(grid: &Grid) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    from_value(decode(grid)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        location: Point,
        tags: Vec<String>,
    }

    fn user() -> User {
        User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            location: Point { x: -4, y: 9 },
            tags: vec!["admin".to_string(), "user".to_string()],
        }
    }

    #[test]
    fn test_struct_roundtrip() {
        let grid = to_grid(&user()).unwrap();
        let back: User = from_grid(&grid).unwrap();
        assert_eq!(back, user());
    }

    #[test]
    fn test_struct_layout() {
        let grid = to_grid(&user()).unwrap();
        // id, name, active, location (2 rows), tags (2 rows)
        assert_eq!(grid.range().unwrap().to_string(), "A1:C7");
        assert_eq!(
            grid.merges(),
            &[MergeRegion::new(1, 3, 4), MergeRegion::new(1, 5, 6)]
        );
    }

    #[test]
    fn test_to_value() {
        let value = to_value(&Point { x: 1, y: 2 }).unwrap();

        match value {
            Value::Object(obj) => {
                assert_eq!(obj.get("x"), Some(&Value::Number(Number::Integer(1))));
                assert_eq!(obj.get("y"), Some(&Value::Number(Number::Integer(2))));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_sequences() {
        let numbers = vec![1, 2, 3, 4, 5];
        let grid = to_grid(&numbers).unwrap();
        let back: Vec<i32> = from_grid(&grid).unwrap();
        assert_eq!(numbers, back);
    }

    #[test]
    fn test_scalars_cannot_be_grids() {
        assert!(matches!(to_grid(&42), Err(Error::UnsupportedType(_))));
        assert!(matches!(to_grid("text"), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_custom_options() {
        let options = GridOptions::new()
            .with_sheet_name("Users")
            .with_merge_cells(false);

        let grid = to_grid_with_options(&user(), options).unwrap();
        assert_eq!(grid.sheet_name(), "Users");
        assert!(grid.merges().is_empty());
        let back: User = from_grid(&grid).unwrap();
        assert_eq!(back, user());
    }
}
