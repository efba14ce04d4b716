//! The flat cell grid produced by encoding and consumed by decoding.
//!
//! A [`Grid`] is a sparse map from [`CellAddress`] to [`Cell`], kept in
//! reading order, plus the used range and a list of [`MergeRegion`]s. Merges
//! are presentation only; decoding never looks at them.
//!
//! Grids are immutable once built. [`GridBuilder`] is the single mutable
//! stage, owned by one encode call (or by whoever assembles a grid by hand,
//! for example a container implementation reading one from disk).
//!
//! ```rust
//! use serde_grid::{Cell, Grid};
//!
//! let grid = Grid::builder()
//!     .cell("A1", Cell::string("name"))
//!     .unwrap()
//!     .cell("B1", Cell::string("Alice"))
//!     .unwrap()
//!     .build();
//!
//! assert_eq!(grid.len(), 2);
//! assert_eq!(grid.range().unwrap().to_string(), "A1:B1");
//! ```

use crate::address::CellAddress;
use crate::cell::Cell;
use crate::options::DEFAULT_SHEET_NAME;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// A single-column run of rows shown as one merged cell.
///
/// `row_end` is inclusive.
///
/// # Examples
///
/// ```rust
/// use serde_grid::{CellAddress, MergeRegion};
///
/// let merge = MergeRegion::new(1, 0, 2);
/// assert_eq!(merge.rows(), 3);
/// assert_eq!(merge.to_string(), "A1:A3");
/// assert!(merge.contains(CellAddress::new(1, 1)));
/// assert!(!merge.contains(CellAddress::new(2, 1)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeRegion {
    pub column: u32,
    pub row_start: u32,
    pub row_end: u32,
}

impl MergeRegion {
    #[must_use]
    pub const fn new(column: u32, row_start: u32, row_end: u32) -> Self {
        MergeRegion {
            column,
            row_start,
            row_end,
        }
    }

    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.row_end.saturating_sub(self.row_start) + 1
    }

    #[must_use]
    pub const fn start(&self) -> CellAddress {
        CellAddress::new(self.column, self.row_start)
    }

    #[must_use]
    pub const fn end(&self) -> CellAddress {
        CellAddress::new(self.column, self.row_end)
    }

    #[must_use]
    pub const fn contains(&self, address: CellAddress) -> bool {
        address.column == self.column
            && address.row >= self.row_start
            && address.row <= self.row_end
    }
}

impl fmt::Display for MergeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start(), self.end())
    }
}

/// A rectangular block of addresses, both corners inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    #[must_use]
    pub const fn new(start: CellAddress, end: CellAddress) -> Self {
        CellRange { start, end }
    }

    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.end.column.saturating_sub(self.start.column) + 1
    }

    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.end.row.saturating_sub(self.start.row) + 1
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// A sheet of cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    sheet_name: String,
    cells: BTreeMap<CellAddress, Cell>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<CellRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    merges: Vec<MergeRegion>,
}

impl Grid {
    #[must_use]
    pub fn builder() -> GridBuilder {
        GridBuilder::new()
    }

    #[must_use]
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    #[must_use]
    pub fn get(&self, address: &CellAddress) -> Option<&Cell> {
        self.cells.get(address)
    }

    #[must_use]
    pub fn contains(&self, address: &CellAddress) -> bool {
        self.cells.contains_key(address)
    }

    /// Iterates cells in reading order.
    pub fn cells(&self) -> btree_map::Iter<'_, CellAddress, Cell> {
        self.cells.iter()
    }

    /// Iterates addresses in reading order.
    pub fn addresses(&self) -> btree_map::Keys<'_, CellAddress, Cell> {
        self.cells.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The used range, anchored at `A1`. `None` for a grid with no extent.
    #[must_use]
    pub fn range(&self) -> Option<CellRange> {
        self.range
    }

    #[must_use]
    pub fn merges(&self) -> &[MergeRegion] {
        &self.merges
    }

    /// Starts a builder holding a copy of this grid's contents.
    #[must_use]
    pub fn to_builder(&self) -> GridBuilder {
        GridBuilder {
            sheet_name: self.sheet_name.clone(),
            cells: self.cells.clone(),
            merges: self.merges.clone(),
            extent: self.range.map(|r| (r.end.column, r.end.row + 1)),
        }
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = (&'a CellAddress, &'a Cell);
    type IntoIter = btree_map::Iter<'a, CellAddress, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Accumulates cells and merges for one grid.
///
/// Without an explicit [`extent`](GridBuilder::extent) the used range is the
/// bounding box of the inserted cells.
#[derive(Clone, Debug)]
pub struct GridBuilder {
    sheet_name: String,
    cells: BTreeMap<CellAddress, Cell>,
    merges: Vec<MergeRegion>,
    extent: Option<(u32, u32)>,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GridBuilder {
    #[must_use]
    pub fn new() -> Self {
        GridBuilder {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            extent: None,
        }
    }

    #[must_use]
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Places a cell at an A1 address, replacing any cell already there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAddress`](crate::Error::MalformedAddress) if
    /// `address` does not parse.
    pub fn cell(mut self, address: &str, cell: Cell) -> Result<Self> {
        let address = CellAddress::parse(address)?;
        self.cells.insert(address, cell);
        Ok(self)
    }

    /// Places a cell, returning the one it replaced.
    pub fn insert(&mut self, address: CellAddress, cell: Cell) -> Option<Cell> {
        self.cells.insert(address, cell)
    }

    /// Removes a cell, returning it.
    pub fn remove(&mut self, address: &CellAddress) -> Option<Cell> {
        self.cells.remove(address)
    }

    pub fn merge(&mut self, region: MergeRegion) {
        self.merges.push(region);
    }

    /// Fixes the used range to `columns` × `rows` from `A1`.
    pub fn extent(&mut self, columns: u32, rows: u32) {
        self.extent = Some((columns, rows));
    }

    #[must_use]
    pub fn build(self) -> Grid {
        let range = match self.extent {
            Some((columns, rows)) => used_range(columns, rows),
            None => {
                let columns = self.cells.keys().map(|a| a.column).max().unwrap_or(0);
                let rows = self.cells.keys().map(|a| a.row + 1).max().unwrap_or(0);
                used_range(columns, rows)
            }
        };

        Grid {
            sheet_name: self.sheet_name,
            cells: self.cells,
            range,
            merges: self.merges,
        }
    }
}

fn used_range(columns: u32, rows: u32) -> Option<CellRange> {
    if columns == 0 || rows == 0 {
        return None;
    }
    Some(CellRange::new(
        CellAddress::new(1, 0),
        CellAddress::new(columns, rows - 1),
    ))
}
