//! Configuration options for grid encoding.
//!
//! - [`GridOptions`]: main configuration struct
//! - [`DateSystem`]: which spreadsheet epoch date serials are counted from
//!
//! Decoding needs no options: the grid's layout is the only input.
//!
//! ## Examples
//!
//! ```rust
//! use serde_grid::{encode_with_options, tree, DateSystem, GridOptions};
//!
//! let options = GridOptions::new()
//!     .with_date_system(DateSystem::Excel1904)
//!     .with_sheet_name("Inventory")
//!     .with_merge_cells(false);
//!
//! let grid = encode_with_options(&tree!({"a": {"x": 1, "y": 2}}), options).unwrap();
//! assert_eq!(grid.sheet_name(), "Inventory");
//! assert!(grid.merges().is_empty());
//! ```

use serde::{Deserialize, Serialize};

/// Built-in spreadsheet number format 14, the short date display.
pub const DEFAULT_DATE_FORMAT: &str = "m/d/yy";

/// Sheet name used when none is configured.
pub const DEFAULT_SHEET_NAME: &str = "Exported Data";

/// Spreadsheet date epoch.
///
/// # Examples
///
/// ```rust
/// use serde_grid::DateSystem;
///
/// assert_eq!(DateSystem::Excel1900.offset_days(), 0.0);
/// assert_eq!(DateSystem::Excel1904.offset_days(), 1462.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateSystem {
    #[default]
    Excel1900,
    Excel1904,
}

impl DateSystem {
    /// Days added to a serial counted from 1899-12-30.
    #[must_use]
    pub const fn offset_days(&self) -> f64 {
        match self {
            DateSystem::Excel1900 => 0.0,
            DateSystem::Excel1904 => 1462.0,
        }
    }
}

/// Configuration options for grid encoding.
///
/// # Examples
///
/// ```rust
/// use serde_grid::{DateSystem, GridOptions};
///
/// let options = GridOptions::new();
/// assert_eq!(options.date_system, DateSystem::Excel1900);
/// assert_eq!(options.date_format, "m/d/yy");
/// assert_eq!(options.sheet_name, "Exported Data");
/// assert!(options.merge_cells);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridOptions {
    pub date_system: DateSystem,
    /// Number format attached to cells holding date serials.
    pub date_format: String,
    pub sheet_name: String,
    /// Record a merge region for every nested block taller than one row.
    pub merge_cells: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            date_system: DateSystem::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            merge_cells: true,
        }
    }
}

impl GridOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_date_system(mut self, date_system: DateSystem) -> Self {
        self.date_system = date_system;
        self
    }

    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    #[must_use]
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Merges are cosmetic; turning them off changes nothing on decode.
    #[must_use]
    pub fn with_merge_cells(mut self, merge_cells: bool) -> Self {
        self.merge_cells = merge_cells;
        self
    }
}
