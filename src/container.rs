//! Seams for persisting grids.
//!
//! The codec only knows about [`Grid`]s. Turning a grid into bytes belongs to a
//! [`SheetContainer`] (an XLSX writer, a CSV dialect, or plain serde), and
//! moving those bytes belongs to a [`ByteStorage`]. [`read_file`] and
//! [`write_file`] chain the three steps together.
//!
//! Collaborator failures are passed through unchanged: container errors as
//! [`Error::ContainerRead`] / [`Error::ContainerWrite`] and storage errors as
//! [`Error::Storage`], each reachable via [`std::error::Error::source`].
//!
//! ```rust
//! use serde_grid::container::SheetContainer;
//! use serde_grid::{decode, encode, tree, Grid};
//!
//! /// Persists grids as JSON.
//! struct JsonSheet;
//!
//! impl SheetContainer for JsonSheet {
//!     type Error = serde_json::Error;
//!
//!     fn read_grid(&self, bytes: &[u8]) -> Result<Grid, Self::Error> {
//!         serde_json::from_slice(bytes)
//!     }
//!
//!     fn write_grid(&self, grid: &Grid) -> Result<Vec<u8>, Self::Error> {
//!         serde_json::to_vec(grid)
//!     }
//! }
//!
//! let data = tree!({"id": 7, "tags": ["a", "b"]});
//! let bytes = JsonSheet.write_grid(&encode(&data).unwrap()).unwrap();
//! let grid = JsonSheet.read_grid(&bytes).unwrap();
//! assert_eq!(decode(&grid).unwrap(), data);
//! ```

use crate::{decode, encode_with_options, Error, Grid, GridOptions, Result, Value};
use std::fs;
use std::io;
use std::path::Path;

/// Converts grids to and from a container's byte encoding.
///
/// Writing a grid and reading the bytes back must preserve every cell's
/// address, type and value, and the merge list.
pub trait SheetContainer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn read_grid(&self, bytes: &[u8]) -> std::result::Result<Grid, Self::Error>;

    fn write_grid(&self, grid: &Grid) -> std::result::Result<Vec<u8>, Self::Error>;
}

/// Reads and writes whole files.
pub trait ByteStorage {
    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// [`ByteStorage`] on the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsStorage;

impl ByteStorage for FsStorage {
    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)
    }
}

/// Loads `path` through `storage`, parses it with `container` and decodes the
/// grid into a tree.
///
/// # Errors
///
/// Returns [`Error::Storage`] or [`Error::ContainerRead`] for collaborator
/// failures, and any decoding error for a grid that does not follow the
/// layout.
pub fn read_file<C, S>(container: &C, storage: &S, path: impl AsRef<Path>) -> Result<Value>
where
    C: SheetContainer + ?Sized,
    S: ByteStorage + ?Sized,
{
    let path = path.as_ref();
    let bytes = storage.read_bytes(path)?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());

    let grid = container.read_grid(&bytes).map_err(Error::container_read)?;
    log::debug!(
        "sheet {:?}: {} cells, {} merges",
        grid.sheet_name(),
        grid.len(),
        grid.merges().len()
    );

    decode(&grid)
}

/// Encodes `value`, serializes the grid with `container` and stores the bytes
/// at `path`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for a scalar root, and
/// [`Error::ContainerWrite`] or [`Error::Storage`] for collaborator failures.
pub fn write_file<C, S>(
    container: &C,
    storage: &S,
    path: impl AsRef<Path>,
    value: &Value,
    options: GridOptions,
) -> Result<()>
where
    C: SheetContainer + ?Sized,
    S: ByteStorage + ?Sized,
{
    let path = path.as_ref();
    let grid = encode_with_options(value, options)?;
    log::debug!(
        "encoded sheet {:?}: {} cells, range {}",
        grid.sheet_name(),
        grid.len(),
        grid.range()
            .map_or_else(|| "empty".to_string(), |range| range.to_string())
    );

    let bytes = container.write_grid(&grid).map_err(Error::container_write)?;
    storage.write_bytes(path, &bytes)?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
