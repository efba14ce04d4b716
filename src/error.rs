//! Error types for grid encoding and decoding.
//!
//! Every structural violation found while decoding a grid is deterministic: the
//! grid does not follow the "one key, one adjacent value, optional nested
//! block" layout. Decoding therefore fails fast and hands the error back
//! untouched, with the offending cell address where one exists.
//!
//! ## Error Categories
//!
//! - **Address Errors**: column indices or A1 strings that cannot be represented
//! - **Layout Errors**: missing key cells, missing value cells, duplicated keys
//! - **Collaborator Errors**: container and storage failures, passed through
//!   unmodified and reachable via [`std::error::Error::source`]
//!
//! ## Examples
//!
//! ```rust
//! use serde_grid::{address, Error};
//!
//! let err = address::number_to_letter(0).unwrap_err();
//! assert!(matches!(err, Error::InvalidColumnIndex(0)));
//! assert!(err.to_string().contains("column index"));
//! ```

use crate::address::CellAddress;
use std::fmt;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// A boxed collaborator error that can be cloned along with [`Error`].
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Represents all possible errors that can occur while moving between trees and grids.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A column index of zero has no letter representation
    #[error("Invalid column index {0}: columns are numbered from 1")]
    InvalidColumnIndex(u32),

    /// An address or column string that is not `LETTERS` / `LETTERSdigits`
    #[error("Malformed cell address: {0}")]
    MalformedAddress(String),

    /// The key cell a column scan was expected to start from does not exist
    #[error("Cell not found: {0}")]
    CellNotFound(CellAddress),

    /// A key cell has no value cell immediately to its right
    #[error("Missing value for key cell {0}")]
    MissingValue(CellAddress),

    /// Two key cells at the same level carry the same key
    #[error("Duplicate key {key:?} at {address}")]
    DuplicateKey { address: CellAddress, key: String },

    /// A key at an array level that cannot be used as an element index
    #[error("Invalid array index {key:?} at {address}")]
    InvalidArrayIndex { address: CellAddress, key: String },

    /// A value that cannot be placed into a grid
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// The spreadsheet container failed to read a grid
    #[error("Container read error: {0}")]
    ContainerRead(#[source] SharedError),

    /// The spreadsheet container failed to write a grid
    #[error("Container write error: {0}")]
    ContainerWrite(#[source] SharedError),

    /// Byte storage failed to read or write
    #[error("Storage error: {0}")]
    Storage(#[source] Arc<io::Error>),

    /// Custom error raised through the serde bridge
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a malformed address error for the given input.
    pub fn malformed_address(input: &str) -> Self {
        Error::MalformedAddress(input.to_string())
    }

    /// Creates a duplicate key error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_grid::{CellAddress, Error};
    ///
    /// let err = Error::duplicate_key(CellAddress::new(2, 3), "x");
    /// assert_eq!(err.to_string(), "Duplicate key \"x\" at B4");
    /// ```
    pub fn duplicate_key(address: CellAddress, key: &str) -> Self {
        Error::DuplicateKey {
            address,
            key: key.to_string(),
        }
    }

    /// Creates an invalid array index error.
    pub fn invalid_array_index(address: CellAddress, key: &str) -> Self {
        Error::InvalidArrayIndex {
            address,
            key: key.to_string(),
        }
    }

    /// Creates an unsupported type error for values that cannot be placed into a grid.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Wraps a container read failure without altering it.
    pub fn container_read<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::ContainerRead(Arc::new(err))
    }

    /// Wraps a container write failure without altering it.
    pub fn container_write<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::ContainerWrite(Arc::new(err))
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_grid::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Storage(Arc::new(err))
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
