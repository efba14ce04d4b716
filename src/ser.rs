//! Tree → grid placement.
//!
//! Every object entry takes one row: the key goes in the current column and a
//! scalar value goes one column to the right. A composite value instead opens
//! a nested block that starts on the key's row, one column to the right, and
//! the key's row span grows to cover every row of that block. Arrays are laid
//! out as objects keyed `"0"`, `"1"`, ….
//!
//! ```text
//! {"a": {"x": 1, "y": 2}, "b": 3}
//!
//!     A   B   C
//! 1   a   x   1      A1:A2 merged
//! 2       y   2
//! 3   b   3
//! ```
//!
//! Placement walks the tree with an explicit stack of frames, so tree depth
//! is bounded by memory rather than by the call stack.
//!
//! The module also provides [`ValueSerializer`], the serde bridge that turns
//! any `T: Serialize` into a [`Value`] tree.

use crate::address::CellAddress;
use crate::cell::{classify, Cell};
use crate::grid::{Grid, GridBuilder, MergeRegion};
use crate::{Error, GridOptions, Number, Result, Value, ValueMap};
use num_bigint::BigInt;
use serde::{ser, Serialize};
use std::borrow::Cow;
use std::iter::Enumerate;
use std::slice;

/// Places trees into grids.
///
/// # Examples
///
/// ```rust
/// use serde_grid::{tree, GridOptions, GridSerializer};
///
/// let serializer = GridSerializer::new(GridOptions::default());
/// let grid = serializer.encode(&tree!({"a": {"x": 1, "y": 2}, "b": 3})).unwrap();
///
/// assert_eq!(grid.range().unwrap().to_string(), "A1:C3");
/// assert_eq!(grid.merges().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GridSerializer {
    options: GridOptions,
}

/// Columns and rows consumed by one container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Extent {
    columns: u32,
    rows: u32,
}

/// A container's entries in object form.
enum Entries<'a> {
    Array(Enumerate<slice::Iter<'a, Value>>),
    Object(indexmap::map::Iter<'a, String, Value>),
}

impl<'a> Entries<'a> {
    fn of(value: &'a Value) -> Option<Self> {
        match value {
            Value::Array(arr) => Some(Entries::Array(arr.iter().enumerate())),
            Value::Object(obj) => Some(Entries::Object(obj.iter())),
            _ => None,
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = (Cow<'a, str>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Entries::Array(iter) => iter
                .next()
                .map(|(index, value)| (Cow::Owned(index.to_string()), value)),
            Entries::Object(iter) => iter
                .next()
                .map(|(key, value)| (Cow::Borrowed(key.as_str()), value)),
        }
    }
}

/// One container being placed.
struct Frame<'a> {
    entries: Entries<'a>,
    column: u32,
    row_start: u32,
    extent: Extent,
    /// Key whose nested block is being placed; written once the block is known
    /// to take at least one row.
    pending: Option<Cow<'a, str>>,
}

impl<'a> Frame<'a> {
    fn new(entries: Entries<'a>, column: u32, row_start: u32) -> Self {
        Frame {
            entries,
            column,
            row_start,
            extent: Extent::default(),
            pending: None,
        }
    }

    /// Address of the next key cell.
    fn cursor(&self) -> CellAddress {
        CellAddress::new(self.column, self.row_start + self.extent.rows)
    }
}

impl GridSerializer {
    #[must_use]
    pub fn new(options: GridOptions) -> Self {
        GridSerializer { options }
    }

    #[must_use]
    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Places `root` at `A1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if `root` is not an object or array.
    pub fn encode(&self, root: &Value) -> Result<Grid> {
        let entries = Entries::of(root).ok_or_else(|| {
            Error::unsupported_type("the root of a grid must be an object or an array")
        })?;

        let mut builder = GridBuilder::new().sheet_name(self.options.sheet_name.as_str());
        let mut stack = vec![Frame::new(entries, 1, 0)];
        let mut finished: Option<Extent> = None;

        while let Some(frame) = stack.last_mut() {
            if let Some(child) = finished.take() {
                let key = frame.pending.take();
                frame.extent.columns = frame.extent.columns.max(child.columns + 1);
                // An empty block writes no cell, not even its key.
                if child.rows > 0 {
                    let at = frame.cursor();
                    if let Some(key) = key {
                        builder.insert(at, Cell::string(key));
                    }
                    if child.rows > 1 && self.options.merge_cells {
                        builder.merge(MergeRegion::new(
                            at.column,
                            at.row,
                            at.row + child.rows - 1,
                        ));
                    }
                    frame.extent.rows += child.rows;
                }
            }

            let Some((key, value)) = frame.entries.next() else {
                finished = Some(frame.extent);
                stack.pop();
                continue;
            };

            let at = frame.cursor();
            match Entries::of(value) {
                Some(children) => {
                    frame.pending = Some(key);
                    stack.push(Frame::new(children, at.column + 1, at.row));
                }
                None => {
                    builder.insert(at, Cell::string(key));
                    if let Some(cell) = classify(value, &self.options) {
                        builder.insert(at.right(1), cell);
                    }
                    frame.extent.columns = frame.extent.columns.max(2);
                    frame.extent.rows += 1;
                }
            }
        }

        let extent = finished.unwrap_or_default();
        builder.extent(extent.columns, extent.rows);
        Ok(builder.build())
    }
}

/// Serializer producing a [`Value`] tree.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeTupleVariant {
    name: String,
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: ValueMap,
    current_key: Option<String>,
}

pub struct SerializeStructVariant {
    name: String,
    map: ValueMap,
}

fn tagged(name: String, value: Value) -> Value {
    let mut object = ValueMap::with_capacity(1);
    object.insert(name, value);
    Value::Object(object)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        match i64::try_from(v) {
            Ok(i) => Ok(Value::Number(Number::Integer(i))),
            Err(_) => Ok(Value::BigInt(BigInt::from(v))),
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(i) => Ok(Value::Number(Number::Integer(i))),
            Err(_) => Ok(Value::BigInt(BigInt::from(v))),
        }
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        match i64::try_from(v) {
            Ok(i) => Ok(Value::Number(Number::Integer(i))),
            Err(_) => Ok(Value::BigInt(BigInt::from(v))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        let vec = v
            .iter()
            .map(|&b| Value::Number(Number::Integer(b as i64)))
            .collect();
        Ok(Value::Array(vec))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant.to_string(), to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant.to_string(),
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant.to_string(),
            map: ValueMap::new(),
        })
    }
}

impl SerializeVec {
    fn with_capacity(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: ValueMap::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.name, Value::Array(self.vec)))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        // Keys end up as key cells, which are text; scalar keys are stringified.
        let key = match to_value(key)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::BigInt(bi) => bi.to_string(),
            _ => return Err(Error::custom("map keys must be strings or scalars")),
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.name, Value::Object(self.map)))
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::tree;
    use chrono::{TimeZone, Utc};

    fn encode(value: &Value) -> Grid {
        GridSerializer::default().encode(value).unwrap()
    }

    fn text(grid: &Grid, a1: &str) -> Option<String> {
        grid.get(&CellAddress::parse(a1).unwrap())
            .map(|cell| cell.key_text().into_owned())
    }

    #[test]
    fn test_flat_object_layout() {
        let grid = encode(&tree!({"name": "Alice", "age": 30, "admin": true}));

        assert_eq!(text(&grid, "A1").as_deref(), Some("name"));
        assert_eq!(text(&grid, "B1").as_deref(), Some("Alice"));
        assert_eq!(text(&grid, "A2").as_deref(), Some("age"));
        assert_eq!(
            grid.get(&CellAddress::new(2, 1)).map(|c| &c.value),
            Some(&CellValue::Number(Number::Integer(30)))
        );
        assert_eq!(
            grid.get(&CellAddress::new(2, 2)).map(|c| &c.value),
            Some(&CellValue::Bool(true))
        );
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.range().unwrap().to_string(), "A1:B3");
        assert!(grid.merges().is_empty());
    }

    #[test]
    fn test_nested_block_gets_one_merge() {
        let grid = encode(&tree!({"a": {"x": 1, "y": 2}, "b": 3}));

        assert_eq!(grid.merges(), &[MergeRegion::new(1, 0, 1)]);
        assert_eq!(text(&grid, "A1").as_deref(), Some("a"));
        assert_eq!(text(&grid, "B1").as_deref(), Some("x"));
        assert_eq!(text(&grid, "C1").as_deref(), Some("1"));
        assert_eq!(text(&grid, "B2").as_deref(), Some("y"));
        assert_eq!(text(&grid, "C2").as_deref(), Some("2"));
        assert_eq!(text(&grid, "A2"), None);
        assert_eq!(text(&grid, "A3").as_deref(), Some("b"));
        assert_eq!(text(&grid, "B3").as_deref(), Some("3"));
        assert_eq!(grid.range().unwrap().to_string(), "A1:C3");
    }

    #[test]
    fn test_single_row_block_is_not_merged() {
        let grid = encode(&tree!({"a": {"x": 1}}));
        assert!(grid.merges().is_empty());
        assert_eq!(grid.range().unwrap().to_string(), "A1:C1");
    }

    #[test]
    fn test_merge_spans_all_descendant_rows() {
        let grid = encode(&tree!({"a": {"x": {"p": 1, "q": 2}, "y": 3}}));
        assert_eq!(
            grid.merges(),
            &[MergeRegion::new(2, 0, 1), MergeRegion::new(1, 0, 2)]
        );
        assert_eq!(grid.range().unwrap().to_string(), "A1:D3");
    }

    #[test]
    fn test_merges_can_be_disabled() {
        let serializer = GridSerializer::new(GridOptions::new().with_merge_cells(false));
        let grid = serializer.encode(&tree!({"a": {"x": 1, "y": 2}})).unwrap();
        assert!(grid.merges().is_empty());
        assert_eq!(grid.len(), 5);
    }

    #[test]
    fn test_arrays_are_keyed_by_index() {
        let grid = encode(&tree!([10, 20, 30]));
        for (row, (key, value)) in [("0", 10), ("1", 20), ("2", 30)].iter().enumerate() {
            let row = row as u32;
            assert_eq!(
                grid.get(&CellAddress::new(1, row)),
                Some(&Cell::string(*key))
            );
            assert_eq!(
                grid.get(&CellAddress::new(2, row)),
                Some(&Cell::number(*value))
            );
        }
    }

    #[test]
    fn test_empty_container_vanishes() {
        let grid = encode(&tree!({"a": {}, "b": 1}));
        assert_eq!(text(&grid, "A1").as_deref(), Some("b"));
        assert_eq!(text(&grid, "B1").as_deref(), Some("1"));
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.range().unwrap().to_string(), "A1:B1");

        let grid = encode(&tree!({"b": 1, "a": {"x": []}}));
        assert_eq!(grid.len(), 2);
        assert_eq!(text(&grid, "A2"), None);

        let grid = encode(&tree!({}));
        assert!(grid.is_empty());
        assert_eq!(grid.range(), None);
    }

    #[test]
    fn test_empty_block_still_widens_the_range() {
        let grid = encode(&tree!({"a": {"b": {"c": {"d": {}}}}, "x": 1}));
        assert_eq!(grid.len(), 2);
        assert_eq!(text(&grid, "A1").as_deref(), Some("x"));
        assert_eq!(grid.range().unwrap().to_string(), "A1:D1");

        // Width without rows is still no used range.
        let grid = encode(&tree!({"a": {"b": []}}));
        assert!(grid.is_empty());
        assert_eq!(grid.range(), None);
    }

    #[test]
    fn test_null_leaf_has_no_value_cell() {
        let grid = encode(&tree!({"a": null, "b": 1}));
        assert_eq!(text(&grid, "A1").as_deref(), Some("a"));
        assert_eq!(text(&grid, "B1"), None);
        assert_eq!(text(&grid, "A2").as_deref(), Some("b"));
        assert_eq!(grid.range().unwrap().to_string(), "A1:B2");
    }

    #[test]
    fn test_dates_are_serials() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let mut map = ValueMap::new();
        map.insert("when".to_string(), Value::Date(date));
        let grid = encode(&Value::Object(map));

        let cell = grid.get(&CellAddress::new(2, 0)).unwrap();
        assert_eq!(cell.value, CellValue::Number(Number::Float(45306.0)));
        assert_eq!(cell.number_format.as_deref(), Some("m/d/yy"));
    }

    #[test]
    fn test_scalar_root_is_rejected() {
        let err = GridSerializer::default().encode(&Value::from(1)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn test_deep_tree_does_not_recurse() {
        let mut value = Value::from("leaf");
        for _ in 0..20_000 {
            value = Value::Array(vec![value]);
        }
        let grid = encode(&value);
        assert_eq!(grid.range().unwrap().columns(), 20_001);
        assert_eq!(grid.len(), 20_001);
        // Dropping a tree this deep is itself recursive; leak it instead.
        std::mem::forget(value);
    }

    #[test]
    fn test_value_serializer_enums() {
        #[derive(Serialize)]
        enum Shape {
            Unit,
            Circle(f64),
            Rect { w: u32, h: u32 },
        }

        assert_eq!(to_value(&Shape::Unit).unwrap(), tree!("Unit"));
        assert_eq!(to_value(&Shape::Circle(1.5)).unwrap(), tree!({"Circle": 1.5}));
        assert_eq!(
            to_value(&Shape::Rect { w: 2, h: 3 }).unwrap(),
            tree!({"Rect": {"w": 2, "h": 3}})
        );
        assert_eq!(
            to_value(&u64::MAX).unwrap(),
            Value::BigInt(BigInt::from(u64::MAX))
        );
    }
}
