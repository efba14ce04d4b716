//! Grid → tree reconstruction.
//!
//! Decoding reads the layout written by [`GridSerializer`](crate::GridSerializer)
//! back into a [`Value`]. It starts at `A1` and walks the key cells of a column
//! in reading order. Each key's value sits one column to the right. When the
//! cell two columns to the right is occupied too, the value is a nested block
//! that gets scanned the same way, bounded by the row of the next key in the
//! current column.
//!
//! Whether a block is an array or an object is inferred from its first key: a
//! non-negative integer string makes it an array. Merge regions are ignored.
//!
//! ```rust
//! use serde_grid::{decode, encode, tree};
//!
//! let data = tree!({"name": "Ada", "langs": ["en", "fr"]});
//! let grid = encode(&data).unwrap();
//! assert_eq!(decode(&grid).unwrap(), data);
//! ```
//!
//! The module also provides [`ValueDeserializer`], the serde bridge that
//! turns a [`Value`] tree into any `T: Deserialize`.

use crate::address::CellAddress;
use crate::cell::is_index_key;
use crate::grid::Grid;
use crate::{Error, Number, Result, Value, ValueMap};
use num_bigint::BigInt;
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};
use std::collections::BTreeMap;

/// Rebuilds trees from grids.
///
/// # Examples
///
/// ```rust
/// use serde_grid::{Cell, Grid, GridDeserializer, Value};
///
/// let grid = Grid::builder()
///     .cell("A1", Cell::string("0"))
///     .unwrap()
///     .cell("B1", Cell::string("first"))
///     .unwrap()
///     .build();
///
/// let value = GridDeserializer::new(&grid).decode().unwrap();
/// assert_eq!(value, Value::Array(vec![Value::from("first")]));
/// ```
pub struct GridDeserializer<'g> {
    grid: &'g Grid,
    addresses: Vec<CellAddress>,
}

/// Where a decoded value goes in its parent.
enum Slot {
    Index(usize),
    Key(String),
}

/// The container a level is filling. Its kind is fixed by the first key.
enum Container {
    Undecided,
    Array(BTreeMap<usize, Value>),
    Object(ValueMap),
}

impl Container {
    /// Validates `key` at `at` and returns where its value will be stored.
    fn claim(&mut self, at: CellAddress, key: String, max_len: usize) -> Result<Slot> {
        if let Container::Undecided = self {
            *self = if is_index_key(&key) {
                Container::Array(BTreeMap::new())
            } else {
                Container::Object(ValueMap::new())
            };
        }

        match self {
            Container::Array(elements) => {
                let index = match key.parse::<usize>() {
                    Ok(index) if is_index_key(&key) && index < max_len => index,
                    _ => return Err(Error::invalid_array_index(at, &key)),
                };
                if elements.contains_key(&index) {
                    return Err(Error::duplicate_key(at, &key));
                }
                Ok(Slot::Index(index))
            }
            Container::Object(entries) => {
                if entries.contains_key(&key) {
                    return Err(Error::duplicate_key(at, &key));
                }
                Ok(Slot::Key(key))
            }
            Container::Undecided => Err(Error::custom("container kind was not decided")),
        }
    }

    /// Stores `value` in a slot returned by [`claim`](Container::claim).
    fn store(&mut self, slot: Slot, value: Value) -> Result<()> {
        match (self, slot) {
            (Container::Array(elements), Slot::Index(index)) => {
                elements.insert(index, value);
            }
            (Container::Object(entries), Slot::Key(key)) => {
                entries.insert(key, value);
            }
            (_, Slot::Index(index)) => {
                return Err(Error::custom(format!(
                    "index slot {index} does not belong to an array"
                )));
            }
            (_, Slot::Key(key)) => {
                return Err(Error::custom(format!(
                    "key slot {key:?} does not belong to an object"
                )));
            }
        }
        Ok(())
    }

    fn finish(self) -> Value {
        match self {
            Container::Undecided => Value::Object(ValueMap::new()),
            Container::Object(entries) => Value::Object(entries),
            Container::Array(elements) => {
                let len = elements.keys().next_back().map_or(0, |last| last + 1);
                let mut array = vec![Value::Null; len];
                for (index, value) in elements {
                    array[index] = value;
                }
                Value::Array(array)
            }
        }
    }
}

/// One column scan in progress.
struct Level {
    column: u32,
    /// First row past this block, if another key follows in the parent column.
    bound: Option<u32>,
    /// Position of the next candidate key in the reading-ordered addresses.
    cursor: usize,
    container: Container,
    pending: Option<Slot>,
}

impl<'g> GridDeserializer<'g> {
    #[must_use]
    pub fn new(grid: &'g Grid) -> Self {
        GridDeserializer {
            grid,
            addresses: grid.addresses().copied().collect(),
        }
    }

    /// Decodes the block whose first key is at `A1`.
    ///
    /// # Errors
    ///
    /// - [`Error::CellNotFound`] if `A1` is empty, which includes an empty grid
    /// - [`Error::MissingValue`] if a key cell has nothing to its right
    /// - [`Error::DuplicateKey`] if a block repeats a key
    /// - [`Error::InvalidArrayIndex`] if a block inferred as an array has a key
    ///   that is not a usable index
    pub fn decode(&self) -> Result<Value> {
        let mut stack = vec![self.level(CellAddress::new(1, 0), None)?];
        let mut finished: Option<Value> = None;

        while let Some(level) = stack.last_mut() {
            if let Some(child) = finished.take() {
                if let Some(slot) = level.pending.take() {
                    level.container.store(slot, child)?;
                }
            }

            let key_at = match self.addresses.get(level.cursor) {
                Some(at)
                    if at.column == level.column
                        && level.bound.map_or(true, |bound| at.row < bound) =>
                {
                    *at
                }
                _ => {
                    let container = std::mem::replace(&mut level.container, Container::Undecided);
                    finished = Some(container.finish());
                    stack.pop();
                    continue;
                }
            };
            let next = self.addresses.get(level.cursor + 1).copied();
            level.cursor += 1;

            let key = self.cell_text(key_at);
            let slot = level.container.claim(key_at, key, self.grid.len())?;

            let value_at = key_at.right(1);
            let Some(cell) = self.grid.get(&value_at) else {
                return Err(Error::MissingValue(key_at));
            };

            if self.grid.contains(&key_at.right(2)) {
                let bound = next
                    .filter(|n| n.column == key_at.column)
                    .map(|n| n.row);
                level.pending = Some(slot);
                let child = self.level(value_at, bound)?;
                stack.push(child);
            } else {
                level.container.store(slot, cell.to_value())?;
            }
        }

        finished.ok_or_else(|| Error::CellNotFound(CellAddress::new(1, 0)))
    }

    /// Opens a scan whose first key must be at `start`.
    fn level(&self, start: CellAddress, bound: Option<u32>) -> Result<Level> {
        let cursor = self
            .addresses
            .binary_search(&start)
            .map_err(|_| Error::CellNotFound(start))?;
        Ok(Level {
            column: start.column,
            bound,
            cursor,
            container: Container::Undecided,
            pending: None,
        })
    }

    fn cell_text(&self, at: CellAddress) -> String {
        self.grid
            .get(&at)
            .map(|cell| cell.key_text().into_owned())
            .unwrap_or_default()
    }
}

/// Deserializer reading from a [`Value`] tree.
///
/// Dates are handed to visitors as RFC 3339 strings and big integers as their
/// decimal digits, so `String` fields accept both. Integer fields wider than
/// `i64` also accept those digits.
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }

    fn wide_integer<T>(&self) -> Option<T>
    where
        T: for<'a> TryFrom<&'a BigInt> + std::str::FromStr,
    {
        match &self.value {
            Value::BigInt(bi) => T::try_from(bi).ok(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Integer(i)) => visitor.visit_i64(i),
            Value::Number(Number::Float(f)) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Date(dt) => visitor.visit_string(dt.to_rfc3339()),
            Value::BigInt(bi) => visitor.visit_string(bi.to_string()),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
        }
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.wide_integer::<u64>() {
            Some(n) => visitor.visit_u64(n),
            None => self.deserialize_any(visitor),
        }
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.wide_integer::<i128>() {
            Some(n) => visitor.visit_i128(n),
            None => self.deserialize_any(visitor),
        }
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.wide_integer::<u128>() {
            Some(n) => visitor.visit_u128(n),
            None => self.deserialize_any(visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(obj) => {
                let mut entries = obj.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((variant, value)), None) => {
                        visitor.visit_enum(EnumDeserializer::new(variant, value))
                    }
                    _ => Err(Error::custom("Expected an object with a single variant key")),
                }
            }
            _ => Err(Error::custom("Expected enum")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 u8 u16 u32 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: ValueMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl EnumDeserializer {
    fn new(variant: String, value: Value) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}
