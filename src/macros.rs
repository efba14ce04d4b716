/// Builds a [`Value`](crate::Value) tree from JSON-like literal syntax.
///
/// ```rust
/// use serde_grid::{tree, Value};
///
/// let data = tree!({
///     "name": "Alice",
///     "scores": [90, 85],
///     "active": true
/// });
/// assert!(data.is_object());
/// ```
#[macro_export]
macro_rules! tree {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::tree!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ValueMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ValueMap::new();
        $(
            object.insert($key.to_string(), $crate::tree!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Any other expression goes through the serde bridge.
    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}
