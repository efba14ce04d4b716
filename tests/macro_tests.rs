use serde_grid::{decode, encode, tree, Number, Value, ValueMap};

#[test]
fn test_tree_macro_scalars() {
    assert_eq!(tree!(null), Value::Null);
    assert_eq!(tree!(true), Value::Bool(true));
    assert_eq!(tree!(false), Value::Bool(false));
    assert_eq!(tree!(42), Value::Number(Number::Integer(42)));
    assert_eq!(tree!(-123), Value::Number(Number::Integer(-123)));
    assert_eq!(tree!(3.5), Value::Number(Number::Float(3.5)));
    assert_eq!(tree!(""), Value::String(String::new()));
}

#[test]
fn test_tree_macro_arrays() {
    assert_eq!(tree!([]), Value::Array(vec![]));
    assert_eq!(
        tree!([1, "hello", true, null]),
        Value::Array(vec![
            Value::Number(Number::Integer(1)),
            Value::String("hello".to_string()),
            Value::Bool(true),
            Value::Null,
        ])
    );
    assert_eq!(
        tree!([[1], [2, 3]]),
        Value::Array(vec![
            Value::Array(vec![Value::from(1)]),
            Value::Array(vec![Value::from(2), Value::from(3)]),
        ])
    );
}

#[test]
fn test_tree_macro_objects_keep_key_order() {
    let value = tree!({"zeta": 1, "alpha": 2, "mid": {"b": 1, "a": 2}});

    let map = value.as_object().unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);

    let mut inner = ValueMap::new();
    inner.insert("b".to_string(), Value::from(1));
    inner.insert("a".to_string(), Value::from(2));
    assert_eq!(map.get("mid"), Some(&Value::Object(inner)));
}

#[test]
fn test_tree_macro_expressions() {
    let name = "Ada";
    let langs = vec!["en", "fr"];
    let value = tree!({"name": name, "langs": langs});

    assert_eq!(value, tree!({"name": "Ada", "langs": ["en", "fr"]}));
}

#[test]
fn test_key_order_survives_the_grid() {
    let value = tree!({"zeta": 1, "alpha": {"y": 2, "x": 3}, "mid": [true]});
    let back = decode(&encode(&value).unwrap()).unwrap();

    let keys: Vec<&str> = back.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    assert_eq!(back, value);
}
