//! Working with decoded Values at runtime.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_grid::{decode, encode, from_value, to_value, tree, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = tree!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    let decoded = decode(&encode(&config)?)?;

    if let Value::Object(obj) = &decoded {
        if let Some(Value::String(host)) = obj.get("host") {
            println!("Accessing field 'host': {}", host);
        }

        if let Some(port) = obj.get("port").and_then(|v| v.as_i64()) {
            println!("Accessing field 'port': {}", port);
        }

        if let Some(Value::Array(features)) = obj.get("features") {
            println!("Accessing field 'features': {} items\n", features.len());
        }
    }

    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let user_value = to_value(&user)?;
    let round_tripped = decode(&encode(&user_value)?)?;
    println!("User as Value: {}", round_tripped);

    let user_back: User = from_value(round_tripped)?;
    assert_eq!(user, user_back);
    println!("✓ Value → grid → Value → User");

    Ok(())
}
