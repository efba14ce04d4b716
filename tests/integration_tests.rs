use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_grid::address::{cmp_reading_order, letter_to_number, number_to_letter};
use serde_grid::{
    decode, encode, encode_with_options, from_grid, to_grid, to_value, tree, Cell, CellAddress,
    CellValue, DateSystem, Error, Grid, GridOptions, MergeRegion, Number, Value, ValueMap,
};
use std::cmp::Ordering;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
}

fn order() -> Order {
    Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.99,
                quantity: 1,
            },
        ],
        total: 109.97,
    }
}

fn text_at(grid: &Grid, a1: &str) -> Option<String> {
    grid.get(&CellAddress::parse(a1).unwrap())
        .map(|cell| cell.key_text().into_owned())
}

#[test]
fn test_column_letters_are_bijective() {
    for n in 1..=20_000 {
        assert_eq!(letter_to_number(&number_to_letter(n).unwrap()).unwrap(), n);
    }
    assert_eq!(number_to_letter(27).unwrap(), "AA");
    assert_eq!(letter_to_number("AZ").unwrap(), 52);
    assert!(matches!(
        number_to_letter(0),
        Err(Error::InvalidColumnIndex(0))
    ));
}

#[test]
fn test_reading_order_is_numeric() {
    assert_eq!(cmp_reading_order("Z1", "AA1").unwrap(), Ordering::Less);
    assert_eq!(cmp_reading_order("A10", "A9").unwrap(), Ordering::Greater);
    assert_eq!(cmp_reading_order("B1", "A100").unwrap(), Ordering::Greater);
    assert_eq!(cmp_reading_order("C3", "C3").unwrap(), Ordering::Equal);
    assert!(cmp_reading_order("3C", "C3").is_err());
}

#[test]
fn test_nested_struct_roundtrip() {
    let grid = to_grid(&order()).unwrap();
    let back: Order = from_grid(&grid).unwrap();
    assert_eq!(back, order());
}

#[test]
fn test_nested_struct_layout() {
    let grid = to_grid(&order()).unwrap();

    // customer: id, name, active, tags[0] -> rows 2..=5
    // items: two products of three fields -> rows 6..=11
    assert_eq!(text_at(&grid, "A1").as_deref(), Some("order_id"));
    assert_eq!(text_at(&grid, "A2").as_deref(), Some("customer"));
    assert_eq!(text_at(&grid, "B5").as_deref(), Some("tags"));
    assert_eq!(text_at(&grid, "C5").as_deref(), Some("0"));
    assert_eq!(text_at(&grid, "D5").as_deref(), Some("vip"));
    assert_eq!(text_at(&grid, "A6").as_deref(), Some("items"));
    assert_eq!(text_at(&grid, "C9").as_deref(), Some("sku"));
    assert_eq!(text_at(&grid, "D9").as_deref(), Some("GADGET-002"));
    assert_eq!(text_at(&grid, "A12").as_deref(), Some("total"));
    assert_eq!(grid.range().unwrap().to_string(), "A1:D12");

    assert_eq!(
        grid.merges(),
        &[
            MergeRegion::new(1, 1, 4),
            MergeRegion::new(2, 5, 7),
            MergeRegion::new(2, 8, 10),
            MergeRegion::new(1, 5, 10),
        ]
    );
}

#[test]
fn test_every_nested_block_is_merged_over_its_rows() {
    let data = tree!({
        "a": {"b": {"c": [1, 2, 3]}, "d": 4},
        "e": 5
    });
    let grid = encode(&data).unwrap();

    for merge in grid.merges() {
        assert!(merge.rows() > 1);
        assert!(grid.contains(&merge.start()));
        for row in merge.row_start + 1..=merge.row_end {
            assert!(!grid.contains(&CellAddress::new(merge.column, row)));
        }
    }
    assert_eq!(grid.merges().len(), 3);
    assert_eq!(decode(&grid).unwrap(), data);
}

#[test]
fn test_array_inference() {
    let data = tree!([{"id": 1}, {"id": 2}]);
    assert_eq!(decode(&encode(&data).unwrap()).unwrap(), data);

    let data = tree!({"list": [[1, 2], ["x"]], "flag": false});
    assert_eq!(decode(&encode(&data).unwrap()).unwrap(), data);
}

#[test]
fn test_empty_container_boundary() {
    let grid = encode(&tree!({"a": {}, "b": 1})).unwrap();
    assert_eq!(decode(&grid).unwrap(), tree!({"b": 1}));
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Tagged {
    name: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[test]
fn test_empty_vec_field_needs_a_default() {
    let value = Tagged {
        name: "n".to_string(),
        tags: vec![],
    };
    let grid = to_grid(&value).unwrap();
    assert_eq!(grid.len(), 2);
    let back: Tagged = from_grid(&grid).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_date_asymmetry() {
    let date = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let mut map = ValueMap::new();
    map.insert("when".to_string(), Value::Date(date));
    let tree = Value::Object(map);

    let grid = encode(&tree).unwrap();
    let cell = grid.get(&CellAddress::new(2, 0)).unwrap();
    assert_eq!(cell.value, CellValue::Number(Number::Float(45306.0)));
    assert_eq!(cell.number_format.as_deref(), Some("m/d/yy"));
    assert_eq!(decode(&grid).unwrap(), tree!({"when": 45306.0}));

    let options = GridOptions::new()
        .with_date_system(DateSystem::Excel1904)
        .with_date_format("yyyy-mm-dd");
    let grid = encode_with_options(&tree, options).unwrap();
    let cell = grid.get(&CellAddress::new(2, 0)).unwrap();
    assert_eq!(cell.value, CellValue::Number(Number::Float(46768.0)));
    assert_eq!(cell.number_format.as_deref(), Some("yyyy-mm-dd"));
}

#[test]
fn test_null_encodes_as_absence() {
    let grid = encode(&tree!({"a": null})).unwrap();
    assert_eq!(grid.len(), 1);
    assert!(matches!(
        decode(&grid),
        Err(Error::MissingValue(at)) if at.to_string() == "A1"
    ));

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Profile {
        nickname: Option<String>,
    }
    let grid = to_grid(&Profile { nickname: None }).unwrap();
    assert!(matches!(
        from_grid::<Profile>(&grid),
        Err(Error::MissingValue(_))
    ));
    let grid = to_grid(&Profile {
        nickname: Some("al".to_string()),
    })
    .unwrap();
    assert_eq!(
        from_grid::<Profile>(&grid).unwrap().nickname.as_deref(),
        Some("al")
    );
}

#[test]
fn test_duplicate_keys_are_rejected() {
    let grid = Grid::builder()
        .cell("A1", Cell::string("k"))
        .unwrap()
        .cell("B1", Cell::number(1))
        .unwrap()
        .cell("A2", Cell::string("k"))
        .unwrap()
        .cell("B2", Cell::number(2))
        .unwrap()
        .build();
    let err = decode(&grid).unwrap_err();
    assert_eq!(err.to_string(), "Duplicate key \"k\" at A2");
}

#[test]
fn test_missing_start_cell() {
    let grid = Grid::builder()
        .cell("B1", Cell::string("orphan"))
        .unwrap()
        .build();
    assert!(matches!(decode(&grid), Err(Error::CellNotFound(_))));
    assert!(matches!(
        decode(&Grid::builder().build()),
        Err(Error::CellNotFound(_))
    ));
}

#[test]
fn test_bigint_becomes_string_cell() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Counter {
        total: u64,
    }

    let grid = to_grid(&Counter { total: u64::MAX }).unwrap();
    assert_eq!(
        grid.get(&CellAddress::new(2, 0)),
        Some(&Cell::string(u64::MAX.to_string()))
    );
    let back: Counter = from_grid(&grid).unwrap();
    assert_eq!(back.total, u64::MAX);
}

#[test]
fn test_json_documents_roundtrip() {
    let json = serde_json::json!({
        "service": "billing",
        "replicas": 3,
        "ratio": 0.25,
        "regions": ["eu-west", "us-east"],
        "limits": {"cpu": "500m", "memory": {"request": "256Mi", "limit": "1Gi"}},
        "canary": false
    });

    let value = to_value(&json).unwrap();
    let grid = encode(&value).unwrap();
    let back = decode(&grid).unwrap();
    assert_eq!(back, value);
    assert_eq!(serde_json::to_value(&back).unwrap(), json);
}

#[test]
fn test_grid_survives_json_persistence() {
    let grid = to_grid(&order()).unwrap();
    let bytes = serde_json::to_vec(&grid).unwrap();
    let restored: Grid = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(restored, grid);
    assert_eq!(from_grid::<Order>(&restored).unwrap(), order());
}
