//! Integration tests for the simplesqlite-sqlite crate.

use std::io::Write;
use std::sync::Arc;

use rusqlite::Connection;
use simplesqlite_core::{
    ColumnType, DataError, IfExists, NameValidationError, Row, Value, make_where_in,
    make_where_not_in,
};
use simplesqlite_loader::{Format, LoaderSource, TableCounter, YamlTableLoader, loader_for};
use simplesqlite_sqlite::{
    SimpleSqlite, SqlEngine, SqliteError, TableOutcome, create_table_from_data_matrix,
};

const ATTRS: [&str; 5] = ["attr_a", "attr_b", "attr_c", "attr_d", "attr_e"];

fn sample_matrix() -> Vec<Vec<Value>> {
    vec![
        vec![1.into(), 1.1.into(), "aaa".into(), 1.into(), 1.into()],
        vec![2.into(), 2.2.into(), "bbb".into(), 2.2.into(), 2.2.into()],
        vec![3.into(), 3.3.into(), "ccc".into(), 3.into(), "ccc".into()],
    ]
}

/// All orderings of `items` (Heap's algorithm).
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    fn heap<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if k <= 1 {
            out.push(items.clone());
            return;
        }
        for i in 0..k - 1 {
            heap(k - 1, items, out);
            if k % 2 == 0 {
                items.swap(i, k - 1);
            } else {
                items.swap(0, k - 1);
            }
        }
        heap(k - 1, items, out);
    }

    let mut items = items.to_vec();
    let mut out = Vec::new();
    heap(items.len(), &mut items, &mut out);
    out
}

// ---------------------------------------------------------------------------
// Schema round trip
// ---------------------------------------------------------------------------

#[test]
fn test_inferred_types_independent_of_row_order() {
    let orderings = permutations(&sample_matrix());
    assert_eq!(orderings.len(), 6);

    for matrix in orderings {
        let conn = Connection::open_in_memory().unwrap();
        create_table_from_data_matrix(&conn, "tbl", &ATTRS, &matrix, &["attr_a"], IfExists::Fail)
            .unwrap();

        let schema = conn.schema_of("tbl").unwrap().unwrap();
        assert_eq!(
            schema.column_types(),
            vec![
                ColumnType::Integer,
                ColumnType::Real,
                ColumnType::Text,
                ColumnType::Real,
                ColumnType::Text,
            ]
        );
        assert_eq!(schema.index_attrs, vec!["attr_a"]);
        assert_eq!(
            schema.dumps(),
            "attr_a INTEGER\nattr_b REAL\nattr_c TEXT\nattr_d REAL\nattr_e TEXT"
        );
    }
}

#[test]
fn test_blob_and_null_columns_independent_of_row_order() {
    let matrix = vec![
        vec![1.into(), Value::Blob(vec![0]), Value::Null, 1.into(), Value::Null],
        vec![2.into(), Value::Blob(vec![1]), Value::Null, 2.5.into(), "t".into()],
        vec![3.into(), Value::Blob(vec![2]), Value::Null, "s".into(), Value::Null],
        vec![Value::Null, Value::Blob(vec![3]), Value::Null, Value::Blob(vec![9]), "u".into()],
    ];
    let orderings = permutations(&matrix);
    assert_eq!(orderings.len(), 24);

    for matrix in orderings {
        let conn = Connection::open_in_memory().unwrap();
        create_table_from_data_matrix(
            &conn,
            "tbl",
            &["i", "b", "n", "m", "t"],
            &matrix,
            &[] as &[&str],
            IfExists::Fail,
        )
        .unwrap();

        let schema = conn.schema_of("tbl").unwrap().unwrap();
        assert_eq!(
            schema.column_types(),
            vec![
                ColumnType::Integer,
                ColumnType::Blob,
                ColumnType::Null,
                ColumnType::Blob,
                ColumnType::Text,
            ]
        );
        assert_eq!(schema.dumps(), "i INTEGER\nb BLOB\nn NULL\nm BLOB\nt TEXT");
    }
}

#[test]
fn test_values_survive_round_trip() {
    let db = SimpleSqlite::open_in_memory().unwrap();
    db.create_table_from_data_matrix("tbl", &ATTRS, &sample_matrix(), &[] as &[&str], IfExists::Fail)
        .unwrap();

    let rows = db.select(&ATTRS, "tbl", Some("attr_a = 3")).unwrap();
    assert_eq!(
        rows,
        vec![vec![
            Value::from(3),
            Value::from(3.3),
            Value::from("ccc"),
            Value::from(3.0),
            Value::from("ccc"),
        ]]
    );
}

#[test]
fn test_persisted_database_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.sqlite");

    {
        let db = SimpleSqlite::open(&path).unwrap();
        db.create_table_from_data_matrix("tbl", &ATTRS, &sample_matrix(), &["attr_a"], IfExists::Fail)
            .unwrap();
    }

    let db = SimpleSqlite::open(&path).unwrap();
    assert!(db.has_table("tbl").unwrap());
    assert_eq!(db.count_records("tbl").unwrap(), 3);
    assert_eq!(
        db.schema_of("tbl").unwrap().unwrap().column_names(),
        ATTRS.to_vec()
    );
}

// ---------------------------------------------------------------------------
// Overwrite policy
// ---------------------------------------------------------------------------

#[test]
fn test_replace_changes_inferred_types() {
    let db = SimpleSqlite::open_in_memory().unwrap();
    db.create_table_from_data_matrix("t", &["v"], &[vec![Value::from(1)]], &[] as &[&str], IfExists::Fail)
        .unwrap();

    let outcome = db
        .create_table_from_data_matrix("t", &["v"], &[vec![Value::from("x")]], &[] as &[&str], IfExists::Replace)
        .unwrap();
    assert_eq!(outcome, TableOutcome::Replaced);
    assert_eq!(db.schema_of("t").unwrap().unwrap().dumps(), "v TEXT");
    assert_eq!(db.select(&["v"], "t", None).unwrap(), vec![vec![Value::from("x")]]);
}

#[test]
fn test_fail_policy_leaves_table_untouched() {
    let db = SimpleSqlite::open_in_memory().unwrap();
    db.create_table_from_data_matrix("t", &["v"], &[vec![Value::from(1)]], &[] as &[&str], IfExists::Fail)
        .unwrap();

    let err = db
        .create_table_from_data_matrix("t", &["v"], &[vec![Value::from("x")]], &[] as &[&str], IfExists::Fail)
        .unwrap_err();
    assert!(matches!(err, SqliteError::TableAlreadyExists(_)));
    assert_eq!(db.schema_of("t").unwrap().unwrap().dumps(), "v INTEGER");
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_reserved_table_names_rejected() {
    let db = SimpleSqlite::open_in_memory().unwrap();
    for (name, expect_valid_reserved) in [("abort", true), ("TABLE", false), ("if", false)] {
        let err = db
            .create_table_from_data_matrix(name, &["a"], &[vec![Value::from(1)]], &[] as &[&str], IfExists::Fail)
            .unwrap_err();
        match err {
            SqliteError::DataError(DataError::NameValidation(
                NameValidationError::ValidReservedName { .. },
            )) => assert!(expect_valid_reserved, "{name}"),
            SqliteError::DataError(DataError::NameValidation(
                NameValidationError::InvalidReservedName { .. },
            )) => assert!(!expect_valid_reserved, "{name}"),
            other => panic!("unexpected error for {name}: {other}"),
        }
    }
    assert!(db.fetch_table_names().unwrap().is_empty());
}

#[test]
fn test_if_column_name_is_valid_reserved() {
    let db = SimpleSqlite::open_in_memory().unwrap();
    let err = db
        .create_table_from_data_matrix("t", &["if"], &[vec![Value::from(1)]], &[] as &[&str], IfExists::Fail)
        .unwrap_err();
    assert!(matches!(
        err,
        SqliteError::DataError(DataError::NameValidation(
            NameValidationError::ValidReservedName { .. }
        ))
    ));
}

#[test]
fn test_missing_index_attribute() {
    let db = SimpleSqlite::open_in_memory().unwrap();
    let err = db
        .create_table_from_data_matrix("t", &["a"], &[vec![Value::from(1)]], &["b"], IfExists::Fail)
        .unwrap_err();
    assert!(matches!(err, SqliteError::DataError(DataError::AttributeNotFound(_))));
}

// ---------------------------------------------------------------------------
// Query builder against the engine
// ---------------------------------------------------------------------------

#[test]
fn test_where_in_filters_rows() {
    let db = SimpleSqlite::open_in_memory().unwrap();
    db.create_table_from_data_matrix("tbl", &ATTRS, &sample_matrix(), &[] as &[&str], IfExists::Fail)
        .unwrap();

    let keys = [Value::from("aaa"), Value::from("ccc")];
    let where_in = make_where_in("attr_c", &keys).unwrap();
    let selected = db.select(&["attr_a"], "tbl", Some(where_in.as_str())).unwrap();
    assert_eq!(selected, vec![vec![Value::from(1)], vec![Value::from(3)]]);

    let where_not_in = make_where_not_in("attr_c", &keys).unwrap();
    let changed = db
        .update("tbl", "attr_b = 0.0", Some(where_not_in.as_str()))
        .unwrap();
    assert_eq!(changed, 1);
}

#[test]
fn test_where_in_matches_infinite_reals() {
    let db = SimpleSqlite::open_in_memory().unwrap();
    let matrix = vec![
        vec![Value::from(1), Value::Real(f64::INFINITY)],
        vec![Value::from(2), Value::Real(f64::NEG_INFINITY)],
        vec![Value::from(3), Value::Real(1.5)],
    ];
    db.create_table_from_data_matrix("t", &["id", "v"], &matrix, &[] as &[&str], IfExists::Fail)
        .unwrap();

    let keys = [Value::Real(f64::INFINITY), Value::Real(f64::NEG_INFINITY)];
    let where_in = make_where_in("v", &keys).unwrap();
    assert_eq!(where_in, "v IN (9e999, -9e999)");
    let rows = db.select(&["id"], "t", Some(where_in.as_str())).unwrap();
    assert_eq!(rows, vec![vec![Value::from(1)], vec![Value::from(2)]]);
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.yml");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(b"- {sku: A-1, qty: 3, price: 1.5}\n- {sku: B-2, qty: 7}\n")
        .unwrap();
    f.flush().unwrap();

    let db = SimpleSqlite::open_in_memory().unwrap();
    let counter = Arc::new(TableCounter::new());
    let loader = YamlTableLoader::from_file(&path, Arc::clone(&counter));
    let report = db.load(&loader, &["sku"], IfExists::Fail).unwrap();

    assert_eq!(report.tables.len(), 1);
    assert_eq!(report.tables[0].table_name, "inventory");
    assert_eq!(report.tables[0].rows, 2);
    let schema = db.schema_of("inventory").unwrap().unwrap();
    assert_eq!(schema.dumps(), "price REAL\nqty INTEGER\nsku TEXT");
    assert_eq!(schema.index_attrs, vec!["sku"]);
    assert_eq!(counter.format_count("yaml"), 1);
}

#[test]
fn test_load_errors_are_wrapped() {
    let db = SimpleSqlite::open_in_memory().unwrap();
    let loader = loader_for(
        Format::Json,
        LoaderSource::Text("{not json".into()),
        Arc::new(TableCounter::new()),
    );
    let err = db.load(&*loader, &[] as &[&str], IfExists::Fail).unwrap_err();
    assert!(matches!(err, SqliteError::LoaderError(_)));
}

#[test]
fn test_insert_many_rows_of_mixed_shapes() {
    let db = SimpleSqlite::open_in_memory().unwrap();
    db.create_table_from_data_matrix("t", &["a", "b"], &[], &[] as &[&str], IfExists::Fail)
        .unwrap();

    let json = serde_json::json!([[1, "x"], {"b": "y", "a": 2}, [3]]);
    let rows: Vec<Row> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|item| Row::from_json(item).unwrap())
        .collect();
    assert_eq!(db.insert_many("t", &rows).unwrap(), 3);

    let rows = db.select(&["a", "b"], "t", None).unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Value::from(1), Value::from("x")],
            vec![Value::from(2), Value::from("y")],
            vec![Value::from(3), Value::Null],
        ]
    );
}

#[test]
fn test_sqlite_master_serializes_like_a_table() {
    let db = SimpleSqlite::open_in_memory().unwrap();
    db.create_table_from_data_matrix(
        "sample_table",
        &["a", "b", "c", "d", "e"],
        &sample_matrix(),
        &["a"],
        IfExists::Fail,
    )
    .unwrap();

    let json = serde_json::to_value(db.fetch_sqlite_master().unwrap()).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["type"], "table");
    assert_eq!(entries[0]["tbl_name"], "sample_table");
    assert_eq!(entries[1]["type"], "index");
    assert_eq!(entries[1]["name"], "sample_table_a_index");
    assert_eq!(
        entries[1]["sql"],
        "CREATE INDEX sample_table_a_index ON sample_table(a)"
    );
}
