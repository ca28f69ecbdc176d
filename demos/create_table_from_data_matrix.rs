//! Table creation from a data matrix.
//!
//! Builds a table whose column types are inferred from the values, indexes
//! one attribute, and reads the schema back.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p simplesqlite-demos --example create_table_from_data_matrix
//! ```

use simplesqlite_core::{IfExists, Value};
use simplesqlite_sqlite::SimpleSqlite;

fn main() {
    let db = SimpleSqlite::open_in_memory().unwrap();

    let attrs = ["attr_a", "attr_b", "attr_c", "attr_d", "attr_e"];
    let matrix = vec![
        vec![1.into(), 1.1.into(), "aaa".into(), 1.into(), 1.into()],
        vec![2.into(), 2.2.into(), "bbb".into(), 2.2.into(), 2.2.into()],
        vec![3.into(), 3.3.into(), "ccc".into(), 3.into(), "ccc".into()],
    ];

    let outcome = db
        .create_table_from_data_matrix("sample_table", &attrs, &matrix, &["attr_a"], IfExists::Fail)
        .unwrap();
    println!("sample_table: {}", outcome.as_str());

    let schema = db.schema_of("sample_table").unwrap().unwrap();
    println!("{}", schema.dumps());
    println!("indexed: {:?}", schema.index_attrs);
    println!();

    // Mixed int/real columns widen to REAL, anything with text becomes TEXT.
    for row in db.select(&attrs, "sample_table", None).unwrap() {
        let cells: Vec<String> = row.iter().map(Value::to_string).collect();
        println!("{}", cells.join(" | "));
    }

    let outcome = db
        .create_table_from_data_matrix(
            "sample_table",
            &["only"],
            &[vec![Value::from("replaced")]],
            &[] as &[&str],
            IfExists::Replace,
        )
        .unwrap();
    println!();
    println!("sample_table: {}", outcome.as_str());
    println!("{}", db.schema_of("sample_table").unwrap().unwrap().dumps());
}
