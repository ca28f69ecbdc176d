//! Dumping `sqlite_master` as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p simplesqlite-demos --example sqlite_master
//! ```

use simplesqlite_core::{IfExists, Value};
use simplesqlite_sqlite::SimpleSqlite;

fn main() {
    let db = SimpleSqlite::open_in_memory().unwrap();

    let matrix = vec![
        vec![Value::from(1), Value::from("a")],
        vec![Value::from(2), Value::from("b")],
    ];
    db.create_table_from_data_matrix("users", &["id", "name"], &matrix, &["id", "name"], IfExists::Fail)
        .unwrap();
    db.create_table_from_data_matrix("empty", &["x"], &[], &[] as &[&str], IfExists::Fail)
        .unwrap();

    let master = db.fetch_sqlite_master().unwrap();
    println!("{}", serde_json::to_string_pretty(&master).unwrap());
}
