//! Loading JSON documents through the shared table counter.
//!
//! Writes a multi-table JSON file and an anonymous JSON document, loads both
//! into one database, and prints what was created.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p simplesqlite-demos --example load_json
//! ```

use std::sync::Arc;

use serde::Serialize;
use simplesqlite_core::IfExists;
use simplesqlite_loader::{Format, JsonTableLoader, LoaderSource, TableCounter, loader_for};
use simplesqlite_sqlite::SimpleSqlite;

#[derive(Serialize)]
struct Order {
    id: i64,
    customer: String,
    total: f64,
    note: Option<String>,
}

#[derive(Serialize)]
struct Bundle {
    orders: Vec<Order>,
    customers: Vec<Vec<serde_json::Value>>,
}

fn main() {
    let dir = std::env::temp_dir().join("simplesqlite_load_json_demo");
    std::fs::create_dir_all(&dir).unwrap();

    let bundle = Bundle {
        orders: vec![
            Order { id: 1, customer: "alice".into(), total: 12.5, note: None },
            Order { id: 2, customer: "bob".into(), total: 3.0, note: Some("gift".into()) },
        ],
        customers: vec![
            vec!["name".into(), "since".into()],
            vec!["alice".into(), 2019.into()],
            vec!["bob".into(), 2021.into()],
        ],
    };
    let path = dir.join("shop.json");
    std::fs::write(&path, serde_json::to_string_pretty(&bundle).unwrap()).unwrap();

    let db = SimpleSqlite::open_in_memory().unwrap();
    let counter = Arc::new(TableCounter::new());

    let loader = JsonTableLoader::from_file(&path, Arc::clone(&counter));
    let report = db.load(&loader, &["id", "name"], IfExists::Fail).unwrap();

    // Text sources have no file stem, so the name comes from the counter.
    let anonymous = loader_for(
        Format::Json,
        LoaderSource::Text(r#"[{"k": "v"}]"#.into()),
        Arc::clone(&counter),
    );
    let more = db.load(&*anonymous, &[] as &[&str], IfExists::Fail).unwrap();

    for table in report.tables.iter().chain(&more.tables) {
        let schema = db.schema_of(&table.table_name).unwrap().unwrap();
        println!("{} ({}, {} rows)", table.table_name, table.outcome.as_str(), table.rows);
        for line in schema.dumps().lines() {
            println!("  {line}");
        }
    }

    let snapshot = counter.snapshot();
    println!();
    println!("tables counted: {} {:?}", snapshot.global, snapshot.per_format);

    std::fs::remove_dir_all(&dir).ok();
}
