use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bin() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_simplesqlite"));
    command.env_remove("RUST_LOG");
    command
}

fn run(args: &[&str]) -> Output {
    bin().args(args).output().expect("failed to run simplesqlite")
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write input");
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

#[test]
fn load_creates_tables_and_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let users = write(
        dir.path(),
        "users.json",
        r#"[{"id": 1, "name": "alice"}, {"id": 2, "name": "bob", "score": 1.5}]"#,
    );
    let stock = write(dir.path(), "stock.yml", "- {sku: A-1, qty: 3}\n- {sku: B-2, qty: 7}\n");
    let db = dir.path().join("out.sqlite");

    let output = run(&[
        "load",
        "--if-exists",
        "fail",
        "--db",
        db.to_str().unwrap(),
        "--index",
        "id,sku",
        users.to_str().unwrap(),
        stock.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("created  users (2 row(s))"), "{out}");
    assert!(out.contains("created  stock (2 row(s))"), "{out}");
    assert!(out.contains("Loaded 2 table(s) from 2 file(s) [json=1, yaml=1]."), "{out}");

    let schema = run(&["schema", "--db", db.to_str().unwrap(), "--table", "users"]);
    assert!(schema.status.success());
    assert_eq!(stdout(&schema), "users:\nid INTEGER\nname TEXT\nscore REAL\n");
}

#[test]
fn load_multi_table_document() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(
        dir.path(),
        "bundle.json",
        r#"{"alpha": [{"a": 1}], "beta": [["x", "y"], [1, "two"]]}"#,
    );
    let db = dir.path().join("out.sqlite");

    let output = run(&["load", "--if-exists", "fail", "--db", db.to_str().unwrap(), doc.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let schema = run(&["schema", "--db", db.to_str().unwrap()]);
    assert_eq!(
        stdout(&schema),
        "alpha:\na INTEGER\n\nbeta:\nx INTEGER\ny TEXT\n"
    );
}

#[test]
fn load_fails_on_existing_table_then_replaces() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("out.sqlite");
    let first = write(dir.path(), "t.json", r#"[{"v": 1}]"#);

    assert!(run(&["load", "--if-exists", "fail", "--db", db.to_str().unwrap(), first.to_str().unwrap()])
        .status
        .success());

    let second = write(dir.path(), "t.json", r#"[{"v": "text"}]"#);
    let output = run(&["load", "--if-exists", "fail", "--db", db.to_str().unwrap(), second.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("error: "), "{}", stderr(&output));
    assert!(stderr(&output).contains("already exists"), "{}", stderr(&output));

    let output = run(&[
        "load",
        "--db",
        db.to_str().unwrap(),
        "--if-exists",
        "replace",
        second.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("replaced t (1 row(s))"));

    let schema = run(&["schema", "--db", db.to_str().unwrap(), "--table", "t"]);
    assert_eq!(stdout(&schema), "t:\nv TEXT\n");
}

#[test]
fn load_skip_keeps_existing_table() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("out.sqlite");
    let input = write(dir.path(), "t.json", r#"[{"v": 1}]"#);

    for _ in 0..2 {
        let output = run(&[
            "load",
            "--db",
            db.to_str().unwrap(),
            "--if-exists",
            "skip",
            input.to_str().unwrap(),
        ]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));
    }

    let output = run(&[
        "load",
        "--db",
        db.to_str().unwrap(),
        "--if-exists",
        "skip",
        input.to_str().unwrap(),
    ]);
    assert!(stdout(&output).contains("skipped  t (1 row(s))"));
}

#[test]
fn load_requires_explicit_policy() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("out.sqlite");
    let input = write(dir.path(), "t.json", r#"[{"v": 1}]"#);

    let output = run(&["load", "--db", db.to_str().unwrap(), input.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--if-exists"), "{}", stderr(&output));
    assert!(!db.exists());
}

#[test]
fn load_with_table_name_template() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("out.sqlite");
    let input = write(dir.path(), "orders.json", r#"[{"id": 1}]"#);

    let output = run(&[
        "load",
        "--if-exists",
        "fail",
        "--db",
        db.to_str().unwrap(),
        "--table-name",
        "raw_{default}",
        input.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("raw_orders"));
}

#[test]
fn load_rejects_reserved_table_name() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("out.sqlite");
    let input = write(dir.path(), "table.json", r#"[{"id": 1}]"#);

    let output = run(&["load", "--if-exists", "fail", "--db", db.to_str().unwrap(), input.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("error: "));
}

#[test]
fn load_unknown_extension_needs_format() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("out.sqlite");
    let input = write(dir.path(), "data.txt", r#"[{"id": 1}]"#);

    let output = run(&["load", "--if-exists", "fail", "--db", db.to_str().unwrap(), input.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("pass --format"));

    let output = run(&[
        "load",
        "--if-exists",
        "fail",
        "--db",
        db.to_str().unwrap(),
        "--format",
        "json",
        input.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("created  data"));
}

#[test]
fn load_with_explicit_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("out.sqlite");
    let files: Vec<PathBuf> = (0..6)
        .map(|i| write(dir.path(), &format!("t{i}.json"), &format!("[{{\"n\": {i}}}]")))
        .collect();

    let mut args = vec![
        "load".to_string(),
        "--if-exists".to_string(),
        "fail".to_string(),
        "--db".to_string(),
        db.to_str().unwrap().to_string(),
        "--jobs".to_string(),
        "3".to_string(),
    ];
    args.extend(files.iter().map(|f| f.to_str().unwrap().to_string()));

    let output = bin().args(&args).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Loaded 6 table(s) from 6 file(s) [json=6]."));
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_executes_plan_relative_to_its_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "users.json", r#"[{"id": 1, "name": "alice"}]"#);
    write(dir.path(), "items.data", "- {id: 10, label: x}\n");
    let plan = write(
        dir.path(),
        "plan.yml",
        r#"version: "1.0"
database: plan.sqlite
if_exists: replace
sources:
  - path: users.json
    index_attrs: [id]
  - path: items.data
    format: yaml
    table_name: "item_{default}"
"#,
    );

    let output = run(&["run", "--plan", plan.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Plan complete: 2 source(s)"));

    let db = dir.path().join("plan.sqlite");
    let master = run(&["master", "--db", db.to_str().unwrap()]);
    let entries: serde_json::Value = serde_json::from_slice(&master.stdout).unwrap();
    let names: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["item_items", "users", "users_id_index"]);
}

#[test]
fn run_missing_plan_fails() {
    let output = run(&["run", "--plan", "/nonexistent/plan.yml"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load plan"));
}

// ---------------------------------------------------------------------------
// schema / master
// ---------------------------------------------------------------------------

#[test]
fn schema_missing_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("empty.sqlite");
    let output = run(&["schema", "--db", db.to_str().unwrap(), "--table", "nope"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("table 'nope' not found"));
}

#[test]
fn master_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("out.sqlite");
    let input = write(dir.path(), "sample.json", r#"[{"a": 1, "b": "x"}]"#);
    assert!(run(&[
        "load",
        "--if-exists",
        "fail",
        "--db",
        db.to_str().unwrap(),
        "--index",
        "a",
        input.to_str().unwrap()
    ])
    .status
    .success());

    let output = run(&["master", "--db", db.to_str().unwrap()]);
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries[0]["type"], "table");
    assert_eq!(entries[0]["name"], "sample");
    assert_eq!(entries[1]["type"], "index");
    assert_eq!(entries[1]["sql"], "CREATE INDEX sample_a_index ON sample(a)");
}

#[test]
fn verbose_logs_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("out.sqlite");
    let input = write(dir.path(), "t.json", r#"[{"v": 1}]"#);

    let output = run(&["-v", "load", "--if-exists", "fail", "--db", db.to_str().unwrap(), input.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("materialized table"), "{}", stderr(&output));
    assert!(!stdout(&output).contains("materialized table"));
}
