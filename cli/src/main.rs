use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use simplesqlite_core::IfExists;
use simplesqlite_loader::{
    DEFAULT_TABLE_NAME_TEMPLATE, Format, LoadPlan, LoaderSource, TableCounter, TableData,
    loader_with_template,
};
use simplesqlite_sqlite::{LoadReport, SimpleSqlite};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "simplesqlite")]
#[command(about = "Load JSON and YAML documents into SQLite tables with inferred schemas")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load one or more files into a database.
    Load(LoadArgs),
    /// Execute a load plan file.
    Run(RunArgs),
    /// Print the schema dump of one or every table.
    Schema(SchemaArgs),
    /// Print sqlite_master as JSON.
    Master(MasterArgs),
}

#[derive(Debug, Args)]
struct LoadArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// What to do with tables that already exist (fail, skip, replace).
    #[arg(long, required = true)]
    if_exists: IfExists,
    /// Input format; inferred from each file's extension when omitted.
    #[arg(long)]
    format: Option<Format>,
    /// Table name template; `{default}` expands to the file stem or key.
    #[arg(long, default_value = DEFAULT_TABLE_NAME_TEMPLATE)]
    table_name: String,
    /// Comma-separated attributes to index.
    #[arg(long)]
    index: Option<String>,
    /// Number of parallel parse jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
    /// JSON or YAML files to load.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Path to the load plan YAML.
    #[arg(long)]
    plan: PathBuf,
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Only print this table.
    #[arg(long)]
    table: Option<String>,
}

#[derive(Debug, Args)]
struct MasterArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Load(args) => run_load(args),
        Command::Run(args) => run_plan(args),
        Command::Schema(args) => run_schema(args),
        Command::Master(args) => run_master(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ---------------------------------------------------------------------------
// load command
// ---------------------------------------------------------------------------

fn run_load(args: LoadArgs) -> Result<(), String> {
    let index_attrs = parse_csv_list(args.index);
    let counter = Arc::new(TableCounter::new());

    let work: Vec<(PathBuf, Format)> = args
        .files
        .iter()
        .map(|path| {
            let format = args.format.or_else(|| Format::from_path(path)).ok_or_else(|| {
                format!(
                    "cannot infer format of '{}'; pass --format",
                    path.display()
                )
            })?;
            Ok((path.clone(), format))
        })
        .collect::<Result<_, String>>()?;

    let parse = || -> Result<Vec<Vec<TableData>>, String> {
        work.par_iter()
            .map(|(path, format)| {
                let loader = loader_with_template(
                    *format,
                    LoaderSource::File(path.clone()),
                    &args.table_name,
                    Arc::clone(&counter),
                );
                let tables = loader
                    .load()
                    .map_err(|e| format!("Failed to load '{}': {e}", path.display()))?;
                debug!(path = %path.display(), tables = tables.len(), "parsed");
                Ok(tables)
            })
            .collect()
    };

    let parsed = match args.jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| format!("Failed to create thread pool: {e}"))?
            .install(parse)?,
        None => parse()?,
    };

    let db = open_database(&args.db)?;
    let mut report = LoadReport::default();
    for (tables, path) in parsed.iter().zip(&args.files) {
        let file_report = db
            .materialize(tables, index_attrs.as_slice(), args.if_exists)
            .map_err(|e| format!("Failed to materialize '{}': {e}", path.display()))?;
        report.extend(file_report);
    }

    print_report(&report);
    let snapshot = counter.snapshot();
    let per_format: Vec<String> = snapshot
        .per_format
        .iter()
        .map(|(format, count)| format!("{format}={count}"))
        .collect();
    println!(
        "Loaded {} table(s) from {} file(s) [{}].",
        snapshot.global,
        args.files.len(),
        per_format.join(", ")
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// run command
// ---------------------------------------------------------------------------

fn run_plan(args: RunArgs) -> Result<(), String> {
    let plan = LoadPlan::load(&args.plan)
        .map_err(|e| format!("Failed to load plan '{}': {e}", args.plan.display()))?;
    info!(
        plan = %args.plan.display(),
        sources = plan.sources.len(),
        if_exists = %plan.if_exists,
        "running load plan"
    );

    let db = open_database(&plan.database)?;
    let counter = Arc::new(TableCounter::new());
    let mut report = LoadReport::default();

    for source in &plan.sources {
        let format = source.resolved_format().map_err(|e| e.to_string())?;
        let loader = loader_with_template(
            format,
            LoaderSource::File(source.path.clone()),
            source.table_name_template(),
            Arc::clone(&counter),
        );
        let source_report = db
            .load(&*loader, source.index_attrs.as_slice(), plan.if_exists)
            .map_err(|e| format!("Failed to load '{}': {e}", source.path.display()))?;
        report.extend(source_report);
    }

    print_report(&report);
    println!(
        "Plan complete: {} source(s) into '{}'.",
        plan.sources.len(),
        plan.database.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// schema and master commands
// ---------------------------------------------------------------------------

fn run_schema(args: SchemaArgs) -> Result<(), String> {
    let db = open_database(&args.db)?;
    let tables = match args.table {
        Some(table) => vec![table],
        None => db.fetch_table_names().map_err(|e| e.to_string())?,
    };

    for (i, table) in tables.iter().enumerate() {
        let schema = db
            .schema_of(table)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("table '{table}' not found"))?;
        if i > 0 {
            println!();
        }
        println!("{}:", schema.table_name);
        println!("{}", schema.dumps());
    }
    Ok(())
}

fn run_master(args: MasterArgs) -> Result<(), String> {
    let db = open_database(&args.db)?;
    let entries = db.fetch_sqlite_master().map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&entries)
        .map_err(|e| format!("Failed to serialize sqlite_master: {e}"))?;
    println!("{json}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_database(path: &Path) -> Result<SimpleSqlite, String> {
    SimpleSqlite::open(path)
        .map_err(|e| format!("Failed to open database '{}': {e}", path.display()))
}

fn print_report(report: &LoadReport) {
    for table in &report.tables {
        println!(
            "  {:<8} {} ({} row(s))",
            table.outcome.as_str(),
            table.table_name,
            table.rows
        );
    }
}

/// Splits a comma-separated list, dropping blanks.
fn parse_csv_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
