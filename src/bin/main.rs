//! Canteiro BI CLI - run multi-table reports against JSON data
//!
//! Usage:
//!   canteiro-bi tables --catalog <catalog.toml>
//!   canteiro-bi fields <table> --catalog <catalog.toml>
//!   canteiro-bi run --data <rows.json> --template <report.json> [--start <date> --end <date> | --preset <preset>]
//!
//! Examples:
//!   canteiro-bi tables --catalog catalog.toml
//!   canteiro-bi run --catalog catalog.toml --data rows.json --template despesas.json --preset this-month
//!   canteiro-bi run --data rows.json --template despesas.json --start 2024-01-01 --end 2024-01-31 --filter cliente_id=3

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use canteiro_bi::catalog::FieldCatalog;
use canteiro_bi::config::Settings;
use canteiro_bi::engine::ReportEngine;
use canteiro_bi::model::{DatePreset, ReportDefinition};
use canteiro_bi::storage::InMemoryStorage;
use canteiro_bi::view::{render_table, CellFormatter};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "canteiro-bi")]
#[command(about = "Canteiro BI - dynamic multi-table reports")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to CANTEIRO_CONFIG, ./canteiro.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Field catalog file (overrides `catalog_path` from settings)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tables in the catalog
    Tables,

    /// List the fields of one table
    Fields {
        /// Table name
        table: String,
    },

    /// Run a report template against a JSON data file
    Run {
        /// JSON file shaped {"table": [{...}, ...]}
        #[arg(short, long)]
        data: PathBuf,

        /// Report template saved as JSON
        #[arg(short, long)]
        template: PathBuf,

        /// Start date (YYYY-MM-DD)
        #[arg(long, requires = "end", conflicts_with = "preset")]
        start: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long, requires = "start", conflicts_with = "preset")]
        end: Option<String>,

        /// Date range preset relative to today
        #[arg(long)]
        preset: Option<PresetArg>,

        /// Entity filter as name=value; repeatable
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        /// Print the output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum PresetArg {
    Today,
    ThisMonth,
    LastMonth,
    ThisYear,
    Last30Days,
}

impl From<PresetArg> for DatePreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Today => DatePreset::Today,
            PresetArg::ThisMonth => DatePreset::ThisMonth,
            PresetArg::LastMonth => DatePreset::LastMonth,
            PresetArg::ThisYear => DatePreset::ThisYear,
            PresetArg::Last30Days => DatePreset::Last30Days,
        }
    }
}

fn parse_filter(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected name=value, got '{arg}'")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Settings error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let catalog = match load_catalog(cli.catalog.as_deref(), &settings) {
        Ok(c) => c,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Tables => cmd_tables(&catalog),
        Commands::Fields { table } => cmd_fields(&catalog, &table),
        Commands::Run {
            data,
            template,
            start,
            end,
            preset,
            filters,
            json,
        } => {
            let options = RunOptions {
                start,
                end,
                preset,
                filters,
                json,
            };
            cmd_run(catalog, settings, &data, &template, options).await
        }
    }
}

fn load_catalog(path: Option<&Path>, settings: &Settings) -> Result<FieldCatalog, String> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match settings.resolved_catalog_path() {
            Ok(Some(p)) => p,
            Ok(None) => return Err("No catalog given: pass --catalog or set catalog_path".into()),
            Err(e) => return Err(format!("Settings error: {}", e)),
        },
    };

    FieldCatalog::from_file(&path)
        .map_err(|e| format!("Error loading catalog '{}': {}", path.display(), e))
}

fn cmd_tables(catalog: &FieldCatalog) -> ExitCode {
    if catalog.is_empty() {
        println!("No tables defined.");
        return ExitCode::SUCCESS;
    }

    println!("Tables:");
    for table in catalog.tables() {
        let date_column = table.date_column.as_deref().unwrap_or("(default)");
        println!(
            "  - {} ({} fields, date column: {})",
            table.name,
            table.fields.len(),
            date_column
        );
        if !table.entity_filters.is_empty() {
            println!("      filters: {}", table.entity_filters.join(", "));
        }
    }
    ExitCode::SUCCESS
}

fn cmd_fields(catalog: &FieldCatalog, table: &str) -> ExitCode {
    if !catalog.has_table(table) {
        eprintln!("Unknown table: {}", table);
        return ExitCode::FAILURE;
    }

    println!("{}:", table);
    for field in catalog.get_fields(table) {
        let mut flags = Vec::new();
        if field.aggregatable {
            flags.push("sum");
        }
        if field.groupable {
            flags.push("group");
        }
        println!(
            "  - {} \"{}\" [{}] {}",
            field.key,
            field.label,
            field.value_type,
            flags.join(",")
        );
    }
    ExitCode::SUCCESS
}

struct RunOptions {
    start: Option<String>,
    end: Option<String>,
    preset: Option<PresetArg>,
    filters: Vec<(String, String)>,
    json: bool,
}

async fn cmd_run(
    catalog: FieldCatalog,
    settings: Settings,
    data: &Path,
    template: &Path,
    options: RunOptions,
) -> ExitCode {
    let storage = match fs::read_to_string(data)
        .map_err(|e| e.to_string())
        .and_then(|json| InMemoryStorage::from_json_str(&json).map_err(|e| e.to_string()))
    {
        Ok(s) => s.with_row_id_column(settings.engine.row_id_column.clone()),
        Err(e) => {
            eprintln!("Error reading data '{}': {}", data.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let report = match fs::read_to_string(template)
        .map_err(|e| e.to_string())
        .and_then(|json| ReportDefinition::from_json(&json, &catalog).map_err(|e| e.to_string()))
    {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error loading template '{}': {}", template.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let catalog = Arc::new(catalog);
    let mut engine = match ReportEngine::with_report(catalog, settings.engine.clone(), report) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Invalid template: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(preset) = options.preset {
        engine.apply_preset(preset.into(), Local::now().date_naive());
    }
    if let (Some(start), Some(end)) = (options.start, options.end) {
        engine.set_date_range(start, end);
    }
    for (name, value) in options.filters {
        engine.set_entity_filter(name, value);
    }

    let output = match engine.run(&storage).await {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Report error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if options.json {
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding output: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    let formatter = CellFormatter::new(settings.format);
    print!("{}", render_table(&output, &formatter));
    if output.truncated() {
        eprintln!(
            "warning: some tables hit the {} row limit; results are incomplete",
            settings.engine.row_limit
        );
    }
    println!("{} rows", output.rows.len());
    ExitCode::SUCCESS
}
