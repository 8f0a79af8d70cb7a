//! Command-line interface for the scout search engine.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use scout_config::{CONFIG_FILENAME, Config};
use scout_entity::{EntityKind, IndexedEntity};
use scout_index::{Pagination, SearchEngine, SearchQuery};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Embedded full-text search over application records")]
/// Top-level CLI options.
struct Cli {
    /// Path to a scout.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    /// Subcommand to execute.
    command: Commands,
}

#[derive(Subcommand)]
/// Supported `scout` subcommands.
enum Commands {
    /// Index records from a JSON file (an array of entities)
    Index {
        /// File holding the records
        file: PathBuf,
    },

    /// Search the index
    Search {
        /// Query text
        #[arg(required = true)]
        query: Vec<String>,

        /// Results per page
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Page to display (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Restrict to entity kinds (repeatable)
        #[arg(short, long)]
        kind: Vec<String>,

        /// Restrict to tags (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,

        /// Emit the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Complete a partial query against indexed terms
    Suggest {
        /// Partial query text
        partial: String,

        /// Maximum completions
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Show index statistics
    Stats,

    /// Drop all in-memory and on-disk index state
    Clear,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let engine = match SearchEngine::open(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Index { file } => cmd_index(engine, &file),
        Commands::Search {
            query,
            limit,
            page,
            kind,
            tag,
            json,
        } => cmd_search(engine, &query.join(" "), limit, page, &kind, tag, json),
        Commands::Suggest { partial, limit } => cmd_suggest(engine, &partial, limit),
        Commands::Stats => cmd_stats(engine),
        Commands::Clear => cmd_clear(engine),
    }
}

/// Closes the engine, reporting a failed final flush.
fn finish(mut engine: SearchEngine) -> ExitCode {
    if let Err(e) = engine.close() {
        eprintln!("error: final flush failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Implements the `scout index` command.
fn cmd_index(engine: SearchEngine, file: &Path) -> ExitCode {
    let raw = match fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", file.display());
            return ExitCode::FAILURE;
        }
    };
    let entities: Vec<IndexedEntity> = match serde_json::from_str(&raw) {
        Ok(entities) => entities,
        Err(e) => {
            eprintln!("error: failed to parse {}: {e}", file.display());
            return ExitCode::FAILURE;
        }
    };

    let count = entities.len();
    for entity in entities {
        if let Err(e) = engine.index_entity(entity) {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }
    println!("Indexed {count} entities");
    finish(engine)
}

/// Implements the `scout search` command.
fn cmd_search(
    engine: SearchEngine,
    text: &str,
    limit: usize,
    page: usize,
    kinds: &[String],
    tags: Vec<String>,
    json: bool,
) -> ExitCode {
    let mut query = SearchQuery::new(text);
    query.pagination = Pagination { page, limit };
    query.filters.tags = tags;
    for kind in kinds {
        match kind.parse::<EntityKind>() {
            Ok(kind) => query.filters.kinds.push(kind),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let response = match engine.search(&query) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if json {
        match serde_json::to_string_pretty(&response) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
        return finish(engine);
    }

    if response.results.is_empty() {
        println!("No results");
        if !response.suggestions.is_empty() {
            println!("Did you mean: {}", response.suggestions.join(", "));
        }
        return finish(engine);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Score", "Kind", "Title", "Breadcrumb", "Matched"]);
    for result in &response.results {
        table.add_row(vec![
            Cell::new(format!("{:.1}", result.score)),
            Cell::new(result.kind.to_string()),
            Cell::new(&result.title),
            Cell::new(&result.breadcrumb),
            Cell::new(result.matched_fields.join(", ")),
        ]);
    }
    println!("{table}");
    println!(
        "Page {}/{} ({} results, {} ms)",
        response.pagination.page,
        response.pagination.total_pages,
        response.pagination.total,
        response.search_time_ms
    );
    finish(engine)
}

/// Implements the `scout suggest` command.
fn cmd_suggest(engine: SearchEngine, partial: &str, limit: usize) -> ExitCode {
    match engine.suggestions(partial, limit) {
        Ok(suggestions) => {
            for suggestion in suggestions {
                println!("{suggestion}");
            }
            finish(engine)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Implements the `scout stats` command.
fn cmd_stats(engine: SearchEngine) -> ExitCode {
    let stats = match engine.statistics() {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Entities"), Cell::new(stats.entities)]);
    table.add_row(vec![Cell::new("Terms"), Cell::new(stats.terms)]);
    table.add_row(vec![
        Cell::new("Index size (bytes)"),
        Cell::new(stats.index_size_bytes),
    ]);
    table.add_row(vec![
        Cell::new("Cached responses"),
        Cell::new(stats.cached_responses),
    ]);
    table.add_row(vec![
        Cell::new("Pending updates"),
        Cell::new(stats.pending_updates),
    ]);
    for (kind, count) in &stats.by_kind {
        table.add_row(vec![Cell::new(format!("Kind: {kind}")), Cell::new(*count)]);
    }
    println!("{table}");

    if !stats.top_terms.is_empty() {
        let rendered: Vec<String> = stats
            .top_terms
            .iter()
            .map(|(term, count)| format!("{term} ({count})"))
            .collect();
        println!("Top terms: {}", rendered.join(", "));
    }
    finish(engine)
}

/// Implements the `scout clear` command.
fn cmd_clear(engine: SearchEngine) -> ExitCode {
    if let Err(e) = engine.clear() {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    println!("Index cleared");
    finish(engine)
}
