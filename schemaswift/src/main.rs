//! CLI entry point for schemaswift

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use schemaswift::codegen::UnknownTypePolicy;
use schemaswift::config::CodegenConfig;

#[derive(Parser)]
#[command(name = "schemaswift")]
#[command(about = "Generate Swift Codable row structs and enums from a PostgreSQL schema")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a PostgreSQL DDL file (overrides config)
    #[arg(long)]
    schema_file: Option<PathBuf>,

    /// Path to a JSON schema snapshot (overrides config)
    #[arg(long, conflicts_with = "schema_file")]
    snapshot: Option<PathBuf>,

    /// The schema in the database to generate models for (default "public")
    #[arg(short, long)]
    schema: Option<String>,

    /// Output file; prints to stdout when not specified
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Map unknown column types to this Swift type instead of failing
    #[arg(long)]
    fallback_type: Option<String>,

    /// Mark generated declarations public
    #[arg(long)]
    public: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the Swift file (default)
    Generate,
    /// Inspect schema (show parsed enums and tables for debugging)
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    // stdout carries the generated document, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(schema_file) = cli.schema_file {
        config.schema_file = Some(schema_file);
        config.snapshot_file = None;
    }
    if let Some(snapshot) = cli.snapshot {
        config.snapshot_file = Some(snapshot);
        config.schema_file = None;
    }
    if let Some(schema) = cli.schema {
        config.schema = schema;
    }
    if let Some(output) = cli.output {
        config.output = Some(output);
    }
    if let Some(fallback_type) = cli.fallback_type {
        config.unknown_types = UnknownTypePolicy::Fallback;
        config.fallback_type = fallback_type;
    }
    if cli.public {
        config.access_level = schemaswift::codegen::AccessLevel::Public;
    }

    // Validate configuration
    config.validate()?;

    if let Some(Commands::Inspect) = &cli.command {
        return inspect_schema(&config);
    }

    info!("Generating Swift models for schema `{}`", config.schema);
    schemaswift::generate(&config)?;

    info!("Code generation completed successfully");
    Ok(())
}

fn inspect_schema(config: &CodegenConfig) -> Result<()> {
    let model = schemaswift::read_schema(config)?;

    println!(
        "Schema `{}`: {} enums, {} tables\n",
        model.schema,
        model.enums.len(),
        model.tables.len()
    );

    for enum_def in &model.enums {
        println!("Enum: {}", enum_def.name);
        println!("  Values: {:?}", enum_def.values);
        println!();
    }

    for table in &model.tables {
        println!("Table: {}", table.name);
        println!("  Columns:");
        for col in &table.columns {
            let nullable = if col.is_nullable { "NULL" } else { "NOT NULL" };
            let enum_ref = col
                .enum_type
                .as_ref()
                .map(|e| format!(" (enum {})", e))
                .unwrap_or_default();
            println!(
                "    - {} {} {}{}",
                col.name, col.declared_type, nullable, enum_ref
            );
        }
        println!();
    }

    Ok(())
}
