//! Schema Registry CLI
//!
//! Loads JSON Schema files into a registry and validates documents against them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use schema_registry::{
    LoggingListener, Metadata, MetricsListener, RegistryConfig, RegistryError, SchemaRegistry,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-registry")]
#[command(about = "Validate JSON documents against named schemas")]
struct Cli {
    /// Config file (overrides the default search locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory of JSON Schema files
    #[arg(short, long, global = true)]
    schemas: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered schemas
    List,

    /// Validate one or more JSON documents against a schema
    Validate {
        /// Schema name
        schema: String,
        /// JSON documents to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print validation metrics when done
        #[arg(long)]
        stats: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the configuration to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when every command step ran but some document was rejected.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = RegistryConfig::load_from(cli.config.as_deref())?;
    if let Some(dir) = cli.schemas {
        config.registry.schemas_dir = Some(dir);
    }

    match cli.command {
        Commands::List => {
            let registry = open_registry(&config)?;
            if registry.is_empty() {
                println!("No schemas registered.");
            } else {
                println!("📚 Registered schemas:");
                for name in registry.names() {
                    println!("  {}", name);
                }
            }
            Ok(true)
        }

        Commands::Validate { schema, files, stats } => {
            let registry = open_registry(&config)?;
            let metrics = Arc::new(MetricsListener::new());

            let mut ctx = registry.create_context(config.registry.context_id.clone());
            if config.listeners.logging {
                ctx.add_listener(Arc::new(LoggingListener::from_config(&config.logging)));
            }
            if config.listeners.metrics || stats {
                ctx.add_listener(metrics.clone());
            }

            let mut all_valid = true;
            for file in &files {
                let content = std::fs::read_to_string(file)
                    .with_context(|| format!("reading {}", file.display()))?;
                let data: serde_json::Value = serde_json::from_str(&content)
                    .with_context(|| format!("parsing {}", file.display()))?;

                let mut metadata = Metadata::new();
                metadata.insert("file".to_string(), file.display().to_string().into());

                match ctx.validate(&schema, &data, Some(metadata)) {
                    Ok(_) => println!("✅ {} - valid", file.display()),
                    Err(RegistryError::SchemaValidationFailed { errors, .. }) => {
                        all_valid = false;
                        println!("❌ {} - INVALID", file.display());
                        for error in errors {
                            println!("   └─ {}", error);
                        }
                    }
                    Err(RegistryError::NotRegistered { name }) => {
                        let suggestions = registry.suggest(&name, 3);
                        if suggestions.is_empty() {
                            bail!("schema '{}' not registered", name);
                        }
                        bail!(
                            "schema '{}' not registered (did you mean: {}?)",
                            name,
                            suggestions.join(", ")
                        );
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            if stats {
                println!();
                println!("{}", serde_json::to_string_pretty(&metrics.get_stats())?);
            }
            Ok(all_valid)
        }

        Commands::Config { output } => {
            if let Some(path) = output {
                config.save(&path)?;
                println!("✅ Configuration written to {:?}", path);
            } else {
                print!("{}", config.to_toml()?);
            }
            Ok(true)
        }
    }
}

fn open_registry(config: &RegistryConfig) -> anyhow::Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    if let Some(dir) = &config.registry.schemas_dir {
        registry
            .load_dir(dir)
            .with_context(|| format!("loading schemas from {}", dir.display()))?;
    }
    Ok(registry)
}
