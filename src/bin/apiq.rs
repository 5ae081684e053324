//! apiq — inspect query parameters and validation errors
//!
//! # Usage
//!
//! ```bash
//! # Expand a failed response's dotted errors
//! curl -s ... | apiq expand
//!
//! # Explain a parameter payload
//! apiq explain params.json
//!
//! # Show the parameter names in effect
//! apiq params --config ./apiq.toml
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::*;
use apiq::expander::{expand_value, rewrite_errors};
use apiq::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apiq")]
#[command(version)]
#[command(about = "Inspect apiq query parameters and validation errors", long_about = None)]
#[command(after_help = "EXAMPLES:
    apiq expand response.json
    echo '{\"items.0.qty\": [\"min:1\"]}' | apiq expand
    apiq explain params.json
    apiq params")]
struct Cli {
    /// Config file (defaults to the user config dir)
    #[arg(short, long, global = true, env = "APIQ_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand dotted validation errors into nested JSON
    Expand {
        /// JSON file: a failure payload with an `errors` field, or the flat map itself (stdin if omitted)
        file: Option<PathBuf>,
    },
    /// Explain a parameter payload: columns, filter tree and relationships
    Explain {
        /// JSON parameter file (stdin if omitted)
        file: Option<PathBuf>,
    },
    /// Show the parameter names in effect
    Params,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Expand { file } => expand_input(file.as_deref()),
        Commands::Explain { file } => {
            let config = load_config(cli)?;
            explain_params(file.as_deref(), &config.param_names)
        }
        Commands::Params => {
            let config = load_config(cli)?;
            show_params(&config.param_names);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ApiConfig> {
    match &cli.config {
        Some(path) => ApiConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => ApiConfig::discover().context("Failed to load config"),
    }
}

fn read_json(file: Option<&Path>) -> anyhow::Result<serde_json::Value> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Input is not valid JSON")
}

fn expand_input(file: Option<&Path>) -> anyhow::Result<()> {
    let mut input = read_json(file)?;

    let output = if input.get("errors").is_some() {
        rewrite_errors(&mut input)?;
        input
    } else {
        expand_value(&input)?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn explain_params(file: Option<&Path>, names: &ParamNames) -> anyhow::Result<()> {
    let input = read_json(file)?;
    let Some(params) = input.as_object() else {
        bail!("Parameters must be a JSON object");
    };
    let built = BuiltQuery::from_params(params, names)?;

    println!("{}", "Query Explanation".cyan().bold());
    println!();

    if built.is_empty() {
        println!("{}", "(empty query)".dimmed());
        return Ok(());
    }

    if let Some(columns) = &built.columns {
        println!("  {}", "Columns:".dimmed());
        for col in columns {
            println!("    • {}", col.white());
        }
    }

    if let Some(filters) = &built.filters {
        println!("  {}", "Filters:".dimmed());
        print_filters(filters, 2);
    }

    if let Some(relationships) = &built.relationships {
        println!("  {}", "Relationships:".dimmed());
        print_relationships(relationships, 2);
    }

    println!();
    println!("{}", "Query string:".green().bold());
    println!("  {}", to_query_string(&built.to_params(names)?).white());
    Ok(())
}

fn print_filters(nodes: &[FilterNode], depth: usize) {
    let pad = "  ".repeat(depth);
    for node in nodes {
        match node {
            FilterNode::Join(join) => println!("{}{}", pad, join.to_string().to_uppercase().magenta()),
            FilterNode::Condition(cond) => {
                let args: Vec<String> = cond.args.iter().map(|a| a.to_string()).collect();
                println!("{}{} {}", pad, cond.kind.to_string().cyan(), args.join(" ").yellow());
            }
            FilterNode::Group(group) => {
                println!("{}(", pad);
                print_filters(group, depth + 1);
                println!("{})", pad);
            }
        }
    }
}

fn print_relationships(relationships: &[Relationship], depth: usize) {
    let pad = "  ".repeat(depth);
    for rel in relationships {
        match rel {
            Relationship::Name(name) => println!("{}• {}", pad, name.white()),
            Relationship::Columns { name, columns } => {
                println!("{}• {} {}", pad, name.white(), format!("[{}]", columns.join(", ")).yellow())
            }
            Relationship::Nested(nested) => {
                println!("{}• {}", pad, nested.name.white());
                if let Some(columns) = &nested.columns {
                    println!("{}  {} {}", pad, "columns:".dimmed(), columns.join(", ").yellow());
                }
                if let Some(filters) = &nested.filters {
                    println!("{}  {}", pad, "filters:".dimmed());
                    print_filters(filters, depth + 2);
                }
                if let Some(children) = &nested.relationships {
                    println!("{}  {}", pad, "relationships:".dimmed());
                    print_relationships(children, depth + 2);
                }
            }
        }
    }
}

fn show_params(names: &ParamNames) {
    println!("{}", "Parameter names".cyan().bold());
    println!();
    println!("  {:15} {}", "columns".white().bold(), names.columns.yellow());
    println!("  {:15} {}", "filters".white().bold(), names.filters.yellow());
    println!("  {:15} {}", "relationships".white().bold(), names.relationships.yellow());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_falls_back_to_env() {
        let command = Cli::command();
        let config = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert_eq!(config.get_env(), Some(std::ffi::OsStr::new(apiq::config::CONFIG_ENV)));
    }

    #[test]
    fn test_explicit_config_flag() {
        let cli = Cli::try_parse_from(["apiq", "params", "--config", "./apiq.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("./apiq.toml")));
        assert!(matches!(cli.command, Commands::Params));
    }
}
