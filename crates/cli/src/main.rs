mod commands;
mod config;
mod llm;
mod logging;
mod manifest;
mod orchestrator;
mod planner;
mod serve;
mod verify;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Prompt-to-scaffold application generator.
#[derive(Parser)]
#[command(
    name = "blueprint",
    version,
    about = "Prompt-to-scaffold application generator"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a TOML config file (default: ./blueprint.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a problem statement, record a build and generate its workspace
    Generate {
        /// Natural-language problem statement
        problem: String,
        /// Path to the JSON run store (default: <workspace_root>/blueprint-store.json)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Write the static scaffold and template app for a specification
    Scaffold {
        /// Path to the specification JSON file
        spec: PathBuf,
        /// Output directory
        #[arg(long)]
        out: PathBuf,
    },

    /// Generate higher-fidelity files with the model, validating each one
    Codegen {
        /// Path to the specification JSON file
        spec: PathBuf,
        /// Output directory
        #[arg(long)]
        out: PathBuf,
        /// Only generate targets whose path contains this string
        #[arg(long)]
        only: Option<String>,
    },

    /// Check a generated file for JSON validity or bracket balance
    Validate {
        /// Path to the file to check
        file: PathBuf,
    },

    /// Run the verification gate over a generated workspace
    Verify {
        /// Workspace directory
        dir: PathBuf,
    },

    /// List recorded builds, or the runs of one build
    Runs {
        /// Build to show in detail
        build_id: Option<String>,
        /// Path to the JSON run store (default: <workspace_root>/blueprint-store.json)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
        /// Persist runs to this JSON store instead of memory
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.output, cli.quiet);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e.to_string(), cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Generate { problem, store } => {
            commands::generate::cmd_generate(
                &problem,
                store.as_deref(),
                &config,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Scaffold { spec, out } => {
            commands::scaffold::cmd_scaffold(&spec, &out, cli.output, cli.quiet);
        }
        Commands::Codegen { spec, out, only } => {
            commands::codegen::cmd_codegen(
                &spec,
                &out,
                only.as_deref(),
                &config,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Validate { file } => {
            commands::validate::cmd_validate(&file, cli.output, cli.quiet);
        }
        Commands::Verify { dir } => {
            commands::verify::cmd_verify(&dir, &config, cli.output, cli.quiet);
        }
        Commands::Runs { build_id, store } => {
            commands::runs::cmd_runs(
                build_id.as_deref(),
                store.as_deref(),
                &config,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Serve { port, store } => {
            let rt = commands::runtime(cli.output, cli.quiet);
            if let Err(e) = rt.block_on(serve::start_server(port, config, store)) {
                report_error(&format!("server error: {}", e), cli.output, cli.quiet);
                process::exit(1);
            }
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
