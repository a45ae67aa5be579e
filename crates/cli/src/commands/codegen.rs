use std::path::Path;
use std::process;
use std::sync::Arc;

use blueprint_codegen::CodegenEngine;

use super::{print_json, read_spec, runtime};
use crate::config::Config;
use crate::llm::AnthropicClient;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_codegen(
    spec_path: &Path,
    out: &Path,
    only: Option<&str>,
    config: &Config,
    output: OutputFormat,
    quiet: bool,
) {
    let spec = read_spec(spec_path, output, quiet);
    let Some(client) = AnthropicClient::from_config(config) else {
        report_error(
            "ANTHROPIC_API_KEY is not set; codegen needs a model",
            output,
            quiet,
        );
        process::exit(1);
    };

    let engine = CodegenEngine::new(Arc::new(client), out);
    let rt = runtime(output, quiet);
    let result = rt.block_on(async {
        match only {
            Some(filter) => engine.generate_matching(&spec, filter).await,
            None => engine.generate_all(&spec).await,
        }
    });

    let outcomes = match result {
        Ok(outcomes) => outcomes,
        Err(e) => {
            report_error(&format!("codegen failed: {}", e), output, quiet);
            process::exit(1);
        }
    };

    if outcomes.is_empty() {
        let msg = format!("no codegen target matches '{}'", only.unwrap_or_default());
        report_error(&msg, output, quiet);
        process::exit(1);
    }

    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => {
            for outcome in &outcomes {
                match &outcome.validation_error {
                    None => println!(
                        "ok       {} ({} attempt(s))",
                        outcome.path.display(),
                        outcome.attempts
                    ),
                    Some(msg) => println!("invalid  {}: {}", outcome.path.display(), msg),
                }
            }
            let invalid = outcomes.iter().filter(|o| !o.is_valid()).count();
            println!(
                "{} target(s) written, {} failed validation",
                outcomes.len(),
                invalid
            );
        }
        OutputFormat::Json => print_json(&outcomes, output, quiet),
    }
}
