use std::path::Path;
use std::process;

use blueprint_codegen::ModelClient;

use super::{open_store, print_json, runtime, store_path};
use crate::config::Config;
use crate::llm::AnthropicClient;
use crate::orchestrator::Orchestrator;
use crate::verify::verifier_for;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_generate(
    problem: &str,
    store: Option<&Path>,
    config: &Config,
    output: OutputFormat,
    quiet: bool,
) {
    if problem.trim().is_empty() {
        report_error("problem statement is empty", output, quiet);
        process::exit(1);
    }

    let verifier = match verifier_for(config) {
        Ok(v) => v,
        Err(e) => {
            report_error(&format!("invalid verification command: {}", e), output, quiet);
            process::exit(1);
        }
    };
    let client = AnthropicClient::from_config(config);
    let store = store_path(config, store);

    let rt = runtime(output, quiet);
    let result = rt.block_on(async {
        let storage = open_store(&store)
            .await
            .map_err(|e| format!("error opening store '{}': {}", store.display(), e))?;
        let orchestrator = Orchestrator::new(storage, verifier, &config.workspace_root);
        orchestrator
            .submit(client.as_ref().map(|c| c as &dyn ModelClient), problem)
            .await
            .map_err(|e| format!("build failed: {}", e))
    });

    match result {
        Ok(outcome) => {
            if quiet {
                return;
            }
            match output {
                OutputFormat::Text => {
                    println!("Build {} ready (run {})", outcome.build_id, outcome.run_id);
                    println!("Workspace: {}", outcome.workspace.display());
                    println!("Manifest:  {}", outcome.manifest_path.display());
                }
                OutputFormat::Json => print_json(&outcome, output, quiet),
            }
        }
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}
