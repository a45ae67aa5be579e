use std::path::Path;
use std::process;

use blueprint_storage::{ArtifactRecord, BlueprintStorage, BuildRecord, RunRecord, StorageError};
use serde::Serialize;

use super::{open_store, print_json, runtime, store_path};
use crate::config::Config;
use crate::{report_error, OutputFormat};

#[derive(Serialize)]
struct RunDetail {
    #[serde(flatten)]
    run: RunRecord,
    artifacts: Vec<ArtifactRecord>,
}

#[derive(Serialize)]
struct BuildDetail {
    build: BuildRecord,
    runs: Vec<RunDetail>,
}

async fn build_detail(
    storage: &dyn BlueprintStorage,
    build_id: &str,
) -> Result<BuildDetail, StorageError> {
    let build = storage.get_build(build_id).await?;
    let mut runs = Vec::new();
    for run in storage.list_runs(build_id).await? {
        let artifacts = storage.list_artifacts(&run.id).await?;
        runs.push(RunDetail { run, artifacts });
    }
    Ok(BuildDetail { build, runs })
}

/// List stored builds, or one build's runs with step status and artifacts.
pub(crate) fn cmd_runs(
    build_id: Option<&str>,
    store: Option<&Path>,
    config: &Config,
    output: OutputFormat,
    quiet: bool,
) {
    let store = store_path(config, store);
    let rt = runtime(output, quiet);
    let storage = match rt.block_on(open_store(&store)) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error opening store '{}': {}", store.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    match build_id {
        None => match rt.block_on(storage.list_builds()) {
            Ok(builds) => print_builds(&builds, output, quiet),
            Err(e) => {
                report_error(&format!("error listing builds: {}", e), output, quiet);
                process::exit(1);
            }
        },
        Some(id) => match rt.block_on(build_detail(storage.as_ref(), id)) {
            Ok(detail) => print_detail(&detail, output, quiet),
            Err(e) => {
                report_error(&e.to_string(), output, quiet);
                process::exit(1);
            }
        },
    }
}

fn print_builds(builds: &[BuildRecord], output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&builds, output, quiet),
        OutputFormat::Text => {
            if builds.is_empty() {
                println!("No builds recorded.");
                return;
            }
            for build in builds {
                println!("{}  {}  {}", build.id, build.created_at, build.summary);
            }
        }
    }
}

fn print_detail(detail: &BuildDetail, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(detail, output, quiet),
        OutputFormat::Text => {
            let build = &detail.build;
            println!("{} ({})", build.summary, build.id);
            println!("Problem: {}", build.problem);
            if detail.runs.is_empty() {
                println!("No runs.");
            }
            for RunDetail { run, artifacts } in &detail.runs {
                println!();
                println!("Run {}  {}  {}", run.id, run.status, run.updated_at);
                for step in &run.steps {
                    match &step.detail {
                        Some(note) => println!("  [{}] {}: {}", step.status, step.name, note),
                        None => println!("  [{}] {}", step.status, step.name),
                    }
                }
                println!("  {} artifact(s)", artifacts.len());
            }
        }
    }
}
