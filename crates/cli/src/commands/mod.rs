//! Subcommand implementations. Each `cmd_*` reports its own errors through
//! [`report_error`] and exits the process with status 1 on failure.

pub(crate) mod codegen;
pub(crate) mod generate;
pub(crate) mod runs;
pub(crate) mod scaffold;
pub(crate) mod validate;
pub(crate) mod verify;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use blueprint_core::Specification;
use blueprint_storage::{BlueprintStorage, JsonFileStorage, StorageError};

use crate::config::Config;
use crate::{report_error, OutputFormat};

/// Store file kept under the workspace root when `--store` is not given.
pub(crate) const STORE_FILE: &str = "blueprint-store.json";

pub(crate) fn store_path(config: &Config, store: Option<&Path>) -> PathBuf {
    store
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.workspace_root.join(STORE_FILE))
}

pub(crate) async fn open_store(path: &Path) -> Result<Arc<dyn BlueprintStorage>, StorageError> {
    let storage = JsonFileStorage::open(path).await?;
    Ok(Arc::new(storage))
}

/// Read and parse a specification file, or exit.
pub(crate) fn read_spec(path: &Path, output: OutputFormat, quiet: bool) -> Specification {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    match Specification::from_json(&text) {
        Ok(spec) => spec,
        Err(e) => {
            let msg = format!("invalid specification '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn runtime(output: OutputFormat, quiet: bool) -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report_error(&format!("failed to create tokio runtime: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

/// Print a serializable value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T, output: OutputFormat, quiet: bool) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            report_error(&format!("failed to serialize output: {}", e), output, quiet);
            process::exit(1);
        }
    }
}
