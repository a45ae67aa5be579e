use std::path::Path;
use std::process;

use super::runtime;
use crate::config::Config;
use crate::verify::verifier_for;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_verify(dir: &Path, config: &Config, output: OutputFormat, quiet: bool) {
    if !dir.is_dir() {
        report_error(
            &format!("'{}' is not a directory", dir.display()),
            output,
            quiet,
        );
        process::exit(1);
    }
    let verifier = match verifier_for(config) {
        Ok(v) => v,
        Err(e) => {
            report_error(&format!("invalid verification command: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let rt = runtime(output, quiet);
    match rt.block_on(verifier.verify(dir)) {
        Ok(()) => {
            if !quiet {
                match output {
                    OutputFormat::Text => println!("Verification passed: {}", dir.display()),
                    OutputFormat::Json => {
                        println!("{}", serde_json::json!({ "verified": true, "workspace": dir }));
                    }
                }
            }
        }
        Err(e) => {
            report_error(&format!("verification failed: {}", e), output, quiet);
            process::exit(1);
        }
    }
}
