use std::path::Path;
use std::process;

use blueprint_core::validate_content;

use crate::{report_error, OutputFormat};

/// Run the content validator over one file, picking the check by extension.
pub(crate) fn cmd_validate(file: &Path, output: OutputFormat, quiet: bool) {
    let content = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let ext = file.extension().and_then(|e| e.to_str()).unwrap_or("");

    match validate_content(&content, ext) {
        Ok(()) => {
            if !quiet {
                match output {
                    OutputFormat::Text => println!("Valid: {}", file.display()),
                    OutputFormat::Json => {
                        println!(
                            "{}",
                            serde_json::json!({ "valid": true, "file": file })
                        );
                    }
                }
            }
        }
        Err(e) => {
            let msg = format!("invalid '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}
