use std::path::{Path, PathBuf};
use std::process;

use blueprint_codegen::{generate_scaffold, generate_template_app};

use super::{print_json, read_spec};
use crate::{report_error, OutputFormat};

/// Static scaffold plus template app, no model involved.
pub(crate) fn cmd_scaffold(spec_path: &Path, out: &Path, output: OutputFormat, quiet: bool) {
    let spec = read_spec(spec_path, output, quiet);

    let written: Result<Vec<PathBuf>, _> = generate_scaffold(out, &spec).and_then(|mut files| {
        files.extend(generate_template_app(out, &spec)?);
        Ok(files)
    });

    match written {
        Ok(files) => {
            if quiet {
                return;
            }
            match output {
                OutputFormat::Text => {
                    println!("Wrote {} files to {}", files.len(), out.display());
                }
                OutputFormat::Json => {
                    print_json(
                        &serde_json::json!({
                            "out_dir": out,
                            "files": files,
                        }),
                        output,
                        quiet,
                    );
                }
            }
        }
        Err(e) => {
            report_error(&format!("scaffold error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}
