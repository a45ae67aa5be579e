//! File generators for blueprint workspaces.
//!
//! Three independent producers share the [`write`] plan/write split:
//!
//! - [`scaffold`]: the fixed description files (schemas, ui map, meta)
//! - [`template`]: a themed, runnable template application and its docs,
//!   produced purely by string interpolation
//! - [`engine`]: the optional model-backed pass over the [`catalog`] that
//!   upgrades template files in place

pub mod catalog;
pub mod engine;
pub mod error;
pub mod scaffold;
pub mod template;
pub mod write;

pub use catalog::{codegen_targets, CodegenTarget, TargetKind};
pub use engine::{
    build_prompt, output_schema, parse_generated, CodegenEngine, CompletionRequest, GeneratedFile,
    ModelClient, ModelError, TargetOutcome, MAX_ATTEMPTS, SYSTEM_PROMPT,
};
pub use error::CodegenError;
pub use scaffold::{generate_scaffold, plan_scaffold};
pub use template::{
    entity_template_paths, generate_template_app, plan_template_app, template_app_paths,
    TEMPLATE_FILES, TEMPLATE_ROOT,
};
pub use write::{write_plan, PlannedFile};
