//! blueprint-core: the specification model and the pure helpers every
//! generator shares.
//!
//! - [`Specification`] and its parts: the input to all generation
//! - [`slugify`] / [`title_case`] / [`unique_slugs`]: path and symbol naming
//! - [`build_schemas`]: entity → JSON-Schema-like projection
//! - [`validate_content`]: the shallow syntax gate for generated files
//! - [`parse_lenient`]: defensive parsing of model output

pub mod error;
pub mod naming;
pub mod response;
pub mod schema;
pub mod spec;
pub mod validate;

pub use error::SpecError;
pub use naming::{slugify, title_case, unique_slugs};
pub use response::{parse_lenient, strip_code_fences, truncate};
pub use schema::{build_schemas, entity_schema, json_type, EntitySchema, ObjectSchema};
pub use spec::{
    default_pages, Entity, Field, FieldType, Integration, Page, Specification, Workflow,
};
pub use validate::{validate_content, ValidationError};
