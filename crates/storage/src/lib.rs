pub mod conformance;
mod error;
mod file;
mod memory;
mod record;
mod state;
mod traits;

pub use error::StorageError;
pub use file::JsonFileStorage;
pub use memory::InMemoryStorage;
pub use record::{
    new_id, now_rfc3339, ArtifactKind, ArtifactRecord, BuildRecord, NewBuild, RunRecord,
    RunStatus, StepRecord, StepStatus,
};
pub use traits::BlueprintStorage;
