/// Errors raised while reading a specification.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// The specification text is not valid JSON or does not match the model.
    #[error("invalid specification: {0}")]
    Parse(String),
}
