use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown dataset type '{name}' (expected legal_entities or relationships)")]
    UnknownDatasetType { name: String },
    #[error("unknown {field} value '{value}'")]
    UnknownStatus { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
