//! World document codec: canonical JSON export and lenient import.

mod export;
mod fields;
mod import;

pub use export::{export_world, to_json_string};
pub use import::{import_str, import_world, parse_enemy_template, parse_palette};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The document (or its first element) is not a JSON object
    NotAnObject,
    EmptyArray,
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::NotAnObject => write!(f, "World document must be a JSON object"),
            DocumentError::EmptyArray => write!(f, "World document array is empty"),
            DocumentError::Parse(e) => write!(f, "Failed to parse world document: {}", e),
            DocumentError::Serialize(e) => write!(f, "Failed to serialize world document: {}", e),
        }
    }
}

impl std::error::Error for DocumentError {}
