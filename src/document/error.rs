use std::path::PathBuf;

use thiserror::Error;

/// Error raised while reading or loading a descriptor document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("document is {size} bytes, limit is {limit}")]
    InputTooLarge { size: usize, limit: usize },

    #[error("document declares {count} types, limit is {limit}")]
    TooManyTypes { count: usize, limit: usize },

    #[error("type '{key}': identifier of {length} bytes exceeds limit of {limit}")]
    IdentifierTooLong {
        key: String,
        length: usize,
        limit: usize,
    },

    #[error("type '{key}' refers to undeclared type '{reference}'")]
    UnknownReference { key: String, reference: String },

    #[error("render root '{key}' is not declared")]
    UnknownRoot { key: String },

    #[error("type '{key}' contains itself without passing through a named type")]
    AnonymousCycle { key: String },

    #[error("type '{key}' nests deeper than {limit} levels")]
    NestingTooDeep { key: String, limit: usize },

    #[error("type '{key}' has an empty name")]
    EmptyName { key: String },

    #[error("generic type '{key}' has no type arguments")]
    GenericWithoutArgs { key: String },

    #[error("type '{key}' is variadic but has no parameters")]
    VariadicWithoutParams { key: String },

    #[error("type '{key}' redefines the underlying type of an already defined named type")]
    ConflictingDefinition { key: String },
}

impl DocumentError {
    pub(super) fn unknown_reference(key: &str, reference: &str) -> Self {
        DocumentError::UnknownReference {
            key: key.to_string(),
            reference: reference.to_string(),
        }
    }
}
