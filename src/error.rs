use thiserror::Error;

/// Errors that can occur while loading a workflow document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Could not read workflow document '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse workflow document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Conversion(#[from] WorkflowConversionError),
}

/// Errors that can occur when converting a custom format into a keikaku `Workflow`.
#[derive(Error, Debug, Clone)]
pub enum WorkflowConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

/// Errors raised by a `StateStore` while persisting revision state.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Could not access state file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Deserialization failed: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("State store lock was poisoned")]
    Poisoned,
}

/// Errors returned when a session command cannot be applied.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Node or connector node '{0}' not found")]
    UnknownEndpoint(String),

    #[error("Connection '{0}' not found")]
    UnknownConnection(String),

    #[error("Id '{0}' is already in use")]
    DuplicateId(String),

    #[error("Connector '{0}' is not registered")]
    UnknownConnector(String),

    #[error(transparent)]
    State(#[from] StateError),
}
