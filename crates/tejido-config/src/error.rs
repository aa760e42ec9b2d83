//! Error types for description loading and graph building.

use std::path::PathBuf;
use tejido_core::ProcError;
use thiserror::Error;

/// Errors that can occur loading a description or building its graph.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Failed to read a description file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Unknown proc class
    #[error("unknown proc class: {0}")]
    UnknownClass(String),

    /// A pipe or publish endpoint is not of the form `proc/port`
    #[error("bad endpoint '{0}': expected proc/port")]
    BadEndpoint(String),

    /// A rate ratio is not of the form `up/down`
    #[error("bad rate '{0}': expected up/down with nonzero integers")]
    BadRate(String),

    /// An unknown tap trigger mode
    #[error("unknown tap mode '{0}': expected no-trash or most-recent")]
    UnknownMode(String),

    /// An unknown packing strategy
    #[error("unknown packing strategy '{0}': expected first-fit or wasteful")]
    UnknownPacking(String),

    /// Graph construction failed
    #[error("graph construction failed at {context}: {source}")]
    Graph {
        /// What was being built when the error occurred.
        context: String,
        /// The engine error.
        #[source]
        source: ProcError,
    },
}

impl BuildError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a graph construction error with context.
    pub fn graph(context: impl Into<String>, source: ProcError) -> Self {
        BuildError::Graph {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display_and_source() {
        let err = BuildError::read_file("/a/graph.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/graph.toml"), "got: {msg}");
        assert!(err.source().is_some(), "ReadFile must expose I/O source");
    }

    #[test]
    fn unknown_class_display() {
        let err = BuildError::UnknownClass("super_filter".to_string());
        assert_eq!(err.to_string(), "unknown proc class: super_filter");
        assert!(err.source().is_none());
    }

    #[test]
    fn graph_error_carries_engine_source() {
        let err = BuildError::graph("proc 'g1'", ProcError::NameInUse);
        assert_eq!(
            err.to_string(),
            "graph construction failed at proc 'g1': name already in use"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn bad_endpoint_display() {
        let err = BuildError::BadEndpoint("g1".to_string());
        assert_eq!(err.to_string(), "bad endpoint 'g1': expected proc/port");
    }
}
