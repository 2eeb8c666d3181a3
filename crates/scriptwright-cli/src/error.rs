//! Scriptwright CLI: error types.

use std::path::PathBuf;

use scriptwright_core::error::{EditorError, StoreError};
use scriptwright_remote::ConfigError;
use thiserror::Error;

/// Failures that end a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// An environment variable is set to an unusable value.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The store client could not be built.
    #[error("store client error: {0}")]
    Client(#[from] StoreError),

    /// An editor operation failed.
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// A chapter file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A chapter file is not valid chapter YAML.
    #[error("{} is not a chapter file: {source}", path.display())]
    ChapterFile {
        /// The file.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A record could not be rendered as YAML.
    #[error("cannot render YAML: {0}")]
    Render(#[source] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use scriptwright_core::error::Resource;

    use super::*;

    #[test]
    fn test_editor_error_is_shown_verbatim() {
        let err = CliError::from(EditorError::NoActiveScript);

        assert_eq!(err.to_string(), EditorError::NoActiveScript.to_string());
    }

    #[test]
    fn test_io_error_names_the_file() {
        let err = CliError::Io {
            path: PathBuf::from("chapters/intro.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };

        assert_eq!(err.to_string(), "cannot read chapters/intro.yaml: no such file");
    }

    #[test]
    fn test_fetch_failure_keeps_resource() {
        let err = CliError::from(EditorError::fetch(
            Resource::ScriptList,
            StoreError::Transport("connection refused".to_owned()),
        ));

        assert!(err.to_string().contains("script list"));
    }
}
