//! Merge request and input validation

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::MergeError;

/// An ordered list of input files and the output path to merge them into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    inputs: Vec<PathBuf>,
    output: PathBuf,
}

impl MergeRequest {
    /// Create a new merge request
    ///
    /// Inputs are concatenated in the order given.
    pub fn new<I, P>(inputs: I, output: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: output.into(),
        }
    }

    /// The input files, in concatenation order
    #[must_use]
    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    /// The output path
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Check the request shape without touching the filesystem
    pub(crate) fn validate_shape(&self) -> Result<(), MergeError> {
        if self.inputs.is_empty() {
            return Err(MergeError::InvalidArgument(
                "inputs must contain at least one file".to_string(),
            ));
        }
        if self.output.as_os_str().is_empty() {
            return Err(MergeError::InvalidArgument(
                "output path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Verify that every input exists and is a readable file
    pub(crate) async fn validate_inputs(&self) -> Result<(), MergeError> {
        for input in &self.inputs {
            let readable = match tokio::fs::metadata(input).await {
                Ok(meta) if meta.is_file() => tokio::fs::File::open(input).await.is_ok(),
                _ => false,
            };
            if !readable {
                return Err(MergeError::FileNotFound(input.clone()));
            }
        }
        debug!(count = self.inputs.len(), "Merge inputs validated");
        Ok(())
    }
}
