//! [`NetworkSource`] implementation over an edge-list file.
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use grafsim_core::{NetworkDescriptor, NetworkSource};

use crate::{
    errors::EdgeListError,
    parse::{DEFAULT_COMMENT, EdgeListSummary, summarise},
};

/// Network backed by an edge-list file on disk. The file is read on every
/// call to [`NetworkSource::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeListSource {
    name: String,
    path: PathBuf,
    comment: String,
}

impl EdgeListSource {
    /// Creates a source using the default `%` comment marker.
    ///
    /// # Examples
    /// ```
    /// use grafsim_core::NetworkSource;
    /// use grafsim_providers_edgelist::EdgeListSource;
    ///
    /// let source = EdgeListSource::new("youtube", "redes/com-youtube/out.com-youtube");
    /// assert_eq!(source.name(), "youtube");
    /// assert_eq!(source.comment(), "%");
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            comment: DEFAULT_COMMENT.to_owned(),
        }
    }

    /// Replaces the comment marker. An empty marker disables comments.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// File backing the source.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Comment marker.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Reads the file and returns its degree statistics.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Open`] when the file cannot be opened, plus
    /// any error reported by [`summarise`].
    pub fn summary(&self) -> Result<EdgeListSummary, EdgeListError> {
        let file = File::open(&self.path).map_err(|source| EdgeListError::Open {
            path: self.path.clone(),
            source,
        })?;
        summarise(BufReader::new(file), &self.comment)
    }
}

impl NetworkSource for EdgeListSource {
    type Error = EdgeListError;

    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self) -> Result<NetworkDescriptor, Self::Error> {
        let summary = self.summary()?;
        Ok(NetworkDescriptor::new(
            self.name.as_str(),
            summary.nodes,
            summary.mean_degree(),
        )?)
    }
}
