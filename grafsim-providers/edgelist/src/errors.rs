use std::{io, path::PathBuf};

use grafsim_core::DescriptorError;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EdgeListError {
    #[error("failed to open `{path}`: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: `{token}` is not a non-negative integer node id")]
    InvalidNode { line: usize, token: String },
    #[error("line {line}: `{token}` is not a numeric edge weight")]
    InvalidWeight { line: usize, token: String },
    #[error("edge list contains no edges")]
    Empty,
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}
