//! Edge-list provider resolving network parameters from whitespace-separated
//! text files.

mod errors;
mod parse;
mod source;

pub use errors::EdgeListError;
pub use parse::{DEFAULT_COMMENT, EdgeListSummary, summarise};
pub use source::EdgeListSource;

#[cfg(test)]
mod tests;
