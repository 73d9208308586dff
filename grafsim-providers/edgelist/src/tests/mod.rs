pub(crate) use super::{DEFAULT_COMMENT, EdgeListError, EdgeListSource, summarise};

mod parse;
