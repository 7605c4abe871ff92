// Errors

use crate::{graph::GraphError, search::SearchError};

/// Everything that can go wrong between reading an input file and
/// handing a valid network to the search.
///
/// None of these are recoverable for the current run: a network that
/// failed to build is never partially used.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// A line did not parse into a name / rate / neighbors triple.
    #[error("malformed input on line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },

    /// A name that does not correspond to any built valve.
    #[error("unknown valve '{0}'")]
    UnknownValve(String),

    #[error("valve '{0}' is defined more than once")]
    DuplicateValve(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("could not read '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
