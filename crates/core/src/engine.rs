use thiserror::Error;

use crate::model::MatchSet;

/// The query was rejected by the engine before evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid query `{query}`: {reason}")]
pub struct InvalidQuery {
    pub query: String,
    pub reason: String,
}

impl InvalidQuery {
    #[must_use]
    pub fn new(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            reason: reason.into(),
        }
    }
}

/// Tree query capability provided by the rendering side.
///
/// Evaluation must be read-only with respect to the tree. Node identities in
/// the returned set must be stable for the lifetime of the tree.
pub trait QueryEngine {
    type Tree: ?Sized;

    /// Evaluate `query` against `tree`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if the query is not syntactically valid.
    fn query(&self, tree: &Self::Tree, query: &str) -> Result<MatchSet, InvalidQuery>;
}
