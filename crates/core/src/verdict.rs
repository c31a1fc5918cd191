//! Answer acceptance, independent of any presentation.

use crate::engine::QueryEngine;
use crate::model::MatchSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Compare a candidate's matches against the solution's.
///
/// Accepted iff the candidate selects at least one node and selects exactly
/// the solution's nodes.
#[must_use]
pub fn judge(candidate: &MatchSet, solution: &MatchSet) -> Verdict {
    let win = !candidate.is_empty()
        && candidate.len() == solution.len()
        && candidate.iter().all(|node| solution.contains(node));
    if win {
        Verdict::Accepted
    } else {
        Verdict::Rejected
    }
}

/// Both match sets and the resulting verdict for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub candidate: MatchSet,
    pub solution: MatchSet,
    pub verdict: Verdict,
    /// Set when the candidate query was rejected by the engine.
    pub invalid_candidate: bool,
}

/// Evaluate `candidate_query` and `correct_query` against `tree` and judge.
///
/// An invalid candidate query evaluates to the empty set. The correct query is
/// expected to be valid; if the engine rejects it anyway the solution is the
/// empty set, which no submission can win.
pub fn evaluate<E: QueryEngine + ?Sized>(
    engine: &E,
    tree: &E::Tree,
    candidate_query: &str,
    correct_query: &str,
) -> Evaluation {
    let (candidate, invalid_candidate) = match engine.query(tree, candidate_query) {
        Ok(matches) => (matches, false),
        Err(_) => (MatchSet::empty(), true),
    };
    let solution = engine.query(tree, correct_query).unwrap_or_default();
    let verdict = judge(&candidate, &solution);

    Evaluation {
        candidate,
        solution,
        verdict,
        invalid_candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::InvalidQuery;
    use crate::model::NodeId;
    use std::collections::HashMap;

    fn set(ids: &[u64]) -> MatchSet {
        ids.iter().copied().map(NodeId::new).collect()
    }

    /// Engine over a fixed query table; anything containing `!` is invalid.
    struct TableEngine;

    impl QueryEngine for TableEngine {
        type Tree = HashMap<&'static str, Vec<u64>>;

        fn query(&self, tree: &Self::Tree, query: &str) -> Result<MatchSet, InvalidQuery> {
            if query.contains('!') {
                return Err(InvalidQuery::new(query, "unexpected `!`"));
            }
            Ok(tree
                .get(query)
                .map(|ids| ids.iter().copied().map(NodeId::new).collect())
                .unwrap_or_default())
        }
    }

    fn tree() -> HashMap<&'static str, Vec<u64>> {
        HashMap::from([
            ("plate", vec![1, 2, 4]),
            ("plate, plate", vec![4, 2, 1, 2]),
            ("bento", vec![3]),
            ("#fancy", vec![2]),
        ])
    }

    #[test]
    fn equal_sets_are_accepted() {
        assert_eq!(judge(&set(&[1, 2]), &set(&[1, 2])), Verdict::Accepted);
    }

    #[test]
    fn empty_candidate_is_always_rejected() {
        assert_eq!(judge(&set(&[]), &set(&[1])), Verdict::Rejected);
        assert_eq!(judge(&set(&[]), &set(&[])), Verdict::Rejected);
    }

    #[test]
    fn subsets_and_supersets_are_rejected() {
        assert_eq!(judge(&set(&[1]), &set(&[1, 2])), Verdict::Rejected);
        assert_eq!(judge(&set(&[1, 2, 3]), &set(&[1, 2])), Verdict::Rejected);
        assert_eq!(judge(&set(&[1, 3]), &set(&[1, 2])), Verdict::Rejected);
    }

    #[test]
    fn candidate_order_never_changes_the_verdict() {
        let solution = set(&[5, 9, 11, 20]);
        let orders: [&[u64]; 4] = [
            &[5, 9, 11, 20],
            &[20, 11, 9, 5],
            &[9, 20, 5, 11],
            &[11, 5, 20, 9],
        ];
        for order in orders {
            assert_eq!(judge(&set(order), &solution), Verdict::Accepted);
        }
    }

    #[test]
    fn different_query_with_same_matches_wins() {
        let eval = evaluate(&TableEngine, &tree(), "plate, plate", "plate");
        assert!(eval.verdict.is_accepted());
        assert!(!eval.invalid_candidate);
    }

    #[test]
    fn invalid_candidate_becomes_empty_rejection() {
        let eval = evaluate(&TableEngine, &tree(), "plate!", "plate");
        assert_eq!(eval.verdict, Verdict::Rejected);
        assert!(eval.invalid_candidate);
        assert!(eval.candidate.is_empty());
        assert_eq!(eval.solution, set(&[1, 2, 4]));
    }

    #[test]
    fn wrong_selection_is_rejected_with_solution() {
        let eval = evaluate(&TableEngine, &tree(), "bento", "#fancy");
        assert_eq!(eval.verdict, Verdict::Rejected);
        assert_eq!(eval.candidate, set(&[3]));
        assert_eq!(eval.solution, set(&[2]));
    }
}
