use std::sync::Arc;

use tutor_core::QueryEngine;
use tutor_core::model::MatchSet;
use tutor_core::verdict::{self, Evaluation};

use crate::error::ProgressError;
use crate::presentation::PresentationSink;
use crate::progress::ProgressStore;

/// Judges submissions against the current lesson and plays the immediate
/// part of the outcome on the presentation sink.
///
/// Delayed follow-ups (advancing, revealing the hint) are scheduled by the
/// caller; see [`crate::Tutor`].
#[derive(Clone)]
pub struct Verifier {
    sink: Arc<dyn PresentationSink>,
}

impl Verifier {
    #[must_use]
    pub fn new(sink: Arc<dyn PresentationSink>) -> Self {
        Self { sink }
    }

    /// Evaluate `candidate` against the current lesson's correct query.
    ///
    /// Touches neither the store nor the sink.
    pub fn evaluate<E: QueryEngine + ?Sized>(
        &self,
        store: &ProgressStore,
        engine: &E,
        tree: &E::Tree,
        candidate: &str,
    ) -> Evaluation {
        let correct = store
            .current_lesson()
            .map_or("", |lesson| lesson.correct_query());
        let evaluation = verdict::evaluate(engine, tree, candidate, correct);
        if correct.is_empty() || evaluation.solution.is_empty() {
            tracing::warn!(lesson = %store.pointer(), "correct query selects nothing");
        }
        tracing::debug!(
            lesson = %store.pointer(),
            candidate,
            matched = evaluation.candidate.len(),
            expected = evaluation.solution.len(),
            invalid = evaluation.invalid_candidate,
            verdict = ?evaluation.verdict,
            "submission evaluated"
        );
        evaluation
    }

    /// Mark the matches solved, clear the input and record the completion.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the completion cannot be persisted; the
    /// completion is recorded in memory regardless.
    pub async fn accept(
        &self,
        store: &mut ProgressStore,
        evaluation: &Evaluation,
    ) -> Result<(), ProgressError> {
        self.sink.on_accepted(&evaluation.candidate);
        self.sink.clear_input();
        store.complete_lesson();
        store.save().await
    }

    /// Mark the candidate matches as incorrect.
    pub fn reject(&self, evaluation: &Evaluation) {
        self.sink
            .on_rejected(&evaluation.candidate, &evaluation.solution);
    }

    /// Clear the incorrect marking and show the solution.
    pub fn reveal_hint(&self, solution: &MatchSet) {
        self.sink.on_hint(solution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingSink, SinkEvent, TableEngine, catalog_with, table};
    use storage::repository::InMemoryStore;
    use tutor_core::model::{NodeId, ProgressPointer};
    use tutor_core::time::fixed_clock;
    use tutor_core::verdict::Verdict;

    fn set(ids: &[u64]) -> MatchSet {
        ids.iter().copied().map(NodeId::new).collect()
    }

    fn store() -> ProgressStore {
        ProgressStore::new(
            catalog_with(&[2]),
            Arc::new(InMemoryStore::new()),
            fixed_clock(),
        )
    }

    #[test]
    fn evaluate_uses_current_lesson_and_has_no_side_effects() {
        let sink = Arc::new(RecordingSink::default());
        let verifier = Verifier::new(sink.clone());
        let store = store();
        let tree = table(&[("1.1", &[1, 2]), ("plate", &[2, 1])]);

        let eval = verifier.evaluate(&store, &TableEngine, &tree, "plate");
        assert_eq!(eval.verdict, Verdict::Accepted);
        assert!(sink.take().is_empty());
        assert!(store.completion().is_empty());
    }

    #[test]
    fn malformed_candidate_is_a_plain_rejection() {
        let verifier = Verifier::new(Arc::new(RecordingSink::default()));
        let tree = table(&[("1.1", &[1])]);
        let eval = verifier.evaluate(&store(), &TableEngine, &tree, "plate!!");
        assert_eq!(eval.verdict, Verdict::Rejected);
        assert!(eval.invalid_candidate);
        assert!(eval.candidate.is_empty());
    }

    #[tokio::test]
    async fn accept_marks_clears_and_completes() {
        let sink = Arc::new(RecordingSink::default());
        let verifier = Verifier::new(sink.clone());
        let mut store = store();
        let tree = table(&[("1.1", &[4])]);
        let eval = verifier.evaluate(&store, &TableEngine, &tree, "1.1");

        verifier.accept(&mut store, &eval).await.unwrap();
        assert_eq!(
            sink.take(),
            vec![SinkEvent::Accepted(set(&[4])), SinkEvent::ClearInput]
        );
        assert!(store.completion().is_completed(ProgressPointer::new(1, 1)));
        assert_eq!(store.pointer(), ProgressPointer::new(1, 1));
    }

    #[test]
    fn reject_then_hint_reports_both_sets() {
        let sink = Arc::new(RecordingSink::default());
        let verifier = Verifier::new(sink.clone());
        let tree = table(&[("1.1", &[4]), ("bento", &[7])]);
        let eval = verifier.evaluate(&store(), &TableEngine, &tree, "bento");

        verifier.reject(&eval);
        verifier.reveal_hint(&eval.solution);
        assert_eq!(
            sink.take(),
            vec![
                SinkEvent::Rejected(set(&[7]), set(&[4])),
                SinkEvent::Hint(set(&[4])),
            ]
        );
    }
}
