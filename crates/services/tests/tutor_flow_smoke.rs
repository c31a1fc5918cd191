use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use services::{AppServices, Clock, LessonView, Pacing, PresentationSink, SubmitOutcome};
use tutor_core::model::{CatalogDraft, LessonDraft, LessonGroupDraft, MatchSet, NodeId, ProgressPointer};
use tutor_core::time::fixed_now;
use tutor_core::{InvalidQuery, QueryEngine};

/// Markup-free engine: each query maps to a fixed list of node ids.
struct FixedEngine;

impl QueryEngine for FixedEngine {
    type Tree = HashMap<&'static str, Vec<u64>>;

    fn query(&self, tree: &Self::Tree, query: &str) -> Result<MatchSet, InvalidQuery> {
        if query.trim().is_empty() || query.contains("[[") {
            return Err(InvalidQuery::new(query, "malformed"));
        }
        Ok(tree
            .get(query)
            .into_iter()
            .flatten()
            .copied()
            .map(NodeId::new)
            .collect())
    }
}

#[derive(Default)]
struct LessonLog {
    shown: Mutex<Vec<ProgressPointer>>,
}

impl PresentationSink for LessonLog {
    fn on_lesson_changed(&self, view: &LessonView<'_>) {
        self.shown.lock().unwrap().push(view.pointer);
    }
    fn on_accepted(&self, _matches: &MatchSet) {}
    fn on_rejected(&self, _candidate: &MatchSet, _solution: &MatchSet) {}
    fn on_hint(&self, _solution: &MatchSet) {}
    fn clear_input(&self) {}
}

fn lesson(name: &str, query: &str) -> LessonDraft {
    LessonDraft {
        name: name.into(),
        correct_query: query.into(),
        reference_markup: "<plate></plate>".into(),
        ..LessonDraft::default()
    }
}

fn course() -> CatalogDraft {
    CatalogDraft {
        groups: vec![
            LessonGroupDraft {
                name: "Basics".into(),
                intro: None,
                lessons: vec![
                    lesson("Type", "plate"),
                    lesson("Id", "#fancy"),
                    lesson("Class", ".small"),
                ],
            },
            LessonGroupDraft {
                name: "Combinators".into(),
                intro: None,
                lessons: vec![lesson("Descendant", "plate apple")],
            },
        ],
    }
}

fn tree() -> HashMap<&'static str, Vec<u64>> {
    HashMap::from([
        ("plate", vec![1, 2]),
        ("#fancy", vec![2]),
        ("plate#fancy", vec![2]),
        (".small", vec![5, 6]),
        ("apple.small", vec![6, 5]),
        ("plate apple", vec![7]),
    ])
}

#[tokio::test]
async fn progress_survives_restart_on_sqlite() {
    let db = "sqlite:file:memdb_tutor_flow?mode=memory&cache=shared";
    let services = AppServices::new_sqlite(db, course(), Clock::fixed(fixed_now()))
        .await
        .expect("open services");

    let sink = Arc::new(LessonLog::default());
    let mut tutor = services
        .start_tutor(sink.clone(), Pacing::immediate())
        .await
        .expect("start tutor");
    assert_eq!(tutor.pointer(), ProgressPointer::new(1, 1));

    for (answer, expected) in [
        ("plate", ProgressPointer::new(1, 2)),
        ("plate#fancy", ProgressPointer::new(1, 3)),
        ("apple.small", ProgressPointer::new(2, 1)),
    ] {
        let outcome = tutor.submit(&FixedEngine, &tree(), answer).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Accepted(_)), "{answer}");
        assert_eq!(tutor.settle().await.unwrap(), Some(expected));
    }

    let rejected = tutor.submit(&FixedEngine, &tree(), "plate [[").await.unwrap();
    assert!(matches!(rejected, SubmitOutcome::Rejected(_)));
    tutor.settle().await.unwrap();
    assert_eq!(tutor.pointer(), ProgressPointer::new(2, 1));
    assert!(tutor.store().has_finished_group(1));
    assert!(!tutor.store().has_finished());
    drop(tutor);

    let reopened = AppServices::new_sqlite(db, course(), Clock::fixed(fixed_now()))
        .await
        .expect("reopen services");
    let store = reopened.progress_store().await;
    assert_eq!(store.pointer(), ProgressPointer::new(2, 1));
    assert!(store.has_finished_group(1));
    assert_eq!(store.completion().len(), 3);

    assert_eq!(
        *sink.shown.lock().unwrap(),
        vec![
            ProgressPointer::new(1, 1),
            ProgressPointer::new(1, 2),
            ProgressPointer::new(1, 3),
            ProgressPointer::new(2, 1),
        ]
    );
}

#[tokio::test]
async fn finishing_the_course_wraps_to_the_first_lesson() {
    let services = AppServices::in_memory(course(), Clock::fixed(fixed_now())).unwrap();
    let mut tutor = services
        .start_tutor(Arc::new(LessonLog::default()), Pacing::immediate())
        .await
        .unwrap();

    tutor.change_to(2, 1).await.unwrap();
    tutor.submit(&FixedEngine, &tree(), "plate apple").await.unwrap();
    assert_eq!(tutor.settle().await.unwrap(), Some(ProgressPointer::new(1, 1)));
    assert!(tutor.store().has_finished_group(2));
}
