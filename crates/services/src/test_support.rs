//! Fixtures shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use storage::repository::{KeyValueStore, StorageError};
use tutor_core::model::{
    Catalog, CatalogDraft, LessonDraft, LessonGroupDraft, MatchSet, NodeId, ProgressPointer,
};
use tutor_core::{InvalidQuery, QueryEngine};

use crate::presentation::{LessonView, PresentationSink};

/// Catalog with `shape[g]` lessons in group `g + 1`.
///
/// Lesson `g.l` has the correct query `"g.l"`.
pub(crate) fn catalog_with(shape: &[usize]) -> Arc<Catalog> {
    let draft = CatalogDraft {
        groups: shape
            .iter()
            .enumerate()
            .map(|(g, &count)| LessonGroupDraft {
                name: format!("Group {}", g + 1),
                intro: None,
                lessons: (1..=count)
                    .map(|l| LessonDraft {
                        name: format!("Lesson {}.{l}", g + 1),
                        correct_query: format!("{}.{l}", g + 1),
                        reference_markup: "<plate/>".into(),
                        ..LessonDraft::default()
                    })
                    .collect(),
            })
            .collect(),
    };
    Arc::new(draft.validate().unwrap())
}

/// Query engine over a fixed table. Queries containing `!` are invalid,
/// unknown queries match nothing.
pub(crate) struct TableEngine;

pub(crate) type Table = HashMap<String, Vec<u64>>;

impl QueryEngine for TableEngine {
    type Tree = Table;

    fn query(&self, tree: &Table, query: &str) -> Result<MatchSet, InvalidQuery> {
        if query.contains('!') {
            return Err(InvalidQuery::new(query, "unexpected `!`"));
        }
        Ok(tree
            .get(query)
            .map(|ids| ids.iter().copied().map(NodeId::new).collect())
            .unwrap_or_default())
    }
}

pub(crate) fn table(entries: &[(&str, &[u64])]) -> Table {
    entries
        .iter()
        .map(|(query, ids)| ((*query).to_string(), ids.to_vec()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SinkEvent {
    LessonChanged(ProgressPointer),
    Accepted(MatchSet),
    Rejected(MatchSet, MatchSet),
    Hint(MatchSet),
    ClearInput,
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub(crate) fn take(&self) -> Vec<SinkEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl PresentationSink for RecordingSink {
    fn on_lesson_changed(&self, view: &LessonView<'_>) {
        self.push(SinkEvent::LessonChanged(view.pointer));
    }

    fn on_accepted(&self, matches: &MatchSet) {
        self.push(SinkEvent::Accepted(matches.clone()));
    }

    fn on_rejected(&self, candidate: &MatchSet, solution: &MatchSet) {
        self.push(SinkEvent::Rejected(candidate.clone(), solution.clone()));
    }

    fn on_hint(&self, solution: &MatchSet) {
        self.push(SinkEvent::Hint(solution.clone()));
    }

    fn clear_input(&self) {
        self.push(SinkEvent::ClearInput);
    }
}

/// Store whose every operation fails.
pub(crate) struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}
