use std::collections::BTreeSet;

use crate::model::catalog::Catalog;
use crate::model::pointer::{LESSON_LOW_BOUND, ProgressPointer};

/// Set of lessons the learner has solved.
///
/// Only grows; the single way to shrink it is [`CompletionRecord::clear`],
/// reserved for a confirmed progress reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionRecord {
    completed: BTreeSet<ProgressPointer>,
}

impl CompletionRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `lesson` as completed. Returns `false` if it already was.
    pub fn mark(&mut self, lesson: ProgressPointer) -> bool {
        self.completed.insert(lesson)
    }

    #[must_use]
    pub fn is_completed(&self, lesson: ProgressPointer) -> bool {
        self.completed.contains(&lesson)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ProgressPointer> + '_ {
        self.completed.iter().copied()
    }

    pub fn clear(&mut self) {
        self.completed.clear();
    }

    /// True iff every lesson of `group` is completed. Unknown groups are
    /// never finished.
    #[must_use]
    pub fn has_finished_group(&self, catalog: &Catalog, group: u32) -> bool {
        let count = catalog.lesson_count(group);
        count > 0
            && (LESSON_LOW_BOUND..=count)
                .all(|lesson| self.is_completed(ProgressPointer::new(group, lesson)))
    }

    /// True iff every group of the catalog is finished.
    #[must_use]
    pub fn has_finished(&self, catalog: &Catalog) -> bool {
        catalog.pointers().all(|lesson| self.is_completed(lesson))
    }

    /// Number of completed lessons that still exist in `catalog`.
    ///
    /// Entries for lessons a smaller catalog no longer has are kept in the
    /// record but not counted.
    #[must_use]
    pub fn completed_in(&self, catalog: &Catalog) -> usize {
        catalog
            .pointers()
            .filter(|lesson| self.is_completed(*lesson))
            .count()
    }
}

impl FromIterator<ProgressPointer> for CompletionRecord {
    fn from_iter<I: IntoIterator<Item = ProgressPointer>>(iter: I) -> Self {
        Self {
            completed: iter.into_iter().collect(),
        }
    }
}
