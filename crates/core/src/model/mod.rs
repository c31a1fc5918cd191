mod catalog;
mod completion;
mod ids;
mod matches;
mod pointer;

pub use catalog::{Catalog, CatalogDraft, CatalogError, Lesson, LessonDraft, LessonGroup, LessonGroupDraft};
pub use completion::CompletionRecord;
pub use ids::NodeId;
pub use matches::MatchSet;
pub use pointer::{FIRST_GROUP, LESSON_LOW_BOUND, ProgressPointer};

#[cfg(test)]
pub(crate) use catalog::tests::catalog_with;
