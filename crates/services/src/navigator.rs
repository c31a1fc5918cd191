use std::sync::Arc;

use tutor_core::model::ProgressPointer;
use tutor_core::navigation;

use crate::error::ProgressError;
use crate::presentation::PresentationSink;
use crate::progress::ProgressStore;

/// Moves the learner's pointer and tells the presentation side about it.
///
/// Every request is resolved into an existing lesson first, so no request
/// fails for being out of range. Each committed pointer is persisted and
/// announced, even when it equals the previous one.
#[derive(Clone)]
pub struct Navigator {
    sink: Arc<dyn PresentationSink>,
}

impl Navigator {
    #[must_use]
    pub fn new(sink: Arc<dyn PresentationSink>) -> Self {
        Self { sink }
    }

    /// Move to `(group, lesson)`, overflowing into neighbouring groups and
    /// wrapping from the end of the course to its start.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the new pointer cannot be persisted. The
    /// pointer is committed and announced regardless.
    pub async fn change_to(
        &self,
        store: &mut ProgressStore,
        group: i64,
        lesson: i64,
    ) -> Result<ProgressPointer, ProgressError> {
        let pointer = navigation::resolve(store.catalog(), group, lesson);
        self.commit(store, pointer).await
    }

    /// # Errors
    ///
    /// See [`Navigator::change_to`].
    pub async fn next(&self, store: &mut ProgressStore) -> Result<ProgressPointer, ProgressError> {
        let pointer = navigation::next(store.catalog(), store.pointer());
        self.commit(store, pointer).await
    }

    /// # Errors
    ///
    /// See [`Navigator::change_to`].
    pub async fn previous(
        &self,
        store: &mut ProgressStore,
    ) -> Result<ProgressPointer, ProgressError> {
        let pointer = navigation::previous(store.catalog(), store.pointer());
        self.commit(store, pointer).await
    }

    /// Move to the `ordinal`-th lesson of the course, clamped into range.
    ///
    /// # Errors
    ///
    /// See [`Navigator::change_to`].
    pub async fn jump_to_ordinal(
        &self,
        store: &mut ProgressStore,
        ordinal: i64,
    ) -> Result<ProgressPointer, ProgressError> {
        let pointer = navigation::at_ordinal(store.catalog(), ordinal);
        self.commit(store, pointer).await
    }

    /// Re-commit and re-announce the current lesson.
    ///
    /// # Errors
    ///
    /// See [`Navigator::change_to`].
    pub async fn reload(&self, store: &mut ProgressStore) -> Result<ProgressPointer, ProgressError> {
        let current = store.pointer();
        self.change_to(store, i64::from(current.group()), i64::from(current.lesson()))
            .await
    }

    async fn commit(
        &self,
        store: &mut ProgressStore,
        pointer: ProgressPointer,
    ) -> Result<ProgressPointer, ProgressError> {
        let from = store.pointer();
        store.set_pointer(pointer);
        tracing::debug!(%from, to = %pointer, "lesson changed");

        let saved = store.save().await;
        match store.view() {
            Some(view) => self.sink.on_lesson_changed(&view),
            None => tracing::warn!(%pointer, "no lesson to announce"),
        }
        saved.map(|()| pointer)
    }
}
